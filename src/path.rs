//! Canonical path-tuple encoding and decoding (§4.3 "Path decoding", §6 "Variable
//! naming", §9 "Added-path registry").
//!
//! A route is persisted solely through its variable name, the textual tuple form of
//! its node sequence, e.g. `(0, 3, 7, 11)`. SCIP prefixes transformed copies with
//! `t_`; grounded exactly on `original_source/scip_routing/utils.py::var_name_to_edges`,
//! which strips a 2-character prefix before parsing.

use thiserror::Error;

pub const TRANSFORMED_PREFIX: &str = "t_";

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum PathError {
    #[error("malformed route variable name: {0:?}")]
    Malformed(String),
}

/// Encodes a node sequence as the textual tuple form used for variable names and as
/// the deterministic sort key for column emission (§5 "Determinism").
pub fn encode(nodes: &[usize]) -> String {
    let joined = nodes
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!("({joined})")
}

/// Sort key for deterministic column emission (§5): identical to [`encode`], named
/// separately so call sites document *why* they are encoding (ordering, not naming).
pub fn canonical_key(nodes: &[usize]) -> String {
    encode(nodes)
}

/// Strips the `t_` prefix SCIP adds to transformed variable copies, if present.
pub fn strip_transformed_prefix(name: &str) -> &str {
    name.strip_prefix(TRANSFORMED_PREFIX).unwrap_or(name)
}

/// Parses a route variable's name back into its node sequence.
pub fn decode(name: &str) -> Result<Vec<usize>, PathError> {
    let stripped = strip_transformed_prefix(name).trim();
    let inner = stripped
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| PathError::Malformed(name.to_string()))?;
    if inner.trim().is_empty() {
        return Ok(Vec::new());
    }
    inner
        .split(',')
        .map(|token| {
            token
                .trim()
                .parse::<usize>()
                .map_err(|_| PathError::Malformed(name.to_string()))
        })
        .collect()
}

/// Produces the cyclic edge set the event handler and branch rule test forbidden
/// edges against: the path's edges with the final arc's destination replaced by the
/// path's first node, so the sequence reads as a cycle back to the depot. Matches
/// `var_name_to_edges`'s `nodes[-1] = nodes[0]` substitution exactly.
pub fn cyclic_edges(nodes: &[usize]) -> std::collections::HashSet<(usize, usize)> {
    if nodes.len() < 2 {
        return std::collections::HashSet::new();
    }
    let mut wrapped = nodes.to_vec();
    let first = wrapped[0];
    *wrapped.last_mut().unwrap() = first;
    wrapped.windows(2).map(|w| (w[0], w[1])).collect()
}

/// Caches the decoded cyclic edge set for each route variable name seen so far (§4.3:
/// "The decoding is pure and cacheable keyed by variable name"). Used by the branch
/// rule and event handler, which both re-test every existing variable against a
/// forbidden-edge set on every node focus.
#[derive(Debug, Default)]
pub struct PathCache {
    edges: std::collections::HashMap<String, std::collections::HashSet<(usize, usize)>>,
}

impl PathCache {
    pub fn new() -> Self {
        PathCache::default()
    }

    /// Returns the cyclic edge set for `name`, decoding and caching it on first use.
    pub fn cyclic_edges_of(
        &mut self,
        name: &str,
    ) -> Result<&std::collections::HashSet<(usize, usize)>, PathError> {
        if !self.edges.contains_key(name) {
            let nodes = decode(name)?;
            self.edges.insert(name.to_string(), cyclic_edges(&nodes));
        }
        Ok(self.edges.get(name).unwrap())
    }
}
