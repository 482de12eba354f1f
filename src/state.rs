//! Per-model datastore shared between the pricer, branch rule, and event handler.
//!
//! None of the three callbacks receive anything but a `Model<Solving>` handle; the
//! orchestrator in `solver.rs` stashes everything they need via `Model::set_data` and
//! each callback retrieves it with `get_data`/`get_data_mut`, exactly as
//! `examples/scipopt-russcip/examples/bin_packing.rs` shares `BinPackingInstance` and
//! `BranchingDecisionMap` with `KnapsackPricer` and `RyanFoster`.

use std::collections::{HashMap, HashSet};

use russcip::Constraint;

use crate::graph::Graph;
use crate::instance::Instance;

pub type Edge = (usize, usize);
pub type BBNodeId = usize;

/// The instance and its routing graph, fixed for the lifetime of the solve.
pub struct ProblemData {
    pub instance: Instance,
    pub graph: Graph,
}

/// One covering constraint per customer (§2 Restricted Master Problem), keyed by
/// customer node index. Cloning the map clones the handful of `Constraint` handles it
/// holds, not the constraints themselves — the same pattern `ItemToConstraint` uses.
#[derive(Clone, Default)]
pub struct CoveringConstraints(pub HashMap<usize, Constraint>);

/// Forbidden-edge sets accumulated by edge branching, one per branch-and-bound node
/// number. The root node is always numbered `1` in SCIP's node numbering.
#[derive(Debug, Default)]
pub struct ForbiddenEdges(HashMap<BBNodeId, HashSet<Edge>>);

impl ForbiddenEdges {
    pub fn root() -> Self {
        let mut map = HashMap::new();
        map.insert(1, HashSet::new());
        ForbiddenEdges(map)
    }

    pub fn get(&self, node: BBNodeId) -> HashSet<Edge> {
        self.0.get(&node).cloned().unwrap_or_default()
    }

    pub fn insert(&mut self, node: BBNodeId, edges: HashSet<Edge>) {
        self.0.insert(node, edges);
    }
}

/// Every route already priced into the master problem, so the pricer never offers the
/// same column twice under different duals (§4.1 "Added-path registry").
#[derive(Debug, Default)]
pub struct AddedPaths(HashSet<Vec<usize>>);

impl AddedPaths {
    pub fn contains(&self, nodes: &[usize]) -> bool {
        self.0.contains(nodes)
    }

    pub fn insert(&mut self, nodes: Vec<usize>) {
        self.0.insert(nodes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forbidden_edges_root_starts_empty_at_node_one() {
        let forbidden = ForbiddenEdges::root();
        assert!(forbidden.get(1).is_empty());
        assert!(forbidden.get(2).is_empty());
    }

    #[test]
    fn added_paths_tracks_what_it_was_told() {
        let mut added = AddedPaths::default();
        assert!(!added.contains(&[0, 1, 4]));
        added.insert(vec![0, 1, 4]);
        assert!(added.contains(&[0, 1, 4]));
    }
}
