//! Pure ESPPRC labeling search (§4.1). No SCIP types appear anywhere in this module;
//! [`crate::pricer`] is the thin adapter that calls [`find_paths`] from inside a
//! `russcip::Pricer::generate_columns` callback.
//!
//! Translated from `original_source/scip_routing/pricing.py::find_path_py` with the
//! two corrections `SPEC_FULL.md` §9 calls for: the time update clamps at
//! `earliest[neighbor]` (not `latest[neighbor]`), and dominance is skipped entirely at
//! the end depot so every negative-reduced-cost sink label survives.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::graph::Graph;
use crate::instance::Instance;
use crate::label::{Label, LabelArena, LabelId};
use crate::path::canonical_key;

/// Column-addition threshold (§4.1, §8.2): a path is only worth pricing in if its
/// reduced cost is strictly below `-REDUCED_COST_EPS`.
pub const REDUCED_COST_EPS: f64 = 1e-8;

/// Tolerance used purely to keep the dominance relation's `<=` comparisons robust to
/// floating-point noise in `cost`; has no effect on which paths are reported.
const DOMINANCE_EPS: f64 = 1e-9;

/// A complete source-to-sink path produced by the labeling search, together with its
/// resource profile.
#[derive(Debug, Clone)]
pub struct PricedPath {
    /// `(depot, c_1, ..., c_k, end_depot)`.
    pub nodes: Vec<usize>,
    /// Earliest feasible service-start time at each node in `nodes`, same length.
    pub start_times: Vec<i64>,
    /// Sum of arc distances along the path (the RMP objective coefficient).
    pub travel_cost: i64,
    /// Reduced cost at the duals the search was run with.
    pub reduced_cost: f64,
}

/// Result of one labeling search: every path worth adding as a column, sorted
/// deterministically, plus the single most-negative sink label (used for the
/// elementary-mode lower bound, §4.1).
#[derive(Debug, Clone, Default)]
pub struct PricingResult {
    pub negative: Vec<PricedPath>,
    pub best: Option<PricedPath>,
}

/// Runs the labeling algorithm once and returns every path with reduced cost below
/// `-REDUCED_COST_EPS`, plus the globally best sink label for the lower bound.
///
/// `duals` is indexed by node (`0..instance.n_nodes()`); the caller is responsible for
/// setting `duals[depot] == duals[end_depot] == 0.0`, as the covering constraints only
/// exist for customers.
pub fn find_paths(
    graph: &Graph,
    instance: &Instance,
    duals: &[f64],
    forbidden_edges: &std::collections::HashSet<(usize, usize)>,
    elementary: bool,
) -> PricingResult {
    let n_nodes = graph.n_nodes();
    let depot = graph.depot();
    let end_depot = graph.end_depot();

    let mut arena = LabelArena::new();
    let mut unprocessed: Vec<Vec<LabelId>> = vec![Vec::new(); n_nodes];
    let mut processed: Vec<Vec<LabelId>> = vec![Vec::new(); n_nodes];
    let mut sinks: Vec<LabelId> = Vec::new();
    let mut heap: BinaryHeap<QueueKey> = BinaryHeap::new();

    let root = arena.alloc(Label::root(depot, n_nodes));
    unprocessed[depot].push(root);
    heap.push(QueueKey::of(&arena, root));

    while let Some(entry) = heap.pop() {
        if arena.is_removed(entry.id) {
            continue;
        }
        let current = entry.id;
        let label = arena.get(current).clone();

        for &w in graph.neighbors(label.node) {
            if elementary && label.visited.contains(w) {
                continue;
            }
            if forbidden_edges.contains(&(label.node, w)) {
                continue;
            }

            let dist = graph.distance(label.node, w);
            let new_demand = label.demand + instance.demands[w];
            let new_time =
                (label.time + instance.service_times[label.node] + dist).max(instance.earliest[w]);
            if new_demand > instance.capacity || new_time > instance.latest[w] {
                continue;
            }
            let new_cost = label.cost + (dist as f64 - duals[label.node]);
            let new_label = Label {
                node: w,
                cost: new_cost,
                demand: new_demand,
                time: new_time,
                visited: label.visited.with(w),
                parent: Some(current),
            };

            if w == end_depot {
                // Dominance is intentionally not applied here (§4.1, §9 open question 2):
                // every sink label must be enumerable so no improving column is missed.
                let id = arena.alloc(new_label);
                sinks.push(id);
                continue;
            }

            let dominated_by_existing = processed[w]
                .iter()
                .chain(unprocessed[w].iter())
                .any(|&eid| dominates(arena.get(eid), &new_label, elementary));
            if dominated_by_existing {
                continue;
            }

            let new_id = arena.alloc(new_label);
            let mut kept = Vec::with_capacity(unprocessed[w].len());
            for &eid in &unprocessed[w] {
                if dominates(arena.get(new_id), arena.get(eid), elementary) {
                    arena.mark_removed(eid);
                } else {
                    kept.push(eid);
                }
            }
            kept.push(new_id);
            unprocessed[w] = kept;
            heap.push(QueueKey::of(&arena, new_id));
            log::trace!("extended label to node {w}: cost {new_cost:.4}, demand {new_demand}, time {new_time}");
        }
        processed[label.node].push(current);
    }

    log::debug!("labeling search over {} nodes found {} sink labels", n_nodes, sinks.len());

    let mut best: Option<PricedPath> = None;
    let mut best_redcost = f64::INFINITY;
    let mut negative = Vec::new();

    for &sink in &sinks {
        let reduced_cost = arena.get(sink).cost;
        let (nodes, start_times) = arena.path_from(sink);
        let travel_cost = arena.travel_cost(sink, |i, j| graph.distance(i, j));
        let path = PricedPath {
            nodes,
            start_times,
            travel_cost,
            reduced_cost,
        };
        if reduced_cost < best_redcost {
            best_redcost = reduced_cost;
            best = Some(path.clone());
        }
        if reduced_cost < -REDUCED_COST_EPS {
            negative.push(path);
        }
    }

    negative.sort_by(|a, b| canonical_key(&a.nodes).cmp(&canonical_key(&b.nodes)));

    PricingResult { negative, best }
}

/// `a` dominates `b` (§4.1 Dominance relation): `a` is no worse on every resource and
/// strictly better on at least one, and (in elementary mode) `a`'s visited set is a
/// subset of `b`'s.
fn dominates(a: &Label, b: &Label, elementary: bool) -> bool {
    let le = a.cost <= b.cost + DOMINANCE_EPS && a.demand <= b.demand && a.time <= b.time;
    let strict = a.cost < b.cost - DOMINANCE_EPS || a.demand < b.demand || a.time < b.time;
    let subset = !elementary || a.visited.is_subset(&b.visited);
    le && strict && subset
}

/// Min-heap key ordering labels by `(earliest_time, cost)`, ties broken arbitrarily
/// among equal keys (§4.1: "ties broken by cost").
#[derive(Clone, Copy)]
struct QueueKey {
    time: i64,
    cost: f64,
    id: LabelId,
}

impl QueueKey {
    fn of(arena: &LabelArena, id: LabelId) -> Self {
        let label = arena.get(id);
        QueueKey {
            time: label.time,
            cost: label.cost,
            id,
        }
    }
}

impl PartialEq for QueueKey {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.cost == other.cost
    }
}
impl Eq for QueueKey {}

impl PartialOrd for QueueKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueKey {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: std::collections::BinaryHeap is a max-heap, but the search wants
        // the label with the smallest (time, cost) popped first.
        other
            .time
            .cmp(&self.time)
            .then_with(|| other.cost.partial_cmp(&self.cost).unwrap_or(Ordering::Equal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::fixtures::{single_customer_instance, small_instance};
    use std::collections::HashSet;

    fn duals_zero(instance: &Instance) -> Vec<f64> {
        vec![0.0; instance.n_nodes()]
    }

    #[test]
    fn feasibility_of_every_emitted_column() {
        let instance = small_instance();
        let graph = Graph::from_instance(&instance);
        let mut duals = duals_zero(&instance);
        // Large duals on every customer make many routes reduced-cost negative.
        for &c in &instance.customers {
            duals[c] = 20.0;
        }
        let result = find_paths(&graph, &instance, &duals, &HashSet::new(), false);
        assert!(!result.negative.is_empty());
        for path in &result.negative {
            let mut demand = 0;
            for &n in &path.nodes {
                demand += instance.demands[n];
            }
            assert!(demand <= instance.capacity, "path {:?} overloads capacity", path.nodes);
            for (i, &n) in path.nodes.iter().enumerate() {
                assert!(path.start_times[i] >= instance.earliest[n]);
                assert!(path.start_times[i] <= instance.latest[n]);
            }
        }
    }

    #[test]
    fn reduced_cost_sign_is_strictly_negative_beyond_epsilon() {
        let instance = small_instance();
        let graph = Graph::from_instance(&instance);
        let mut duals = duals_zero(&instance);
        for &c in &instance.customers {
            duals[c] = 20.0;
        }
        let result = find_paths(&graph, &instance, &duals, &HashSet::new(), false);
        for path in &result.negative {
            assert!(path.reduced_cost < -REDUCED_COST_EPS);
        }
    }

    #[test]
    fn zero_duals_yield_no_negative_reduced_cost_paths() {
        let instance = small_instance();
        let graph = Graph::from_instance(&instance);
        let duals = duals_zero(&instance);
        let result = find_paths(&graph, &instance, &duals, &HashSet::new(), false);
        assert!(result.negative.is_empty());
        // the direct depot -> end_depot arc is always the best (cheapest) sink label
        // when no customer is worth visiting.
        let best = result.best.expect("graph always has a depot->end_depot path");
        assert_eq!(best.nodes, vec![instance.depot, instance.end_depot]);
    }

    #[test]
    fn forbidding_the_only_profitable_edge_removes_its_column() {
        let instance = small_instance();
        let graph = Graph::from_instance(&instance);
        let mut duals = duals_zero(&instance);
        duals[1] = 50.0;
        let open = find_paths(&graph, &instance, &duals, &HashSet::new(), false);
        assert!(open.negative.iter().any(|p| p.nodes.contains(&1)));

        let mut forbidden = HashSet::new();
        forbidden.insert((instance.depot, 1));
        let closed = find_paths(&graph, &instance, &duals, &forbidden, false);
        assert!(!closed.negative.iter().any(|p| p.nodes.contains(&1)));
    }

    #[test]
    fn elementary_mode_never_revisits_a_customer() {
        let instance = small_instance();
        let graph = Graph::from_instance(&instance);
        let mut duals = duals_zero(&instance);
        for &c in &instance.customers {
            duals[c] = 50.0;
        }
        let result = find_paths(&graph, &instance, &duals, &HashSet::new(), true);
        for path in &result.negative {
            let customers_only: Vec<usize> = path.nodes[1..path.nodes.len() - 1].to_vec();
            let mut seen = HashSet::new();
            for c in customers_only {
                assert!(seen.insert(c), "customer {c} repeated in elementary path {:?}", path.nodes);
            }
        }
    }

    #[test]
    fn single_customer_instance_has_no_profitable_detour() {
        let instance = single_customer_instance();
        let graph = Graph::from_instance(&instance);
        let mut duals = duals_zero(&instance);
        duals[1] = 3.0; // less than the 14 round-trip cost, no negative column possible
        let result = find_paths(&graph, &instance, &duals, &HashSet::new(), true);
        assert!(result.negative.is_empty());
    }

    #[test]
    fn repeated_call_with_identical_duals_is_idempotent() {
        let instance = small_instance();
        let graph = Graph::from_instance(&instance);
        let mut duals = duals_zero(&instance);
        duals[1] = 10.0;
        let first = find_paths(&graph, &instance, &duals, &HashSet::new(), false);
        let second = find_paths(&graph, &instance, &duals, &HashSet::new(), false);
        assert_eq!(first.negative.len(), second.negative.len());
        for (a, b) in first.negative.iter().zip(second.negative.iter()) {
            assert_eq!(a.nodes, b.nodes);
            assert!((a.reduced_cost - b.reduced_cost).abs() < 1e-9);
        }
    }
}
