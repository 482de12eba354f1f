//! Edge branching (§4.2): forbid a frequently-used fractional arc in one child, force
//! it in the other, so both children remain shortest-path pricing problems over a
//! pruned arc set.
//!
//! Grounded on `original_source/scip_routing/edge_brancher.py::EdgeBrancher`, which
//! aggregates LP branching candidates into per-edge totals, picks the most-used
//! fractional edge, and records two forbidden-edge sets keyed by child node number —
//! the actual UB=0 fixing is left to [`crate::eventhandler`], exactly as the original
//! splits `EdgeBrancher` from `EdgeBranchingEventhdlr`.

use std::collections::{HashMap, HashSet};

use russcip::prelude::*;
use russcip::{BranchingCandidate, BranchingResult, Model, SCIPBranchRule, Solving};

use crate::graph::Graph;
use crate::path::PathCache;
use crate::state::{Edge, ForbiddenEdges, ProblemData};

/// Tolerance for "strictly between 0 and 1" (§4.2); matches the original's `EPSILON`.
const FRACTIONAL_EPS: f64 = 1e-6;

/// Sums each branching candidate's LP value onto every edge its route uses.
pub fn aggregate_fractional_values(candidate_edges: &[(HashSet<Edge>, f64)]) -> HashMap<Edge, f64> {
    let mut totals: HashMap<Edge, f64> = HashMap::new();
    for (edges, lp_val) in candidate_edges {
        for &edge in edges {
            *totals.entry(edge).or_insert(0.0) += lp_val;
        }
    }
    totals
}

/// Edges whose aggregated value is strictly between `eps` and `1 - eps`.
pub fn fractional_edges(totals: &HashMap<Edge, f64>, eps: f64) -> Vec<Edge> {
    let mut edges: Vec<Edge> = totals
        .iter()
        .filter(|&(_, &v)| v > eps && v < 1.0 - eps)
        .map(|(&e, _)| e)
        .collect();
    edges.sort_unstable();
    edges
}

/// Among `fractional`, the edge used by the largest number of currently-existing
/// route variables (§4.2 "perturbation heuristic"). Panics if `fractional` is empty,
/// since flow conservation over the covering constraints guarantees a fractional
/// edge exists whenever the branching rule runs at all.
pub fn select_branching_edge(fractional: &[Edge], counts: &HashMap<Edge, usize>) -> Edge {
    *fractional
        .iter()
        .max_by_key(|e| counts.get(e).copied().unwrap_or(0))
        .expect("edge branching invoked with an empty fractional-edge set")
}

/// Left (forbid) child: the parent's forbidden set plus the chosen edge.
pub fn left_child_forbidden(parent: &HashSet<Edge>, chosen: Edge) -> HashSet<Edge> {
    let mut child = parent.clone();
    child.insert(chosen);
    child
}

/// Right (force) child: the parent's forbidden set plus every other arc entering
/// `chosen.1` and every other arc leaving `chosen.0` — forcing any route through
/// `chosen.0` to proceed directly to `chosen.1`, without naming `chosen` itself.
pub fn right_child_forbidden(parent: &HashSet<Edge>, chosen: Edge, graph: &Graph) -> HashSet<Edge> {
    let (i, j) = chosen;
    let mut child = parent.clone();
    for u in 0..graph.n_nodes() {
        for &w in graph.neighbors(u) {
            if (u == i && w != j) || (u != i && w == j) {
                child.insert((u, w));
            }
        }
    }
    child
}

#[derive(Debug, Default)]
pub struct EdgeBranchRule;

impl BranchRule for EdgeBranchRule {
    fn execute(
        &mut self,
        mut model: Model<Solving>,
        _branchrule: SCIPBranchRule,
        candidates: Vec<BranchingCandidate>,
    ) -> BranchingResult {
        let candidate_edges: Vec<(HashSet<Edge>, f64)> = candidates
            .iter()
            .map(|candidate| {
                let var = model.var_in_prob(candidate.var_prob_id).unwrap();
                let edges = model
                    .get_data_mut::<PathCache>()
                    .unwrap()
                    .cyclic_edges_of(&var.name())
                    .expect("route variable name must decode")
                    .clone();
                (edges, candidate.lp_sol_val)
            })
            .collect();

        let totals = aggregate_fractional_values(&candidate_edges);
        let fractional = fractional_edges(&totals, FRACTIONAL_EPS);

        let mut counts: HashMap<Edge, usize> = HashMap::new();
        for var in model.vars().iter() {
            let edges = model
                .get_data_mut::<PathCache>()
                .unwrap()
                .cyclic_edges_of(&var.name())
                .expect("route variable name must decode")
                .clone();
            for edge in edges {
                *counts.entry(edge).or_insert(0) += 1;
            }
        }

        let chosen = select_branching_edge(&fractional, &counts);
        log::info!("branching on edge {chosen:?} ({} fractional edges considered)", fractional.len());

        let node_number = model.focus_node().number();
        let parent_forbidden = model.get_data::<ForbiddenEdges>().unwrap().get(node_number);

        let left = left_child_forbidden(&parent_forbidden, chosen);
        let right = {
            let graph = &model.get_data::<ProblemData>().unwrap().graph;
            right_child_forbidden(&parent_forbidden, chosen, graph)
        };

        let left_child = model.create_child();
        let right_child = model.create_child();
        model
            .get_data_mut::<ForbiddenEdges>()
            .unwrap()
            .insert(left_child.number(), left);
        model
            .get_data_mut::<ForbiddenEdges>()
            .unwrap()
            .insert(right_child.number(), right);

        BranchingResult::CustomBranching
    }
}
