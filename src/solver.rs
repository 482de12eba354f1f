//! `VrptwSolver` (§4.4 Orchestrator): builds the initial restricted master problem,
//! registers the pricer/branch-rule/event-handler trio, configures the framework the
//! way column generation requires, and reports the outcome.
//!
//! Grounded on `original_source/scip_routing/solver.py::VRPTWSolver::init_rmp` for the
//! initial single-customer routes and on the parameter toggles
//! `examples/scipopt-russcip/examples/bin_packing.rs`'s `main` applies before adding
//! its pricer.

use russcip::prelude::*;
use russcip::{Model, ParamSetting, Status, VarType};

use crate::branching::EdgeBranchRule;
use crate::eventhandler::BranchNodeEventHandler;
use crate::graph::Graph;
use crate::instance::Instance;
use crate::path::{decode, encode, PathCache};
use crate::pricer::VrptwPricer;
use crate::state::{AddedPaths, CoveringConstraints, ForbiddenEdges, ProblemData};

/// Outcome of a branch-and-price solve (§4.4 "Termination").
#[derive(Debug, Clone)]
pub struct Solution {
    pub status: Status,
    pub objective: Option<f64>,
    /// Node sequences of every route variable at value `> 0.5` in the best solution.
    pub routes: Vec<Vec<usize>>,
}

/// Builds and runs one branch-and-price solve. Each call constructs a fresh SCIP
/// model; a `VrptwSolver` carries only its own configuration, not solver state.
pub struct VrptwSolver {
    time_limit_secs: Option<usize>,
}

impl Default for VrptwSolver {
    fn default() -> Self {
        VrptwSolver { time_limit_secs: None }
    }
}

impl VrptwSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_time_limit_secs(mut self, secs: usize) -> Self {
        self.time_limit_secs = Some(secs);
        self
    }

    pub fn solve(&self, instance: Instance) -> Solution {
        let graph = Graph::from_instance(&instance);

        // Propagation must stay off alongside heuristics/separating/presolving (§4.4):
        // SCIP's bound tightening would otherwise fix variable bounds the pricer's
        // reduced-cost logic doesn't account for, so the LP solved at each node would no
        // longer be the true column-generation relaxation.
        let mut model = Model::default()
            .set_heuristics(ParamSetting::Off)
            .set_separating(ParamSetting::Off)
            .set_presolving(ParamSetting::Off)
            .set_param("propagating/maxrounds", 0)
            .set_param("propagating/maxroundsroot", 0)
            .set_obj_integral()
            .hide_output()
            .minimize();

        if let Some(secs) = self.time_limit_secs {
            model = model.set_time_limit(secs);
        }

        let mut covering = std::collections::HashMap::new();
        for &customer in &instance.customers {
            let constraint = model.add(
                cons()
                    .name(&format!("cover_{customer}"))
                    .eq(1.0)
                    .modifiable(true)
                    .removable(false),
            );
            covering.insert(customer, constraint);
        }

        let mut added_paths = AddedPaths::default();
        for &customer in &instance.customers {
            let nodes = vec![instance.depot, customer, instance.end_depot];
            let travel_cost =
                graph.distance(instance.depot, customer) + graph.distance(customer, instance.end_depot);
            let route_var = model.add(
                var()
                    .bin()
                    .obj(travel_cost as f64)
                    .name(&encode(&nodes)),
            );
            model.add_cons_coef(&covering[&customer], &route_var, 1.0);
            added_paths.insert(nodes);
        }

        log::info!(
            "built restricted master problem: {} covering constraints, {} initial routes",
            covering.len(),
            instance.customers.len(),
        );

        model.set_data(CoveringConstraints(covering));
        model.set_data(added_paths);
        model.set_data(ForbiddenEdges::root());
        model.set_data(PathCache::new());
        model.set_data(ProblemData { instance, graph });

        model.add(pricer(VrptwPricer).name("VrptwPricer").delay(false));
        model.add(
            branchrule(EdgeBranchRule)
                .name("EdgeBranchRule")
                .priority(i32::MAX)
                .maxdepth(-1)
                .maxbounddist(1.0),
        );
        model.add(eventhdlr(BranchNodeEventHandler).name("BranchNodeEventHandler"));

        let solved = model.solve();

        let status = solved.status();
        log::info!("branch-and-price finished with status {status:?}");
        let best_sol = solved.best_sol();
        let objective = best_sol.as_ref().map(|sol| sol.obj_val());
        let routes = best_sol
            .map(|sol| {
                solved
                    .vars()
                    .iter()
                    .filter(|route_var| sol.val(route_var) > 0.5)
                    .filter_map(|route_var| decode(&route_var.name()).ok())
                    .collect()
            })
            .unwrap_or_default();

        Solution {
            status,
            objective,
            routes,
        }
    }
}
