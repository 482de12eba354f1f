//! `VrptwPricer`: adapts the pure search in [`crate::espprc`] into a `russcip::Pricer`.
//!
//! Grounded on the dual-pull and column-addition pattern in
//! `examples/scipopt-russcip/examples/bin_packing.rs::KnapsackPricer` and
//! `cutting_stock.rs::CSPPricer`; the two-phase elementary escalation loop is a direct
//! port of `original_source/scip_routing/pricing.py::pricerredcost`.

use std::collections::HashMap;

use russcip::prelude::*;
use russcip::{Model, PricerResult, PricerResultState, SCIPPricer, Solving, VarType};

use crate::espprc::{find_paths, PricedPath};
use crate::path::encode;
use crate::state::{AddedPaths, CoveringConstraints, ForbiddenEdges, ProblemData};

#[derive(Debug, Default)]
pub struct VrptwPricer;

impl Pricer for VrptwPricer {
    fn generate_columns(
        &mut self,
        mut model: Model<Solving>,
        _pricer: SCIPPricer,
        farkas: bool,
    ) -> PricerResult {
        if farkas {
            // The restricted master problem is feasible by construction (every customer's
            // covering constraint is covered by the initial single-customer routes), so SCIP
            // should never need Farkas pricing to repair infeasibility.
            unreachable!("pricer asked to repair an infeasible master LP");
        }

        let node_number = model.focus_node().number();
        let forbidden = model.get_data::<ForbiddenEdges>().unwrap().get(node_number);
        let duals = pull_duals(&model);

        let mut elementary = false;
        let mut min_redcost = 0.0_f64;
        let mut added_any = false;

        loop {
            let result = {
                let problem = model.get_data::<ProblemData>().unwrap();
                find_paths(&problem.graph, &problem.instance, &duals, &forbidden, elementary)
            };

            if let Some(best) = &result.best {
                if best.reduced_cost < min_redcost {
                    min_redcost = best.reduced_cost;
                }
            }

            let mut added_this_round = false;
            for path in &result.negative {
                let already_known = model.get_data::<AddedPaths>().unwrap().contains(&path.nodes);
                if already_known {
                    continue;
                }
                add_route_column(&mut model, path);
                log::info!("accepted column {:?} (reduced cost {:.4})", path.nodes, path.reduced_cost);
                model
                    .get_data_mut::<AddedPaths>()
                    .unwrap()
                    .insert(path.nodes.clone());
                added_this_round = true;
            }
            added_any |= added_this_round;

            if added_this_round || elementary {
                break;
            }
            log::debug!("no non-elementary columns at node {node_number}, escalating to elementary search");
            elementary = true;
        }

        let lower_bound = if elementary {
            Some(model.obj_val() + min_redcost)
        } else {
            None
        };

        PricerResult {
            state: if added_any {
                PricerResultState::FoundColumns
            } else {
                PricerResultState::NoColumns
            },
            lower_bound,
        }
    }
}

/// Reads the dual value of every covering constraint, indexed by node so it lines up
/// directly with `Instance`'s node-indexed arrays (depot and end depot stay at 0.0,
/// since no covering constraint exists for either).
fn pull_duals(model: &Model<Solving>) -> Vec<f64> {
    let n_nodes = model.get_data::<ProblemData>().unwrap().instance.n_nodes();
    let covering = model.get_data::<CoveringConstraints>().unwrap().clone();

    let mut duals = vec![0.0; n_nodes];
    for (&customer, cons) in covering.0.iter() {
        let transformed = cons
            .transformed()
            .expect("covering constraint must be transformed once solving has started");
        duals[customer] = transformed
            .dual_sol()
            .expect("dual solution unavailable for a transformed constraint during pricing");
    }
    duals
}

fn add_route_column(model: &mut Model<Solving>, path: &PricedPath) {
    let name = encode(&path.nodes);
    let new_var = model.add_priced_var(0.0, 1.0, path.travel_cost as f64, &name, VarType::Binary);

    let mut visits: HashMap<usize, f64> = HashMap::new();
    for &node in &path.nodes[1..path.nodes.len() - 1] {
        *visits.entry(node).or_insert(0.0) += 1.0;
    }

    let covering = model.get_data::<CoveringConstraints>().unwrap().clone();
    for (customer, count) in visits {
        if let Some(cons) = covering.0.get(&customer) {
            model.add_cons_coef(cons, &new_var, count);
        }
    }
}
