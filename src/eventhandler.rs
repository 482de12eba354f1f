//! `BranchNodeEventHandler` (§4.3): whenever SCIP focuses a branch-and-bound node,
//! fixes every existing route variable whose cyclic edge set intersects that node's
//! forbidden-edge set to upper bound zero.
//!
//! A direct port of `original_source/scip_routing/edge_branching_eventhdlr.py`'s
//! `eventexec`, adapted to `russcip`'s `Eventhdlr` trait the way
//! `examples/scipopt-russcip/examples/node_event_handler.rs` subscribes to
//! `EventMask::NODE_FOCUSED`.

use russcip::prelude::*;
use russcip::{Event, EventMask, Eventhdlr, Model, SCIPEventhdlr, Solving};

use crate::path::PathCache;
use crate::state::ForbiddenEdges;

#[derive(Debug, Default)]
pub struct BranchNodeEventHandler;

impl Eventhdlr for BranchNodeEventHandler {
    fn get_type(&self) -> EventMask {
        EventMask::NODE_FOCUSED
    }

    fn execute(&mut self, mut model: Model<Solving>, _eventhdlr: SCIPEventhdlr, _event: Event) {
        let node = model.focus_node();
        let node_number = node.number();
        let forbidden = model.get_data::<ForbiddenEdges>().unwrap().get(node_number);
        if forbidden.is_empty() {
            return;
        }

        for var in model.vars().iter() {
            let edges = model
                .get_data_mut::<PathCache>()
                .unwrap()
                .cyclic_edges_of(&var.name())
                .expect("route variable name must decode")
                .clone();
            if edges.iter().any(|edge| forbidden.contains(edge)) {
                model.set_ub_node(&node, var, 0.0);
            }
        }
    }
}
