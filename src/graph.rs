//! Directed graph over a [`crate::instance::Instance`] — an arc from the start depot to
//! every customer, between every pair of distinct customers, from every customer to the
//! end depot, and directly from depot to end depot.
//!
//! Grounded on `original_source/scip_routing/utils.py::instance_graph`; the graph never
//! changes after construction, so neighbour lists are precomputed once here rather than
//! filtered on every label expansion.

use crate::instance::Instance;

/// An immutable directed graph with integer arc weights (distances).
#[derive(Debug, Clone)]
pub struct Graph {
    n_nodes: usize,
    depot: usize,
    end_depot: usize,
    neighbors: Vec<Vec<usize>>,
    distance: Vec<Vec<i64>>,
}

impl Graph {
    /// Builds the routing graph implied by an instance.
    pub fn from_instance(instance: &Instance) -> Self {
        let n_nodes = instance.n_nodes();
        let depot = instance.depot;
        let end_depot = instance.end_depot;
        let mut neighbors = vec![Vec::new(); n_nodes];

        for &c in &instance.customers {
            neighbors[depot].push(c);
        }
        for &ci in &instance.customers {
            for &cj in &instance.customers {
                if ci != cj {
                    neighbors[ci].push(cj);
                }
            }
        }
        for &c in &instance.customers {
            neighbors[c].push(end_depot);
        }
        neighbors[depot].push(end_depot);

        Graph {
            n_nodes,
            depot,
            end_depot,
            neighbors,
            distance: instance.distances.clone(),
        }
    }

    pub fn n_nodes(&self) -> usize {
        self.n_nodes
    }

    pub fn depot(&self) -> usize {
        self.depot
    }

    pub fn end_depot(&self) -> usize {
        self.end_depot
    }

    /// Outgoing neighbours of `node`, in construction order.
    pub fn neighbors(&self, node: usize) -> &[usize] {
        &self.neighbors[node]
    }

    /// Arc weight / travel distance from `i` to `j`.
    pub fn distance(&self, i: usize, j: usize) -> i64 {
        self.distance[i][j]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::fixtures::small_instance;

    #[test]
    fn depot_reaches_every_customer_and_end_depot_directly() {
        let instance = small_instance();
        let graph = Graph::from_instance(&instance);
        let mut from_depot = graph.neighbors(graph.depot()).to_vec();
        from_depot.sort_unstable();
        assert_eq!(from_depot, vec![1, 2, 3, 4]);
    }

    #[test]
    fn customers_do_not_self_loop() {
        let instance = small_instance();
        let graph = Graph::from_instance(&instance);
        for &c in &instance.customers {
            assert!(!graph.neighbors(c).contains(&c));
            assert!(graph.neighbors(c).contains(&graph.end_depot()));
        }
    }
}
