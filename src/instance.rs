//! Immutable VRPTW instance description.
//!
//! Mirrors the node-array layout `original_source/scip_routing/pricing.py` and
//! `solver.py` build ad hoc on every access (`instance.earliest + [instance.earliest[depot]]`,
//! etc.) by materialising the end-depot mirror once, at load time.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{InstanceError, VrptwError};

pub mod cvrplib;

/// A VRPTW instance as received from the instance-loading layer (§6 of the spec):
/// the wire format for instance files and the CLI's `--instance` argument.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub n_customers: usize,
    pub depot: usize,
    pub customers: Vec<usize>,
    pub capacity: i64,
    pub demands: Vec<i64>,
    pub earliest: Vec<i64>,
    pub latest: Vec<i64>,
    pub service_times: Vec<i64>,
    pub distances: Vec<Vec<i64>>,
    #[serde(default)]
    pub coordinates: Vec<(f64, f64)>,
}

/// A validated, immutable instance. Node indices run `0..=end_depot`: `0` is
/// conventionally the start depot, `1..=n_customers` are customers, and
/// `end_depot = n_customers + 1` is the synthetic sink depot mirroring node `depot`.
#[derive(Debug, Clone)]
pub struct Instance {
    pub depot: usize,
    pub end_depot: usize,
    pub customers: Vec<usize>,
    pub capacity: i64,
    pub demands: Vec<i64>,
    pub earliest: Vec<i64>,
    pub latest: Vec<i64>,
    pub service_times: Vec<i64>,
    pub distances: Vec<Vec<i64>>,
}

impl Instance {
    /// Validates a `Record` and appends the end-depot mirror, producing an `Instance`.
    pub fn from_record(record: Record) -> Result<Self, InstanceError> {
        let n = record.n_customers;
        let expected_len = n + 1;

        check_len("demands", expected_len, record.demands.len())?;
        check_len("earliest", expected_len, record.earliest.len())?;
        check_len("latest", expected_len, record.latest.len())?;
        check_len("service_times", expected_len, record.service_times.len())?;
        check_len("distances", expected_len, record.distances.len())?;
        for row in &record.distances {
            check_len("distances[_]", expected_len, row.len())?;
        }

        for node in 0..expected_len {
            if record.earliest[node] > record.latest[node] {
                return Err(InstanceError::InvertedWindow {
                    node,
                    earliest: record.earliest[node],
                    latest: record.latest[node],
                });
            }
            if record.demands[node] > record.capacity {
                return Err(InstanceError::DemandExceedsCapacity {
                    node,
                    demand: record.demands[node],
                    capacity: record.capacity,
                });
            }
        }
        for (i, row) in record.distances.iter().enumerate() {
            for (j, &value) in row.iter().enumerate() {
                if value < 0 {
                    return Err(InstanceError::NegativeDistance { from: i, to: j, value });
                }
            }
        }

        let depot = record.depot;
        let end_depot = n + 1;

        let mirror = |v: &[i64]| {
            let mut v = v.to_vec();
            v.push(v[depot]);
            v
        };
        let demands = mirror(&record.demands);
        let earliest = mirror(&record.earliest);
        let latest = mirror(&record.latest);
        let service_times = mirror(&record.service_times);

        let mut distances = record.distances;
        for row in &mut distances {
            let to_depot = row[depot];
            row.push(to_depot);
        }
        let depot_row = distances[depot].clone();
        distances.push(depot_row);

        Ok(Instance {
            depot,
            end_depot,
            customers: record.customers,
            capacity: record.capacity,
            demands,
            earliest,
            latest,
            service_times,
            distances,
        })
    }

    /// Loads and validates an instance from a JSON file on disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, VrptwError> {
        let text = std::fs::read_to_string(path)?;
        let record: Record = serde_json::from_str(&text)?;
        Ok(Instance::from_record(record)?)
    }

    /// Restricts the instance to its first `k` customers (by the ordering of
    /// `customers`), matching `original_source/scip_routing/utils.py::minify_instance`.
    /// The depot and end-depot rows/columns are always kept.
    pub fn truncate_to_first_k(&self, k: usize) -> Result<Instance, InstanceError> {
        if k > self.customers.len() {
            return Err(InstanceError::NotEnoughCustomers {
                requested: k,
                available: self.customers.len(),
            });
        }
        let kept_customers = self.customers[..k].to_vec();
        let mut kept_nodes: Vec<usize> = std::iter::once(self.depot)
            .chain(kept_customers.iter().copied())
            .chain(std::iter::once(self.end_depot))
            .collect();
        kept_nodes.sort_unstable();
        kept_nodes.dedup();

        let reindex = |old: usize| kept_nodes.iter().position(|&n| n == old).unwrap();

        let demands = kept_nodes.iter().map(|&n| self.demands[n]).collect();
        let earliest = kept_nodes.iter().map(|&n| self.earliest[n]).collect();
        let latest = kept_nodes.iter().map(|&n| self.latest[n]).collect();
        let service_times = kept_nodes.iter().map(|&n| self.service_times[n]).collect();
        let distances = kept_nodes
            .iter()
            .map(|&i| kept_nodes.iter().map(|&j| self.distances[i][j]).collect())
            .collect();

        Ok(Instance {
            depot: reindex(self.depot),
            end_depot: reindex(self.end_depot),
            customers: kept_customers.iter().map(|&c| reindex(c)).collect(),
            capacity: self.capacity,
            demands,
            earliest,
            latest,
            service_times,
            distances,
        })
    }

    /// Number of nodes including both depot copies.
    pub fn n_nodes(&self) -> usize {
        self.end_depot + 1
    }
}

fn check_len(field: &'static str, expected: usize, actual: usize) -> Result<(), InstanceError> {
    if expected != actual {
        return Err(InstanceError::LengthMismatch {
            field,
            expected,
            actual,
        });
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn mirrors_end_depot_onto_depot_row() {
        let instance = small_instance();
        assert_eq!(instance.end_depot, 4);
        assert_eq!(instance.demands[4], instance.demands[0]);
        assert_eq!(instance.earliest[4], instance.earliest[0]);
        assert_eq!(instance.latest[4], instance.latest[0]);
        assert_eq!(instance.distances[1][4], instance.distances[1][0]);
        assert_eq!(instance.distances[4], instance.distances[0]);
    }

    #[test]
    fn rejects_inverted_window() {
        let mut record = super::Record {
            n_customers: 1,
            depot: 0,
            customers: vec![1],
            capacity: 5,
            demands: vec![0, 1],
            earliest: vec![0, 10],
            latest: vec![50, 5],
            service_times: vec![0, 1],
            distances: vec![vec![0, 1], vec![1, 0]],
            coordinates: vec![],
        };
        let err = super::Instance::from_record(record.clone()).unwrap_err();
        assert!(matches!(err, super::InstanceError::InvertedWindow { .. }));

        record.latest[1] = 20;
        assert!(super::Instance::from_record(record).is_ok());
    }

    #[test]
    fn truncate_keeps_depot_and_end_depot() {
        let instance = small_instance();
        let truncated = instance.truncate_to_first_k(2).unwrap();
        assert_eq!(truncated.customers.len(), 2);
        assert_eq!(truncated.n_nodes(), 4);
        assert_eq!(truncated.distances[truncated.depot][truncated.customers[0]], 4);
    }
}
