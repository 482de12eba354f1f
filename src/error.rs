use thiserror::Error;

use crate::path::PathError;

/// Errors surfaced at this crate's fallible boundaries: instance loading, path
/// decoding, and the CLI. The column-generation core itself (`espprc`, `branching`)
/// is a total function over well-formed inputs and returns no errors.
#[derive(Debug, Error)]
pub enum VrptwError {
    /// The instance record failed a validation check at load time.
    #[error(transparent)]
    Instance(#[from] InstanceError),

    /// A route variable's name could not be decoded back into a node sequence.
    #[error(transparent)]
    Path(#[from] PathError),

    /// The instance file could not be parsed as JSON.
    #[error("failed to parse instance file: {0}")]
    Json(#[from] serde_json::Error),

    /// The instance file could not be read from disk.
    #[error("failed to read instance file: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while validating a freshly-deserialized instance record.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum InstanceError {
    /// `demands`, `earliest`, `latest`, `service_times`, or `distances` disagree on
    /// the number of nodes implied by `n_customers`.
    #[error("array {field} has length {actual}, expected {expected}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A node's time window is inverted (`earliest[i] > latest[i]`).
    #[error("node {node} has earliest {earliest} > latest {latest}")]
    InvertedWindow {
        node: usize,
        earliest: i64,
        latest: i64,
    },

    /// A distance entry is negative.
    #[error("distance[{from}][{to}] = {value} is negative")]
    NegativeDistance { from: usize, to: usize, value: i64 },

    /// A demand entry is negative, or a single customer's demand exceeds capacity.
    #[error("node {node} has demand {demand} exceeding capacity {capacity}")]
    DemandExceedsCapacity {
        node: usize,
        demand: i64,
        capacity: i64,
    },

    /// `customers` requested more nodes than the instance has.
    #[error("requested {requested} customers but the instance only has {available}")]
    NotEnoughCustomers { requested: usize, available: usize },
}
