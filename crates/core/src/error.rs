//! Error types for DrainStack

use thiserror::Error;

/// Main error type for DrainStack operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Index out of range: {what} id {index} in array of length {len}")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("Shape mismatch for {what}: expected {expected}, got {actual}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Cycle detected: node {node} reached twice during traversal")]
    CycleDetected { node: usize },

    #[error("Incomplete traversal: visited {visited} of {expected} nodes")]
    IncompleteTraversal { visited: usize, expected: usize },

    #[error("Donor mismatch: node {donor} is listed as a donor of {listed_under} but drains to {receiver}")]
    DonorMismatch {
        donor: usize,
        listed_under: usize,
        receiver: usize,
    },

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },
}

impl Error {
    /// Shorthand for an out-of-range node id
    pub fn node_out_of_range(what: &'static str, index: usize, len: usize) -> Self {
        Error::IndexOutOfRange { what, index, len }
    }

    /// Shorthand for an array whose length disagrees with the node count
    pub fn shape(what: &'static str, expected: usize, actual: usize) -> Self {
        Error::ShapeMismatch {
            what,
            expected,
            actual,
        }
    }
}

/// Result type alias for DrainStack operations
pub type Result<T> = std::result::Result<T, Error>;
