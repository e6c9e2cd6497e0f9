//! # DrainStack Core
//!
//! Core types, traits and errors for the DrainStack drainage library.
//!
//! This crate provides:
//! - `DonorIndex`: inverse receiver adjacency in CSR form
//! - `FlowElement`: numeric trait for accumulator values
//! - Algorithm trait for consistent API

pub mod error;
pub mod network;

pub use error::{Error, Result};
pub use network::{DonorIndex, FlowElement, NodeId};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::network::{DonorIndex, FlowElement, NodeId};
    pub use crate::Algorithm;
}

/// Core trait for all algorithms in DrainStack.
///
/// Algorithms are pure functions that transform input data according to parameters.
pub trait Algorithm {
    /// Input type for the algorithm
    type Input;
    /// Output type for the algorithm
    type Output;
    /// Parameters controlling algorithm behavior
    type Params: Default;
    /// Error type for algorithm execution
    type Error: std::error::Error;

    /// Returns the algorithm name
    fn name(&self) -> &'static str;

    /// Returns a description of what the algorithm does
    fn description(&self) -> &'static str;

    /// Execute the algorithm
    fn execute(&self, input: Self::Input, params: Self::Params) -> std::result::Result<Self::Output, Self::Error>;

    /// Execute with default parameters
    fn execute_default(&self, input: Self::Input) -> std::result::Result<Self::Output, Self::Error> {
        self.execute(input, Self::Params::default())
    }
}
