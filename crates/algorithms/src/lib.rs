//! # DrainStack Algorithms
//!
//! Drainage network algorithms for DrainStack.
//!
//! ## Available Algorithm Categories
//!
//! - **hydrology**: Stack ordering, drainage area and discharge accumulation

pub mod hydrology;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::hydrology::{
        accumulate, flow_accumulation, make_ordered_node_array, AccumulationParams,
        FlowAccumulation, FlowAccumulationResult, Seed,
    };
    pub use drainstack_core::prelude::*;
}
