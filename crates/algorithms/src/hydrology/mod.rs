//! Hydrological accumulation over drainage networks
//!
//! Algorithms for single-receiver drainage networks:
//! - Stack: order nodes so every node precedes its donors
//! - Accumulation: push drainage area and discharge downstream along a stack
//! - Seeds: per-node cell area, runoff and boundary handling
//! - Flow accumulation: receivers in, area and discharge out

pub(crate) mod accumulation;
pub(crate) mod flow_accumulation;
mod seeds;
pub(crate) mod stack;

pub use accumulation::{accumulate, accumulate_lossy};
pub use flow_accumulation::{
    find_drainage_area_and_discharge, find_drainage_area_and_discharge_lossy, flow_accumulation,
    flow_accumulation_lossy, FlowAccumulation, FlowAccumulationResult,
};
pub use seeds::{seed_arrays, AccumulationParams, Seed};
pub use stack::{build_stack, build_stack_with_visited, find_roots, make_ordered_node_array};
