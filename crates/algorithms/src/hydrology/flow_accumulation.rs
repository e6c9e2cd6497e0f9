//! Flow accumulation algorithm
//!
//! Calculates drainage area and discharge at every node of a
//! single-receiver drainage network. The network is first ordered into a
//! stack (every node before its donors), then the stack is walked back to
//! front pushing area and discharge downstream.

use drainstack_core::{Algorithm, DonorIndex, Error, FlowElement, NodeId, Result};
use ndarray::Array1;
use tracing::debug;

use super::accumulation::accumulate_lossy;
use super::seeds::{seed_arrays, AccumulationParams};
use super::stack::make_ordered_node_array;

/// Output of [`flow_accumulation`]
#[derive(Debug, Clone, PartialEq)]
pub struct FlowAccumulationResult {
    /// Accumulated upstream contributing area at each node
    pub drainage_area: Array1<f64>,
    /// Accumulated discharge at each node, net of losses
    pub discharge: Array1<f64>,
    /// Node order used for the accumulation
    pub stack: Vec<NodeId>,
}

/// Flow accumulation algorithm
#[derive(Debug, Clone, Default)]
pub struct FlowAccumulation;

impl Algorithm for FlowAccumulation {
    type Input = Vec<NodeId>;
    type Output = FlowAccumulationResult;
    type Params = AccumulationParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Flow Accumulation"
    }

    fn description(&self) -> &'static str {
        "Accumulate drainage area and discharge along a receiver network"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        flow_accumulation(&input, params)
    }
}

/// Seed and accumulate drainage area and discharge along an existing stack.
///
/// # Arguments
/// * `stack` - Node order from [`make_ordered_node_array`]
/// * `receivers` - Receiver of every node
/// * `params` - Cell area, runoff and boundary nodes
///
/// # Returns
/// `(drainage_area, discharge)`, one entry per node
pub fn find_drainage_area_and_discharge<T: FlowElement>(
    stack: &[NodeId],
    receivers: &[NodeId],
    params: &AccumulationParams,
) -> Result<(Vec<T>, Vec<T>)> {
    find_drainage_area_and_discharge_lossy(stack, receivers, params, |q, _, _| q)
}

/// Same as [`find_drainage_area_and_discharge`], with a transmission loss
/// applied on every donor-to-receiver edge (see [`accumulate_lossy`]).
pub fn find_drainage_area_and_discharge_lossy<T, F>(
    stack: &[NodeId],
    receivers: &[NodeId],
    params: &AccumulationParams,
    loss: F,
) -> Result<(Vec<T>, Vec<T>)>
where
    T: FlowElement,
    F: FnMut(T, NodeId, NodeId) -> T,
{
    let n = receivers.len();
    if stack.len() != n {
        return Err(Error::shape("stack", n, stack.len()));
    }

    let (mut drainage_area, mut discharge) = seed_arrays::<T>(n, params)?;
    accumulate_lossy(n, stack, receivers, &mut drainage_area, &mut discharge, loss)?;

    Ok((drainage_area, discharge))
}

/// Calculate drainage area and discharge from a receiver array.
///
/// Builds the donor index and the stack, seeds every node with its cell
/// area and `cell_area * runoff`, and accumulates downstream.
///
/// # Arguments
/// * `receivers` - Receiver of every node; roots drain to themselves
/// * `params` - Seeding parameters
///
/// # Returns
/// [`FlowAccumulationResult`] with `f64` area and discharge
///
/// # Example
/// ```
/// use drainstack_algorithms::hydrology::{flow_accumulation, AccumulationParams};
///
/// // 2 -> 1, 3 -> 1, 1 -> 0, 0 is the outlet
/// let result = flow_accumulation(&[0, 0, 1, 1], AccumulationParams::default()).unwrap();
/// assert_eq!(result.drainage_area.to_vec(), vec![4.0, 3.0, 1.0, 1.0]);
/// ```
pub fn flow_accumulation(
    receivers: &[NodeId],
    params: AccumulationParams,
) -> Result<FlowAccumulationResult> {
    flow_accumulation_lossy(receivers, params, |q, _, _| q)
}

/// Same as [`flow_accumulation`], with a transmission loss applied on every
/// donor-to-receiver edge.
pub fn flow_accumulation_lossy<F>(
    receivers: &[NodeId],
    params: AccumulationParams,
    loss: F,
) -> Result<FlowAccumulationResult>
where
    F: FnMut(f64, NodeId, NodeId) -> f64,
{
    let index = DonorIndex::from_receivers(receivers)?;
    let stack = make_ordered_node_array(receivers, &index)?;

    let (drainage_area, discharge) =
        find_drainage_area_and_discharge_lossy::<f64, _>(&stack, receivers, &params, loss)?;

    debug!(
        nodes = receivers.len(),
        max_area = drainage_area.iter().copied().fold(0.0, f64::max),
        "flow accumulation complete"
    );

    Ok(FlowAccumulationResult {
        drainage_area: Array1::from_vec(drainage_area),
        discharge: Array1::from_vec(discharge),
        stack,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hydrology::seeds::Seed;

    #[test]
    fn test_flow_accumulation_linear() {
        // Chain 4 -> 3 -> 2 -> 1 -> 0, node 0 is the outlet
        // Area: 5 4 3 2 1
        let receivers = [0, 0, 1, 2, 3];
        let result = flow_accumulation(&receivers, AccumulationParams::default()).unwrap();

        assert_eq!(result.drainage_area.to_vec(), vec![5.0, 4.0, 3.0, 2.0, 1.0]);
        assert_eq!(result.discharge.to_vec(), vec![5.0, 4.0, 3.0, 2.0, 1.0]);
        assert_eq!(result.stack, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_flow_accumulation_convergent() {
        // 3x3 grid, every cell drains to the centre
        //  0 1 2
        //  3 4 5
        //  6 7 8
        let receivers = [4; 9];
        let result = flow_accumulation(&receivers, AccumulationParams::default()).unwrap();

        let center = result.drainage_area[4];
        assert_eq!(
            center, 9.0,
            "Center should accumulate all 8 neighbors plus itself, got {}",
            center
        );
        for node in [0, 1, 2, 3, 5, 6, 7, 8] {
            assert_eq!(result.drainage_area[node], 1.0);
        }
    }

    #[test]
    fn test_flow_accumulation_plane() {
        // 5x5 plane draining south: each cell drains to the one below it,
        // the bottom row are outlets
        let size = 5;
        let receivers: Vec<NodeId> = (0..size * size)
            .map(|i| if i / size == size - 1 { i } else { i + size })
            .collect();

        let result = flow_accumulation(&receivers, AccumulationParams::default()).unwrap();

        for col in 0..size {
            assert_eq!(result.drainage_area[col], 1.0, "Top row should have area 1");
            assert_eq!(
                result.drainage_area[(size - 1) * size + col],
                size as f64,
                "Bottom row should collect the full column"
            );
        }
    }

    #[test]
    fn test_cell_area_and_runoff() {
        let receivers = [0, 0, 1, 1];
        let params = AccumulationParams {
            cell_area: Seed::Uniform(100.0),
            runoff: Seed::PerNode(vec![0.0, 0.5, 2.0, -1.0]),
            boundary_nodes: vec![],
        };
        let result = flow_accumulation(&receivers, params).unwrap();

        assert_eq!(result.drainage_area.to_vec(), vec![400.0, 300.0, 100.0, 100.0]);
        // Node 1: 50 + (-100) floored = 0, then + 200 = 200 (stack order 0, 1, 2, 3)
        // Node 0: 0 + 200 = 200
        assert_eq!(result.discharge.to_vec(), vec![200.0, 200.0, 200.0, -100.0]);
    }

    #[test]
    fn test_boundary_nodes() {
        // Node 0 is a boundary outlet and contributes no area of its own
        let receivers = [0, 0, 1];
        let params = AccumulationParams {
            boundary_nodes: vec![0],
            ..Default::default()
        };
        let result = flow_accumulation(&receivers, params).unwrap();
        assert_eq!(result.drainage_area.to_vec(), vec![2.0, 2.0, 1.0]);
    }

    #[test]
    fn test_lossy_driver() {
        let receivers = [0, 0, 1];
        let params = AccumulationParams::default();
        let result = flow_accumulation_lossy(&receivers, params, |q, _, _| q - 0.25).unwrap();
        // 1: 1 + 0.75 = 1.75; 0: 1 + 1.5 = 2.5
        assert_eq!(result.discharge.to_vec(), vec![2.5, 1.75, 1.0]);
        assert_eq!(result.drainage_area.to_vec(), vec![3.0, 2.0, 1.0]);
    }

    #[test]
    fn test_find_drainage_area_and_discharge_f32() {
        let stack = [0, 1, 2, 3];
        let receivers = [0, 0, 1, 1];
        let params = AccumulationParams::default();
        let (area, q) =
            find_drainage_area_and_discharge::<f32>(&stack, &receivers, &params).unwrap();
        assert_eq!(area, vec![4.0f32, 3.0, 1.0, 1.0]);
        assert_eq!(q, vec![4.0f32, 3.0, 1.0, 1.0]);
    }

    #[test]
    fn test_stack_length_mismatch() {
        let params = AccumulationParams::default();
        let err =
            find_drainage_area_and_discharge::<f64>(&[0, 1], &[0, 0, 1], &params).unwrap_err();
        assert!(matches!(
            err,
            Error::ShapeMismatch { what: "stack", expected: 3, actual: 2 }
        ));
    }

    #[test]
    fn test_cycle_rejected() {
        let err = flow_accumulation(&[0, 2, 1], AccumulationParams::default()).unwrap_err();
        assert!(matches!(err, Error::IncompleteTraversal { .. }));
    }

    #[test]
    fn test_algorithm_trait() {
        let algo = FlowAccumulation;
        assert_eq!(algo.name(), "Flow Accumulation");
        let result = algo.execute_default(vec![0, 0, 1, 1]).unwrap();
        assert_eq!(result.drainage_area[0], 4.0);
    }
}
