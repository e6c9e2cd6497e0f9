//! Drainage area and discharge accumulation along a stack
//!
//! Walks a stack (see [`super::stack`]) from back to front, so that each
//! node is fully resolved before it contributes to its receiver.

use drainstack_core::{Error, FlowElement, NodeId, Result};

/// Check that a pass over `stack[..n]` only touches valid nodes.
///
/// Runs before any value is mutated so a fault leaves the buffers as they were.
fn check_pass(
    n: usize,
    stack: &[NodeId],
    receivers: &[NodeId],
    area_len: usize,
    discharge_len: usize,
) -> Result<()> {
    let num_nodes = receivers.len();

    if n > stack.len() {
        return Err(Error::shape("stack", n, stack.len()));
    }
    if area_len != num_nodes {
        return Err(Error::shape("drainage_area", num_nodes, area_len));
    }
    if discharge_len != num_nodes {
        return Err(Error::shape("discharge", num_nodes, discharge_len));
    }

    for &donor in &stack[..n] {
        if donor >= num_nodes {
            return Err(Error::node_out_of_range("stack entry", donor, num_nodes));
        }
        let recvr = receivers[donor];
        if recvr >= num_nodes {
            return Err(Error::node_out_of_range("receiver", recvr, num_nodes));
        }
    }

    Ok(())
}

/// Accumulate drainage area and discharge over the first `n` stack entries.
///
/// For each node, from `stack[n - 1]` down to `stack[0]`, its area is added
/// to its receiver, and its discharge is combined with the receiver's and
/// clamped at zero. Roots have nowhere to deposit and are skipped.
///
/// The zero floor is applied after every single combination, so a receiver
/// driven negative by one donor is reset before the next donor adds to it.
///
/// # Arguments
/// * `n` - Number of valid stack entries (normally the node count)
/// * `stack` - Node order from [`super::make_ordered_node_array`]
/// * `receivers` - Receiver of every node
/// * `drainage_area` - Seeded per-node area, accumulated in place
/// * `discharge` - Seeded per-node discharge, accumulated in place
///
/// # Errors
/// - `ShapeMismatch` if `n` exceeds the stack, or an accumulator array does
///   not have one entry per node
/// - `IndexOutOfRange` for a stack entry or receiver outside `0..N`
pub fn accumulate<T: FlowElement>(
    n: usize,
    stack: &[NodeId],
    receivers: &[NodeId],
    drainage_area: &mut [T],
    discharge: &mut [T],
) -> Result<()> {
    accumulate_lossy(n, stack, receivers, drainage_area, discharge, |q, _, _| q)
}

/// Accumulate with a transmission loss on every donor-to-receiver edge.
///
/// `loss(q, donor, receiver)` returns the part of the donor's discharge `q`
/// that reaches the receiver. The returned value is combined with the
/// receiver's discharge and floored at zero exactly as in [`accumulate`].
/// Drainage area is never affected by the loss.
pub fn accumulate_lossy<T, F>(
    n: usize,
    stack: &[NodeId],
    receivers: &[NodeId],
    drainage_area: &mut [T],
    discharge: &mut [T],
    mut loss: F,
) -> Result<()>
where
    T: FlowElement,
    F: FnMut(T, NodeId, NodeId) -> T,
{
    check_pass(n, stack, receivers, drainage_area.len(), discharge.len())?;

    for &donor in stack[..n].iter().rev() {
        let recvr = receivers[donor];
        if donor == recvr {
            continue;
        }

        let area = drainage_area[donor];
        drainage_area[recvr] += area;

        let outflow = loss(discharge[donor], donor, recvr);
        discharge[recvr] = (discharge[recvr] + outflow).floor_at_zero();
    }

    Ok(())
}
