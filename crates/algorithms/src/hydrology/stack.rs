//! Stack ordering of a drainage network
//!
//! Linearizes a single-receiver network by depth-first traversal of the
//! donor relation, starting at every root. Each node is written to the
//! stack before any of its donors, so reading the stack back to front
//! visits a node only after everything upstream of it.

use drainstack_core::network::is_root;
use drainstack_core::{DonorIndex, Error, NodeId, Result};
use tracing::{debug, trace};

/// Ascending list of root nodes (nodes that are their own receiver).
pub fn find_roots(receivers: &[NodeId]) -> Vec<NodeId> {
    (0..receivers.len())
        .filter(|&node| is_root(receivers, node))
        .collect()
}

/// Write the subtree of `root` into `stack` starting at `cursor`.
///
/// Returns the cursor after the last node written. Donors are visited
/// depth-first in donor-list order; self entries (a root listed as its own
/// donor) are skipped.
///
/// This variant tracks visited nodes for a single subtree only. Use
/// [`build_stack_with_visited`] to share the visited set across roots.
///
/// # Errors
/// - `IndexOutOfRange` if `root` is not a node of `index`, or the subtree
///   does not fit in `stack`
/// - `CycleDetected` if a node is reached twice
pub fn build_stack(
    root: NodeId,
    cursor: usize,
    stack: &mut [NodeId],
    index: &DonorIndex,
) -> Result<usize> {
    let mut visited = vec![false; index.num_nodes()];
    build_stack_with_visited(root, cursor, stack, index, &mut visited)
}

/// Same as [`build_stack`], with a caller-owned visited marker array.
///
/// `visited` must have one entry per node. Nodes written by this call are
/// marked; a node that is already marked when reached is reported as a
/// cycle.
pub fn build_stack_with_visited(
    root: NodeId,
    mut cursor: usize,
    stack: &mut [NodeId],
    index: &DonorIndex,
    visited: &mut [bool],
) -> Result<usize> {
    let num_nodes = index.num_nodes();
    if root >= num_nodes {
        return Err(Error::node_out_of_range("root", root, num_nodes));
    }
    if visited.len() != num_nodes {
        return Err(Error::shape("visited", num_nodes, visited.len()));
    }

    let stack_len = stack.len();

    // Explicit work list instead of recursion: depth is bounded by memory,
    // not by the call stack.
    let mut pending: Vec<NodeId> = vec![root];

    while let Some(node) = pending.pop() {
        if visited[node] {
            return Err(Error::CycleDetected { node });
        }
        visited[node] = true;

        let slot = stack
            .get_mut(cursor)
            .ok_or(Error::node_out_of_range("stack position", cursor, stack_len))?;
        *slot = node;
        cursor += 1;

        // Reverse order so the first donor is popped first (pre-order)
        let donors = index.donors_of(node)?;
        pending.extend(donors.iter().rev().copied().filter(|&m| m != node));
    }

    Ok(cursor)
}

/// Check that the receiver map and the donor index describe the same network.
fn check_network(receivers: &[NodeId], index: &DonorIndex) -> Result<()> {
    let n = receivers.len();
    if index.num_nodes() != n {
        return Err(Error::shape("donor index", n, index.num_nodes()));
    }

    if let Some(&bad) = receivers.iter().find(|&&r| r >= n) {
        return Err(Error::node_out_of_range("receiver", bad, n));
    }

    for listed_under in 0..n {
        for &donor in index.donors_of(listed_under)? {
            let receiver = receivers[donor];
            if donor != listed_under && receiver != listed_under {
                return Err(Error::DonorMismatch {
                    donor,
                    listed_under,
                    receiver,
                });
            }
        }
    }

    Ok(())
}

/// Build the full stack for a network.
///
/// Every root is traversed once, in ascending node order, and the
/// resulting subtrees are laid out one after another.
///
/// # Arguments
/// * `receivers` - Receiver of every node
/// * `index` - Donor index of the same network
///
/// # Returns
/// A permutation of `0..N` in which every node precedes its donors
///
/// # Errors
/// - `ShapeMismatch` if `index` covers a different number of nodes
/// - `IndexOutOfRange` for a receiver id outside `0..N`
/// - `DonorMismatch` if `index` lists a donor under the wrong receiver
/// - `CycleDetected` if a node is reachable twice
/// - `IncompleteTraversal` if some nodes are not reachable from any root
///   (they sit on a receiver cycle)
pub fn make_ordered_node_array(receivers: &[NodeId], index: &DonorIndex) -> Result<Vec<NodeId>> {
    check_network(receivers, index)?;

    let n = receivers.len();
    let roots = find_roots(receivers);
    debug!(
        nodes = n,
        roots = roots.len(),
        donor_entries = index.num_entries(),
        "building drainage stack"
    );

    let mut stack = vec![0; n];
    let mut visited = vec![false; n];
    let mut cursor = 0;

    for root in roots {
        let start = cursor;
        cursor = build_stack_with_visited(root, cursor, &mut stack, index, &mut visited)?;
        trace!(root, basin_size = cursor - start, "basin ordered");
    }

    if cursor != n {
        return Err(Error::IncompleteTraversal {
            visited: cursor,
            expected: n,
        });
    }

    Ok(stack)
}
