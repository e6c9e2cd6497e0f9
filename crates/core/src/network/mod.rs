//! Drainage network data structures

mod donor_index;
mod element;

pub use donor_index::{count_donors, make_delta, DonorIndex};
pub use element::FlowElement;

/// Node identity: an index into the per-node arrays
pub type NodeId = usize;

/// Whether `node` is a root (its own receiver).
///
/// Out-of-range ids are never roots.
#[inline]
pub fn is_root(receivers: &[NodeId], node: NodeId) -> bool {
    receivers.get(node) == Some(&node)
}
