//! Donor index: the inverse of the receiver map in compressed sparse row form

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Count how many nodes drain into each node.
///
/// A root (a node that is its own receiver) counts itself as one of its
/// donors, so the counts always sum to `receivers.len()`.
pub fn count_donors(receivers: &[usize]) -> Result<Vec<usize>> {
    let n = receivers.len();
    let mut number_of_donors = vec![0usize; n];

    for &r in receivers {
        if r >= n {
            return Err(Error::node_out_of_range("receiver", r, n));
        }
        number_of_donors[r] += 1;
    }

    Ok(number_of_donors)
}

/// Turn per-node donor counts into CSR offsets.
///
/// The result has `len + 1` entries: `delta[i]..delta[i + 1]` is the slice
/// of the donor list that belongs to node `i`, and the last entry is the
/// total number of donor entries.
pub fn make_delta(number_of_donors: &[usize]) -> Vec<usize> {
    let mut delta = Vec::with_capacity(number_of_donors.len() + 1);
    let mut offset = 0usize;
    delta.push(offset);
    for &count in number_of_donors {
        offset += count;
        delta.push(offset);
    }
    delta
}

/// Inverse adjacency of a receiver map.
///
/// `delta[l]..delta[l + 1]` is the half-open range, within `donors`, of the
/// nodes whose receiver is `l`.
///
/// # Example
///
/// ```
/// use drainstack_core::DonorIndex;
///
/// // 2 -> 1, 3 -> 1, 1 -> 0, 0 is a root
/// let index = DonorIndex::from_receivers(&[0, 0, 1, 1]).unwrap();
/// assert_eq!(index.donors_of(1).unwrap(), &[2, 3]);
/// assert_eq!(index.donors_of(0).unwrap(), &[0, 1]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DonorIndexParts")]
pub struct DonorIndex {
    /// CSR offsets, length `num_nodes + 1`
    delta: Vec<usize>,
    /// Flattened donor ids grouped by receiver
    donors: Vec<usize>,
}

impl DonorIndex {
    /// Build the donor index of a receiver map.
    ///
    /// Donors within one receiver's slice are listed in ascending node id
    /// order. Roots appear as their own donor.
    pub fn from_receivers(receivers: &[usize]) -> Result<Self> {
        let number_of_donors = count_donors(receivers)?;
        let delta = make_delta(&number_of_donors);

        // Write cursor per receiver, starting at its slice offset
        let mut cursor: Vec<usize> = delta[..receivers.len()].to_vec();
        let mut donors = vec![0usize; receivers.len()];

        for (node, &r) in receivers.iter().enumerate() {
            donors[cursor[r]] = node;
            cursor[r] += 1;
        }

        Ok(Self { delta, donors })
    }

    /// Wrap a caller-supplied CSR structure after validating it.
    pub fn from_parts(delta: Vec<usize>, donors: Vec<usize>, num_nodes: usize) -> Result<Self> {
        if delta.len() != num_nodes + 1 {
            return Err(Error::shape("delta", num_nodes + 1, delta.len()));
        }
        if delta[0] != 0 {
            return Err(Error::shape("delta[0]", 0, delta[0]));
        }
        if delta[num_nodes] != donors.len() {
            return Err(Error::shape("delta[N]", donors.len(), delta[num_nodes]));
        }
        if let Some(i) = delta.windows(2).position(|w| w[1] < w[0]) {
            return Err(Error::InvalidParameter {
                name: "delta",
                value: format!("delta[{}] = {}, delta[{}] = {}", i, delta[i], i + 1, delta[i + 1]),
                reason: "offsets must be non-decreasing".into(),
            });
        }
        if let Some(&bad) = donors.iter().find(|&&d| d >= num_nodes) {
            return Err(Error::node_out_of_range("donor", bad, num_nodes));
        }

        Ok(Self { delta, donors })
    }

    /// Number of nodes covered by the index
    pub fn num_nodes(&self) -> usize {
        self.delta.len() - 1
    }

    /// Total number of donor entries
    pub fn num_entries(&self) -> usize {
        self.donors.len()
    }

    /// Whether the index covers no nodes
    pub fn is_empty(&self) -> bool {
        self.num_nodes() == 0
    }

    /// Donors of `node`, in index order
    pub fn donors_of(&self, node: usize) -> Result<&[usize]> {
        if node >= self.num_nodes() {
            return Err(Error::node_out_of_range("node", node, self.num_nodes()));
        }
        Ok(&self.donors[self.delta[node]..self.delta[node + 1]])
    }

    /// Number of donor entries listed for `node`
    pub fn number_of_donors(&self, node: usize) -> Result<usize> {
        self.donors_of(node).map(<[usize]>::len)
    }

    /// CSR offsets
    pub fn delta(&self) -> &[usize] {
        &self.delta
    }

    /// Flattened donor list
    pub fn donors(&self) -> &[usize] {
        &self.donors
    }

    /// Consume the index and return `(delta, donors)`
    pub fn into_parts(self) -> (Vec<usize>, Vec<usize>) {
        (self.delta, self.donors)
    }
}

/// Unvalidated serde form of [`DonorIndex`]
#[derive(Deserialize)]
struct DonorIndexParts {
    delta: Vec<usize>,
    donors: Vec<usize>,
}

impl TryFrom<DonorIndexParts> for DonorIndex {
    type Error = Error;

    fn try_from(parts: DonorIndexParts) -> Result<Self> {
        let num_nodes = parts
            .delta
            .len()
            .checked_sub(1)
            .ok_or_else(|| Error::shape("delta", 1, 0))?;
        Self::from_parts(parts.delta, parts.donors, num_nodes)
    }
}

impl Default for DonorIndex {
    fn default() -> Self {
        Self {
            delta: vec![0],
            donors: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_donors() {
        let counts = count_donors(&[0, 0, 1, 1]).unwrap();
        assert_eq!(counts, vec![2, 2, 0, 0]);
        assert_eq!(counts.iter().sum::<usize>(), 4);
    }

    #[test]
    fn test_count_donors_out_of_range() {
        let err = count_donors(&[0, 7]).unwrap_err();
        assert_eq!(err, Error::node_out_of_range("receiver", 7, 2));
    }

    #[test]
    fn test_make_delta() {
        assert_eq!(make_delta(&[2, 2, 0, 0]), vec![0, 2, 4, 4, 4]);
        assert_eq!(make_delta(&[]), vec![0]);
    }

    #[test]
    fn test_from_receivers_grid() {
        // 3x3 grid draining to the centre (node 4), which is the only root
        let receivers = [4, 4, 4, 4, 4, 4, 4, 4, 4];
        let index = DonorIndex::from_receivers(&receivers).unwrap();

        assert_eq!(index.num_nodes(), 9);
        assert_eq!(index.num_entries(), 9);
        assert_eq!(index.donors_of(4).unwrap(), &[0, 1, 2, 3, 4, 5, 6, 7, 8]);
        for node in [0, 1, 2, 3, 5, 6, 7, 8] {
            assert!(index.donors_of(node).unwrap().is_empty());
        }
    }

    #[test]
    fn test_from_receivers_branching() {
        // Two basins: 0 <- 1 <- {2, 3} and 4 <- 5
        let receivers = [0, 0, 1, 1, 4, 4];
        let index = DonorIndex::from_receivers(&receivers).unwrap();

        assert_eq!(index.delta(), &[0, 2, 4, 4, 4, 6, 6]);
        assert_eq!(index.donors(), &[0, 1, 2, 3, 4, 5]);
        assert_eq!(index.number_of_donors(1).unwrap(), 2);
    }

    #[test]
    fn test_from_parts_valid() {
        let index = DonorIndex::from_parts(vec![0, 1, 3, 3, 3], vec![1, 2, 3], 4).unwrap();
        assert_eq!(index.donors_of(1).unwrap(), &[2, 3]);
    }

    #[test]
    fn test_from_parts_bad_length() {
        let err = DonorIndex::from_parts(vec![0, 1, 2], vec![1, 2], 4).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { what: "delta", expected: 5, actual: 3 }));
    }

    #[test]
    fn test_from_parts_bad_total() {
        let err = DonorIndex::from_parts(vec![0, 1, 2], vec![1], 2).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { what: "delta[N]", .. }));
    }

    #[test]
    fn test_from_parts_decreasing() {
        let err = DonorIndex::from_parts(vec![0, 2, 1, 2], vec![1, 2], 3).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { name: "delta", .. }));
    }

    #[test]
    fn test_from_parts_donor_out_of_range() {
        let err = DonorIndex::from_parts(vec![0, 1, 1], vec![5], 2).unwrap_err();
        assert_eq!(err, Error::node_out_of_range("donor", 5, 2));
    }

    #[test]
    fn test_donors_of_out_of_range() {
        let index = DonorIndex::from_receivers(&[0, 0]).unwrap();
        assert!(matches!(
            index.donors_of(2),
            Err(Error::IndexOutOfRange { index: 2, len: 2, .. })
        ));
    }

    #[test]
    fn test_empty() {
        let index = DonorIndex::from_receivers(&[]).unwrap();
        assert!(index.is_empty());
        assert_eq!(index, DonorIndex::default());
    }

    #[test]
    fn test_serde_roundtrip() {
        let index = DonorIndex::from_receivers(&[0, 0, 1]).unwrap();
        let json = serde_json::to_string(&index).unwrap();
        let back: DonorIndex = serde_json::from_str(&json).unwrap();
        assert_eq!(index, back);
    }

    #[test]
    fn test_deserialize_rejects_malformed() {
        let json = r#"{"delta":[0,3],"donors":[0]}"#;
        assert!(serde_json::from_str::<DonorIndex>(json).is_err());

        let json = r#"{"delta":[],"donors":[]}"#;
        assert!(serde_json::from_str::<DonorIndex>(json).is_err());
    }
}
