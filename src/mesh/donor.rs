//! Flat donor ids and the per-round prefix-sum table that decodes them.
//!
//! The donor search hands back a single flat element id that indexes the
//! concatenation of all element types. The list builder needs it as
//! `(element type, local element index)`; [`DonorIndex`] is the explicit
//! lookup structure for that decode, built once per assembly round. An
//! unresolved donor is simply `Option::<DonorId>::None` — absence is not an
//! error anywhere in this crate.

use serde::{Deserialize, Serialize};

use crate::error::OversetError;

/// Flat donor element id across all element types of one block, 0-based.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[repr(transparent)]
pub struct DonorId(pub usize);

/// Prefix-sum table over per-type element counts.
///
/// `ends[t]` is the first flat id *past* element type `t`, so a flat id `d`
/// belongs to the first type with `d < ends[t]`. The decode is a pure
/// function of `(d, per-type counts)`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DonorIndex {
    ends: Vec<usize>,
}

impl DonorIndex {
    pub fn new(counts_per_type: &[usize]) -> Self {
        let mut ends = Vec::with_capacity(counts_per_type.len());
        let mut total = 0;
        for &c in counts_per_type {
            total += c;
            ends.push(total);
        }
        Self { ends }
    }

    /// Total element count across all types.
    pub fn num_cells(&self) -> usize {
        self.ends.last().copied().unwrap_or(0)
    }

    /// Decode a flat donor id into `(element type, local element index)`.
    ///
    /// # Errors
    /// `DonorOutOfRange` if `donor` is past the last element.
    pub fn decode(&self, donor: DonorId) -> Result<(usize, usize), OversetError> {
        let t = self.ends.partition_point(|&end| end <= donor.0);
        if t == self.ends.len() {
            return Err(OversetError::DonorOutOfRange {
                donor: donor.0,
                ncells: self.num_cells(),
            });
        }
        let start = if t == 0 { 0 } else { self.ends[t - 1] };
        Ok((t, donor.0 - start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn decode_walks_type_ranges() {
        let idx = DonorIndex::new(&[3, 0, 4]);
        assert_eq!(idx.num_cells(), 7);
        assert_eq!(idx.decode(DonorId(0)).unwrap(), (0, 0));
        assert_eq!(idx.decode(DonorId(2)).unwrap(), (0, 2));
        // Type 1 is empty; id 3 starts type 2.
        assert_eq!(idx.decode(DonorId(3)).unwrap(), (2, 0));
        assert_eq!(idx.decode(DonorId(6)).unwrap(), (2, 3));
    }

    #[test]
    fn decode_rejects_out_of_range() {
        let idx = DonorIndex::new(&[2, 2]);
        assert!(matches!(
            idx.decode(DonorId(4)),
            Err(OversetError::DonorOutOfRange { donor: 4, ncells: 4 })
        ));
    }

    #[test]
    fn empty_index_has_no_cells() {
        let idx = DonorIndex::new(&[]);
        assert_eq!(idx.num_cells(), 0);
        assert!(idx.decode(DonorId(0)).is_err());
    }

    proptest! {
        /// Re-encoding `(type, local)` by summing preceding type counts must
        /// give back the flat id, for every valid id.
        #[test]
        fn decode_is_inverse_of_prefix_sum(
            counts in proptest::collection::vec(0usize..9, 1..6),
        ) {
            let idx = DonorIndex::new(&counts);
            for d in 0..idx.num_cells() {
                let (t, local) = idx.decode(DonorId(d)).unwrap();
                prop_assert!(local < counts[t]);
                let start: usize = counts[..t].iter().sum();
                prop_assert_eq!(start + local, d);
            }
        }
    }
}
