//! Per-peer transmission buffers for one exchange round.

use serde::{Deserialize, Serialize};

/// One peer's payload for a single exchange round: a flat integer buffer and
/// a flat real buffer, counts implied by the lengths. Empty packets are valid
/// and exchanged with zero counts.
///
/// A `Packet` is transient: it is built by the rank that sends it, copied
/// into the receiving rank's address space by the transport, and dropped as
/// soon as it has been flattened into the search buffers. Nothing aliases a
/// packet across ranks.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Packet {
    pub ints: Vec<i32>,
    pub reals: Vec<f64>,
}

impl Packet {
    pub fn new(ints: Vec<i32>, reals: Vec<f64>) -> Self {
        Self { ints, reals }
    }

    /// A packet carrying `points` as query points: one local id and three
    /// coordinates per point.
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = (i32, [f64; 3])>,
    {
        let mut ints = Vec::new();
        let mut reals = Vec::new();
        for (id, xyz) in points {
            ints.push(id);
            reals.extend_from_slice(&xyz);
        }
        Self { ints, reals }
    }

    pub fn is_empty(&self) -> bool {
        self.ints.is_empty() && self.reals.is_empty()
    }
}
