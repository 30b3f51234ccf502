//! Per-node / per-cell blanking classification.

use serde::{Deserialize, Serialize};

/// Blanking state of a node or cell. The discriminants match the historical
/// integer encoding (1 / 0 / −1) used by flow solvers consuming the
/// assembly.
#[repr(i8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Blanking {
    /// Solved natively on this grid.
    Field = 1,
    /// Cut out of the computation entirely.
    Hole = 0,
    /// Receives its value by interpolation from a donor elsewhere.
    Interpolated = -1,
}

impl Blanking {
    /// The solver-facing integer encoding.
    #[inline]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn from_i32(v: i32) -> Option<Self> {
        match v {
            1 => Some(Blanking::Field),
            0 => Some(Blanking::Hole),
            -1 => Some(Blanking::Interpolated),
            _ => None,
        }
    }
}
