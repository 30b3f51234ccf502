//! Geometry collaborators for the assembly core.
//!
//! This module provides the oriented-bounding-box descriptor used to prune
//! candidate points per peer, and the nodal-weight solve that turns a donor
//! cell plus a query point into interpolation weights.

pub mod obb;
pub mod weights;

pub use obb::{Obb, write_obb};
pub use weights::{CellSampler, IsoparametricSolver, NodalWeightSolver};
