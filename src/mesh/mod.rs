//! One rank's mesh partition and the round-scoped state hanging off it.

pub mod blanking;
pub mod block;
pub mod donor;

pub use blanking::Blanking;
pub use block::{CartReceptorState, CellBlock, CellId, MeshBlock, SearchOrigin, SearchState};
pub use donor::{DonorId, DonorIndex};
