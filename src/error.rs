//! OversetError: unified error type for mesh-overset public APIs.
//!
//! This error type is used throughout the mesh-overset library to provide
//! robust, non-panicking error handling for all public APIs. Geometric
//! anomalies (non-convex weights) are *not* errors; they travel through the
//! diagnostics channel instead. Everything here either aborts the current
//! assembly round or tells the caller its input was malformed.

use thiserror::Error;

/// Unified error type for mesh-overset operations.
#[derive(Debug, Error)]
pub enum OversetError {
    /// A flat donor element id does not fall inside any element-type range.
    #[error("donor id {donor} out of range (block has {ncells} cells)")]
    DonorOutOfRange { donor: usize, ncells: usize },

    /// A donor cell has a vertex count no weight solver supports.
    #[error("unsupported donor cell shape with {0} vertices")]
    UnsupportedCellShape(usize),

    /// The isoparametric map of a donor cell has a singular Jacobian.
    #[error("degenerate donor cell: isoparametric Jacobian determinant {det:.3e}")]
    DegenerateDonorCell { det: f64 },

    /// The interpolation-list builder produced a different number of records
    /// than there were resolved candidates. Programming-invariant violation;
    /// the assembly round must not continue into packing.
    #[error("interpolation list built {built} records for {resolved} resolved candidates")]
    InterpCountMismatch { built: usize, resolved: usize },

    /// Failure in the underlying data exchange with `neighbor`.
    #[error("communication error with rank {neighbor}: {source}")]
    CommError {
        neighbor: usize,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An inbound packet's real payload is not three coordinates per point.
    #[error("malformed packet from rank {neighbor}: {nints} ints, {nreals} reals")]
    PacketShape {
        neighbor: usize,
        nints: usize,
        nreals: usize,
    },

    /// A per-peer argument list does not match the communicator's adjacency.
    #[error("adjacency mismatch: got {got} entries for {expected} peers")]
    AdjacencyMismatch { got: usize, expected: usize },

    /// Connectivity references a node outside the block's coordinate array.
    #[error("connectivity references node {node} but block has {nnodes} nodes")]
    NodeOutOfRange { node: usize, nnodes: usize },
}
