//! # mesh-overset
//!
//! mesh-overset is the donor/receptor resolution and inter-rank data-exchange
//! core of a parallel overset-grid assembly library. Given overlapping mesh
//! partitions distributed across ranks, it classifies which points must
//! receive interpolated field values, builds a weighted interpolation record
//! per receptor, packs field data into transmission buffers, and runs the
//! personalized point exchange that routes query points between partitions.
//!
//! ## Features
//! - `MeshBlock` partition state with explicit per-round buffer lifecycle
//! - Mandatory-receptor classification against a Cartesian background grid,
//!   with consistent blanking updates
//! - Interpolation-list building with isoparametric nodal weights for
//!   tet/pyramid/prism/hex donors
//! - Solution packing in node-major or variable-major field layouts
//! - Pluggable communication backends (serial, intra-process threaded, MPI)
//!   behind one blocking personalized-exchange trait
//!
//! ## Execution model
//!
//! Single-program-multiple-data across a fixed set of ranks; no threads
//! within a rank in this core. The only suspension point is the personalized
//! exchange, which blocks until every expected inbound packet has arrived.
//! Within one round, the flattened search buffers are deterministic given a
//! fixed adjacency and per-peer point ordering.
//!
//! ## Usage
//! Add `mesh-overset` as a dependency and enable features as needed:
//!
//! ```toml
//! [dependencies]
//! mesh-overset = "0.3"
//! # features = ["mpi-support"]
//! ```

pub mod assembly;
pub mod comm;
pub mod diagnostics;
pub mod error;
pub mod geometry;
pub mod mesh;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::assembly::exchange::{
        ExchangeMode, QuerySource, exchange_search_points, exchange_search_points_with,
    };
    pub use crate::assembly::interp::{
        Candidate, InterpRecord, ReceptorRef, build_cartesian_interpolation_list,
        build_interpolation_list,
    };
    pub use crate::assembly::pack::{FieldLayout, PackedSolution, pack_interpolated_solution};
    pub use crate::assembly::receptor::{
        ReceptorScan, apply_cartesian_blanking, identify_mandatory_receptors,
    };
    #[cfg(feature = "mpi-support")]
    pub use crate::comm::communicator::MpiComm;
    pub use crate::comm::communicator::{Communicator, LocalComm, NoComm, RankMap};
    pub use crate::comm::packet::Packet;
    pub use crate::diagnostics::{CollectSink, DiagnosticEvent, DiagnosticSink, LogSink};
    pub use crate::error::OversetError;
    pub use crate::geometry::obb::Obb;
    pub use crate::geometry::weights::{CellSampler, IsoparametricSolver, NodalWeightSolver};
    pub use crate::mesh::blanking::Blanking;
    pub use crate::mesh::block::{CellBlock, CellId, MeshBlock, SearchOrigin};
    pub use crate::mesh::donor::{DonorId, DonorIndex};
}
