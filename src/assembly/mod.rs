//! The assembly core: receptor classification, interpolation-list building,
//! solution packing, and the inter-rank search-point exchange.

pub mod exchange;
pub mod interp;
pub mod pack;
pub mod receptor;

pub use exchange::{ExchangeMode, QuerySource, exchange_search_points, exchange_search_points_with};
pub use interp::{
    Candidate, InterpRecord, ReceptorRef, build_cartesian_interpolation_list,
    build_interpolation_list,
};
pub use pack::{FieldLayout, PackedSolution, pack_interpolated_solution};
pub use receptor::{ReceptorScan, apply_cartesian_blanking, identify_mandatory_receptors};
