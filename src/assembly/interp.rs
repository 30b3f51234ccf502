//! Building weighted interpolation records from resolved donor assignments.
//!
//! Two parallel lists exist — generic unstructured donors and
//! Cartesian-background donors — because the two searches use different
//! candidate buffers and identity encodings. They share one record schema:
//! the Cartesian path carries a secondary local id, the generic path leaves
//! it absent.

use serde::{Deserialize, Serialize};

use crate::error::OversetError;
use crate::geometry::weights::NodalWeightSolver;
use crate::mesh::block::MeshBlock;
use crate::mesh::donor::DonorId;

/// Identity of a receptor on its owning rank. `cart_id` is the secondary
/// local id present only for Cartesian-path records.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceptorRef {
    pub rank: i32,
    pub point_id: i32,
    pub cart_id: Option<i32>,
}

/// One receptor's interpolation stencil.
///
/// Invariant: `donor_nodes.len() == weights.len() ==` the donor cell's
/// vertex count. For a geometrically valid assignment the weights form a
/// convex combination; violations are tolerated and reported downstream,
/// never fatal. `cancel` is set externally when a later, better donor
/// supersedes this record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InterpRecord {
    pub receptor: ReceptorRef,
    pub donor_nodes: Vec<usize>,
    pub weights: Vec<f64>,
    pub cancel: bool,
}

/// One flattened candidate point as handed back by a donor search.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub rank: i32,
    pub point_id: i32,
    pub cart_id: Option<i32>,
    pub xyz: [f64; 3],
    /// Assigned donor element, or `None` if the search came up empty.
    pub donor: Option<DonorId>,
}

fn build_records<W: NodalWeightSolver>(
    block: &MeshBlock,
    candidates: &[Candidate],
    solver: &W,
) -> Result<Vec<InterpRecord>, OversetError> {
    let resolved = candidates.iter().filter(|c| c.donor.is_some()).count();
    let mut records = Vec::with_capacity(resolved);
    for cand in candidates {
        let Some(donor) = cand.donor else { continue };
        let nodes = block.donor_cell_nodes(donor)?;
        let mut verts = Vec::with_capacity(nodes.len());
        for &v in nodes {
            verts.push(block.coords[v]);
        }
        let weights = solver.nodal_weights(&verts, cand.xyz)?;
        debug_assert_eq!(weights.len(), nodes.len());
        records.push(InterpRecord {
            receptor: ReceptorRef {
                rank: cand.rank,
                point_id: cand.point_id,
                cart_id: cand.cart_id,
            },
            donor_nodes: nodes.to_vec(),
            weights,
            cancel: false,
        });
    }
    // One record per resolved candidate, in candidate order. Anything else
    // is a programming error and the round must not reach packing.
    if records.len() != resolved {
        debug_assert_eq!(records.len(), resolved);
        return Err(OversetError::InterpCountMismatch {
            built: records.len(),
            resolved,
        });
    }
    Ok(records)
}

/// Rebuild the block's generic interpolation list from `candidates`:
/// one record per resolved candidate, relative order preserved, unresolved
/// candidates dropped. The previous list is released first. Returns the
/// record count.
pub fn build_interpolation_list<W: NodalWeightSolver>(
    block: &mut MeshBlock,
    candidates: &[Candidate],
    solver: &W,
) -> Result<usize, OversetError> {
    block.interp = Vec::new();
    let records = build_records(block, candidates, solver)?;
    let n = records.len();
    block.interp = records;
    Ok(n)
}

/// Rebuild the block's Cartesian interpolation list; same contract as
/// [`build_interpolation_list`], candidates carry the secondary id.
pub fn build_cartesian_interpolation_list<W: NodalWeightSolver>(
    block: &mut MeshBlock,
    candidates: &[Candidate],
    solver: &W,
) -> Result<usize, OversetError> {
    block.interp_cart = Vec::new();
    let records = build_records(block, candidates, solver)?;
    let n = records.len();
    block.interp_cart = records;
    Ok(n)
}
