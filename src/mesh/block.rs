//! `MeshBlock`: one rank's partition of an overset component mesh.
//!
//! The block owns the geometry and connectivity plus every round-scoped
//! buffer of the assembly: Cartesian receptor state, the flattened search
//! buffers filled by the exchange protocol, and the two interpolation lists.
//! All of those are rebuilt each assembly round through explicit
//! replace operations (release-old-then-assign-new); nothing is silently
//! reused across rounds except the parametric-coordinate buffer, and only
//! when the candidate count is unchanged.

use serde::{Deserialize, Serialize};

use crate::assembly::interp::InterpRecord;
use crate::error::OversetError;
use crate::mesh::blanking::Blanking;
use crate::mesh::donor::{DonorId, DonorIndex};

/// 1-based cell tag, flat across all element types. Receptor-cell tags are
/// historically 1-based; keep that on the boundary and convert with
/// [`CellId::index0`] internally.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct CellId(pub usize);

impl CellId {
    #[inline]
    pub fn from_index0(i: usize) -> Self {
        CellId(i + 1)
    }

    /// The 0-based flat cell index.
    #[inline]
    pub fn index0(self) -> usize {
        self.0 - 1
    }
}

/// Connectivity for one element type: `ncells` cells of `nvert` vertices
/// each, 0-based node indices, row per cell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellBlock {
    pub nvert: usize,
    pub vertices: Vec<usize>,
}

impl CellBlock {
    pub fn new(nvert: usize, vertices: Vec<usize>) -> Self {
        debug_assert!(nvert > 0 && vertices.len() % nvert == 0);
        Self { nvert, vertices }
    }

    pub fn num_cells(&self) -> usize {
        self.vertices.len() / self.nvert
    }

    /// Vertex nodes of local cell `i`.
    #[inline]
    pub fn cell(&self, i: usize) -> &[usize] {
        &self.vertices[i * self.nvert..(i + 1) * self.nvert]
    }
}

/// Where a flattened search point came from: index of the sending peer in
/// this rank's receive set, and the point's local id on the sender.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOrigin {
    pub peer: usize,
    pub local_id: i32,
}

/// Flattened inbound query points, one entry per received point. The index
/// of a point in these buffers is a stable function of (receive order of
/// peers, arrival order within a peer's packet); downstream stages rely on
/// that to map an index back to its origin.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchState {
    pub origins: Vec<SearchOrigin>,
    /// 3 reals per point.
    pub coords: Vec<f64>,
    /// Mesh tag of the sending grid; filled by full rounds only.
    pub mesh_tags: Vec<i32>,
    /// Donor assignment per point, written by the donor search.
    pub donors: Vec<Option<DonorId>>,
    /// Parametric coordinates per point, 3 reals each. Survives an
    /// incremental round with unchanged count so iterative containment
    /// refinement keeps its convergence progress.
    pub rst: Vec<f64>,
}

impl SearchState {
    pub fn len(&self) -> usize {
        self.donors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.donors.is_empty()
    }

    #[inline]
    pub fn point(&self, i: usize) -> [f64; 3] {
        [self.coords[3 * i], self.coords[3 * i + 1], self.coords[3 * i + 2]]
    }

    /// Drop the previous round's buffers and size everything for `n`
    /// points, `rst` included.
    pub fn replace(&mut self, n: usize) {
        self.replace_buffers(n, true);
        self.rst = vec![0.0; 3 * n];
    }

    /// Like [`replace`](Self::replace), but keep `rst` untouched when the
    /// point count is unchanged. No mesh tags are recorded on this path.
    pub fn replace_keep_rst(&mut self, n: usize) {
        let count_changed = n != self.len();
        self.replace_buffers(n, false);
        if count_changed {
            self.rst = vec![0.0; 3 * n];
        }
    }

    fn replace_buffers(&mut self, n: usize, with_tags: bool) {
        self.origins = Vec::with_capacity(n);
        self.coords = Vec::with_capacity(3 * n);
        self.mesh_tags = if with_tags { Vec::with_capacity(n) } else { Vec::new() };
        self.donors = vec![None; n];
    }
}

/// Auxiliary state for the Cartesian-background interaction, rebuilt each
/// round by the receptor classifier.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CartReceptorState {
    /// Per node: is this node a Cartesian receptor candidate.
    pub picked: Vec<bool>,
    /// Cells selected as Cartesian receptor cells, 1-based, in scan order.
    pub receptor_cells: Vec<CellId>,
    /// Sample points per receptor cell; high-order mode only.
    pub points_per_cell: Vec<usize>,
    /// Largest entry of `points_per_cell`, for downstream buffer sizing.
    pub max_points_per_cell: usize,
    /// Flattened candidate coordinates, 3 reals per sample point.
    pub coords: Vec<f64>,
    /// Assigned donor per sample point; `None` until resolved.
    pub donors: Vec<Option<DonorId>>,
}

impl CartReceptorState {
    /// Release the previous round's buffers before the classifier refills
    /// them.
    pub fn begin_round(&mut self, nnodes: usize) {
        self.picked = vec![false; nnodes];
        self.receptor_cells = Vec::new();
        self.points_per_cell = Vec::new();
        self.max_points_per_cell = 0;
        self.coords = Vec::new();
        self.donors = Vec::new();
    }

    /// Total candidate sample points this round.
    pub fn total_points(&self) -> usize {
        self.donors.len()
    }
}

/// One rank's mesh partition.
#[derive(Clone, Debug, Default)]
pub struct MeshBlock {
    /// Tag of the component grid this partition belongs to.
    pub mesh_tag: i32,
    /// Node coordinates.
    pub coords: Vec<[f64; 3]>,
    /// Per-element-type connectivity.
    pub conn: Vec<CellBlock>,
    /// Per-node resolution; `None` marks a node with no usable donor
    /// anywhere, which is what forces the Cartesian path.
    pub node_res: Vec<Option<f64>>,
    /// Per-node blanking.
    pub iblank: Vec<Blanking>,
    /// Per-cell blanking, flat across element types.
    pub iblank_cell: Vec<Blanking>,
    /// High-order mode: receptor cells carry interior sample points.
    pub high_order: bool,
    /// Flat-donor-id decode table for this block's element types.
    pub donor_index: DonorIndex,
    /// Cartesian receptor candidates.
    pub cart: CartReceptorState,
    /// Flattened inbound search points.
    pub search: SearchState,
    /// Generic unstructured-donor interpolation list.
    pub interp: Vec<InterpRecord>,
    /// Cartesian-donor interpolation list.
    pub interp_cart: Vec<InterpRecord>,
}

impl MeshBlock {
    /// Build a block over `coords` and `conn`, with all nodes and cells
    /// initially field points and all node resolutions resolved at zero.
    ///
    /// # Errors
    /// `NodeOutOfRange` if any connectivity entry references a node past
    /// `coords`.
    pub fn new(
        mesh_tag: i32,
        coords: Vec<[f64; 3]>,
        conn: Vec<CellBlock>,
    ) -> Result<Self, OversetError> {
        let nnodes = coords.len();
        for block in &conn {
            if let Some(&node) = block.vertices.iter().find(|&&v| v >= nnodes) {
                return Err(OversetError::NodeOutOfRange { node, nnodes });
            }
        }
        let counts: Vec<usize> = conn.iter().map(|b| b.num_cells()).collect();
        let donor_index = DonorIndex::new(&counts);
        let ncells = donor_index.num_cells();
        Ok(Self {
            mesh_tag,
            coords,
            conn,
            node_res: vec![Some(0.0); nnodes],
            iblank: vec![Blanking::Field; nnodes],
            iblank_cell: vec![Blanking::Field; ncells],
            high_order: false,
            donor_index,
            cart: CartReceptorState::default(),
            search: SearchState::default(),
            interp: Vec::new(),
            interp_cart: Vec::new(),
        })
    }

    pub fn num_nodes(&self) -> usize {
        self.coords.len()
    }

    pub fn num_cells(&self) -> usize {
        self.donor_index.num_cells()
    }

    /// Vertex nodes of the donor cell behind a flat donor id.
    pub fn donor_cell_nodes(&self, donor: DonorId) -> Result<&[usize], OversetError> {
        let (t, local) = self.donor_index.decode(donor)?;
        Ok(self.conn[t].cell(local))
    }

    /// Mark every node whose resolution is `None` (no usable donor) — test
    /// and setup convenience.
    pub fn set_node_res(&mut self, node_res: Vec<Option<f64>>) {
        debug_assert_eq!(node_res.len(), self.num_nodes());
        self.node_res = node_res;
    }
}
