//! Mandatory-receptor classification against the Cartesian background grid.
//!
//! A cell whose every vertex has no usable donor anywhere else must be fed
//! from the background grid; this module finds those cells and emits their
//! candidate sample points. After donor resolution it folds the result back
//! into the blanking arrays. None of this fails on malformed input:
//! absence of a donor is a state, not an error.

use itertools::izip;

use crate::geometry::weights::CellSampler;
use crate::mesh::blanking::Blanking;
use crate::mesh::block::{CellId, MeshBlock};

/// Summary of one classification pass, for downstream buffer sizing.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ReceptorScan {
    pub receptor_cells: usize,
    pub total_points: usize,
    pub max_points_per_cell: usize,
}

/// Scan every cell of every element type and pick the mandatory-receptor
/// candidates: cells whose vertices all have `node_res == None` and that are
/// not blanked as holes. Every vertex of a qualifying cell is marked picked;
/// the qualifying cells become the receptor-cell tags, in scan order.
///
/// In high-order mode each receptor cell contributes `sampler.sample_count`
/// interior points; in low-order mode each picked node contributes its own
/// coordinate as the single sample point. Candidate donors start unresolved.
///
/// The previous round's Cartesian state is released before the rebuild.
pub fn identify_mandatory_receptors<S: CellSampler>(
    block: &mut MeshBlock,
    sampler: &S,
) -> ReceptorScan {
    let nnodes = block.num_nodes();
    block.cart.begin_round(nnodes);

    let mut flat = 0;
    for type_block in &block.conn {
        for i in 0..type_block.num_cells() {
            let cell_nodes = type_block.cell(i);
            let mandatory = cell_nodes.iter().all(|&v| block.node_res[v].is_none());
            if mandatory && block.iblank_cell[flat] != Blanking::Hole {
                for &v in cell_nodes {
                    block.cart.picked[v] = true;
                }
                block.cart.receptor_cells.push(CellId::from_index0(flat));
            }
            flat += 1;
        }
    }

    if block.high_order {
        let mut counts = Vec::with_capacity(block.cart.receptor_cells.len());
        for &cell in &block.cart.receptor_cells {
            counts.push(sampler.sample_count(cell));
        }
        let total: usize = counts.iter().sum();
        let max = counts.iter().copied().max().unwrap_or(0);
        let mut coords = Vec::with_capacity(3 * total);
        for (&cell, &count) in izip!(&block.cart.receptor_cells, &counts) {
            sampler.sample_points(cell, count, &mut coords);
        }
        debug_assert_eq!(coords.len(), 3 * total);
        block.cart.points_per_cell = counts;
        block.cart.max_points_per_cell = max;
        block.cart.coords = coords;
        block.cart.donors = vec![None; total];
    } else {
        let mut coords = Vec::new();
        for (i, &picked) in block.cart.picked.iter().enumerate() {
            if picked {
                coords.extend_from_slice(&block.coords[i]);
            }
        }
        let total = coords.len() / 3;
        block.cart.coords = coords;
        block.cart.donors = vec![None; total];
    }

    ReceptorScan {
        receptor_cells: block.cart.receptor_cells.len(),
        total_points: block.cart.total_points(),
        max_points_per_cell: block.cart.max_points_per_cell,
    }
}

/// Fold resolved Cartesian donors back into the blanking arrays.
///
/// High-order: a receptor cell becomes `Interpolated` iff *every* one of its
/// sample points resolved a donor. Low-order: a picked node becomes
/// `Interpolated` iff its single sample point resolved. Partial coverage
/// leaves blanking unchanged; a cell is never partially blanked.
pub fn apply_cartesian_blanking(block: &mut MeshBlock) {
    if block.high_order {
        let mut m = 0;
        for (&cell, &count) in izip!(&block.cart.receptor_cells, &block.cart.points_per_cell)
        {
            let resolved = block.cart.donors[m..m + count]
                .iter()
                .filter(|d| d.is_some())
                .count();
            m += count;
            if resolved == count {
                block.iblank_cell[cell.index0()] = Blanking::Interpolated;
            }
        }
    } else {
        let mut m = 0;
        for i in 0..block.iblank.len() {
            if block.cart.picked[i] {
                if block.cart.donors[m].is_some() {
                    block.iblank[i] = Blanking::Interpolated;
                }
                m += 1;
            }
        }
    }
}
