//! Gathering interpolated field values into transmission buffers.

use itertools::izip;

use crate::assembly::interp::InterpRecord;
use crate::diagnostics::{DiagnosticEvent, DiagnosticSink, ListKind};
use crate::mesh::block::MeshBlock;

/// How the caller's field array is laid out.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FieldLayout {
    /// `field[node * nvar + k]` — all variables of a node together.
    NodeMajor,
    /// `field[k * nnodes + node]` — all nodes of a variable together.
    VariableMajor,
}

/// Secondary-tag slot value emitted for generic-list records.
pub const GENERIC_TAG: i32 = -1;

/// Flat transmission buffers: per surviving record, three integers
/// (receiving rank, secondary tag, receiving point id — see
/// [`pack_interpolated_solution`] for the layout-dependent ordering) and
/// `nvar` gathered reals. Both buffers are empty when no record survives;
/// callers must not index into them in that case.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PackedSolution {
    pub ints: Vec<i32>,
    pub reals: Vec<f64>,
}

impl PackedSolution {
    pub fn num_records(&self) -> usize {
        self.ints.len() / 3
    }
}

/// Walk both interpolation lists (generic first, then Cartesian), skip
/// cancelled records, and gather `nvar` field values per record through the
/// record's weights.
///
/// Integer triple per record: generic records emit
/// `(rank, GENERIC_TAG, point_id)` under either layout. Cartesian records
/// emit `(rank, cart_id, point_id)` under `NodeMajor` but
/// `(rank, point_id, cart_id)` under `VariableMajor` — both historical
/// behaviors are preserved exactly; downstream consumers rely on them.
///
/// A weight outside `[0,1]` is reported to `sink` and the gather proceeds;
/// the result is then a non-convex interpolation, which is the caller's
/// call to escalate.
pub fn pack_interpolated_solution<S: DiagnosticSink>(
    block: &MeshBlock,
    field: &[f64],
    nvar: usize,
    layout: FieldLayout,
    sink: &mut S,
) -> PackedSolution {
    let surviving = block
        .interp
        .iter()
        .chain(&block.interp_cart)
        .filter(|r| !r.cancel)
        .count();
    if surviving == 0 {
        return PackedSolution::default();
    }

    let nnodes = block.num_nodes();
    let mut out = PackedSolution {
        ints: Vec::with_capacity(3 * surviving),
        reals: Vec::with_capacity(nvar * surviving),
    };
    let mut gathered = vec![0.0; nvar];

    let lists: [(ListKind, &[InterpRecord]); 2] = [
        (ListKind::Generic, &block.interp),
        (ListKind::Cartesian, &block.interp_cart),
    ];
    for (kind, list) in lists {
        for (i, rec) in list.iter().enumerate() {
            if rec.cancel {
                continue;
            }
            gathered.fill(0.0);
            for (&node, &weight) in izip!(&rec.donor_nodes, &rec.weights) {
                if !(0.0..=1.0).contains(&weight) {
                    sink.report(DiagnosticEvent::NonConvexWeight {
                        list: kind,
                        record: i,
                        weight,
                    });
                }
                match layout {
                    FieldLayout::NodeMajor => {
                        for k in 0..nvar {
                            gathered[k] += field[node * nvar + k] * weight;
                        }
                    }
                    FieldLayout::VariableMajor => {
                        for k in 0..nvar {
                            gathered[k] += field[k * nnodes + node] * weight;
                        }
                    }
                }
            }
            out.ints.push(rec.receptor.rank);
            match rec.receptor.cart_id {
                None => {
                    out.ints.push(GENERIC_TAG);
                    out.ints.push(rec.receptor.point_id);
                }
                Some(cart_id) => match layout {
                    FieldLayout::NodeMajor => {
                        out.ints.push(cart_id);
                        out.ints.push(rec.receptor.point_id);
                    }
                    FieldLayout::VariableMajor => {
                        out.ints.push(rec.receptor.point_id);
                        out.ints.push(cart_id);
                    }
                },
            }
            out.reals.extend_from_slice(&gathered);
        }
    }
    out
}
