//! Per-round search-point exchange between mesh partitions.
//!
//! Each rank offers every peer the candidate points falling inside that
//! peer's bounding box, the communicator runs one blocking personalized
//! exchange, and the inbound packets are flattened into the partition's
//! search buffers. The index of a point in the flattened buffers is a
//! stable function of (receive order of peers, arrival order within a
//! peer's packet); later stages map that index back to (origin rank, origin
//! local id) through [`SearchOrigin`](crate::mesh::block::SearchOrigin).
//!
//! The subsystem runs idle → building send packets → exchanging (blocking)
//! → flattening → idle; there is no partial or cancelled state within a
//! round.

use crate::comm::communicator::Communicator;
use crate::comm::packet::Packet;
use crate::error::OversetError;
use crate::geometry::obb::Obb;
use crate::mesh::block::{MeshBlock, SearchOrigin};

/// Which exchange round this is.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExchangeMode {
    /// Initial round: flatten coordinates, ids *and* per-point mesh tags;
    /// the parametric-coordinate buffer is reset.
    Full,
    /// Incremental round for extra query points: no mesh tags, and the
    /// parametric-coordinate buffer survives when the point count is
    /// unchanged (iterative containment refinement keeps its progress).
    ExtraPass,
}

/// Candidate-point supplier per peer bounding box. Selection policy is an
/// external concern; implementations pair each point's sender-side local id
/// with its coordinates.
pub trait QuerySource {
    fn query_points(&self, obb: &Obb) -> Packet;

    /// Candidates for the incremental round.
    fn extra_query_points(&self, obb: &Obb) -> Packet;
}

/// A block offers its Cartesian candidate sample points, pruned by the
/// peer's box, with the flattened sample index as the local id. Real
/// deployments usually supply their own [`QuerySource`] with a sharper
/// candidate set.
impl QuerySource for MeshBlock {
    fn query_points(&self, obb: &Obb) -> Packet {
        Packet::from_points(
            self.cart
                .coords
                .chunks_exact(3)
                .enumerate()
                .map(|(i, c)| (i as i32, [c[0], c[1], c[2]]))
                .filter(|&(_, p)| obb.contains(p)),
        )
    }

    fn extra_query_points(&self, obb: &Obb) -> Packet {
        self.query_points(obb)
    }
}

/// Exchange search points, using the block itself as the query source.
pub fn exchange_search_points<C: Communicator>(
    block: &mut MeshBlock,
    comm: &C,
    obb_list: &[Obb],
    mode: ExchangeMode,
) -> Result<(), OversetError> {
    let outgoing = collect_outgoing(block, comm, obb_list, mode)?;
    exchange_and_flatten(block, comm, &outgoing, obb_list, mode)
}

/// Exchange search points with an external query source.
pub fn exchange_search_points_with<C: Communicator, Q: QuerySource>(
    block: &mut MeshBlock,
    source: &Q,
    comm: &C,
    obb_list: &[Obb],
    mode: ExchangeMode,
) -> Result<(), OversetError> {
    let outgoing = collect_outgoing(source, comm, obb_list, mode)?;
    exchange_and_flatten(block, comm, &outgoing, obb_list, mode)
}

fn collect_outgoing<C: Communicator, Q: QuerySource + ?Sized>(
    source: &Q,
    comm: &C,
    obb_list: &[Obb],
    mode: ExchangeMode,
) -> Result<Vec<Packet>, OversetError> {
    let map = comm.rank_map();
    let npeers = map.send.len().max(map.recv.len());
    if obb_list.len() < npeers {
        return Err(OversetError::AdjacencyMismatch {
            got: obb_list.len(),
            expected: npeers,
        });
    }
    Ok((0..map.send.len())
        .map(|k| match mode {
            ExchangeMode::Full => source.query_points(&obb_list[k]),
            ExchangeMode::ExtraPass => source.extra_query_points(&obb_list[k]),
        })
        .collect())
}

fn exchange_and_flatten<C: Communicator>(
    block: &mut MeshBlock,
    comm: &C,
    outgoing: &[Packet],
    obb_list: &[Obb],
    mode: ExchangeMode,
) -> Result<(), OversetError> {
    let inbound = comm.send_recv_packets(outgoing)?;
    let map = comm.rank_map();
    for (k, packet) in inbound.iter().enumerate() {
        if packet.reals.len() != 3 * packet.ints.len() {
            return Err(OversetError::PacketShape {
                neighbor: map.recv[k],
                nints: packet.ints.len(),
                nreals: packet.reals.len(),
            });
        }
    }

    let total: usize = inbound.iter().map(|p| p.ints.len()).sum();
    match mode {
        ExchangeMode::Full => block.search.replace(total),
        ExchangeMode::ExtraPass => block.search.replace_keep_rst(total),
    }

    for (k, packet) in inbound.iter().enumerate() {
        for (j, &local_id) in packet.ints.iter().enumerate() {
            block.search.origins.push(SearchOrigin { peer: k, local_id });
            block
                .search
                .coords
                .extend_from_slice(&packet.reals[3 * j..3 * j + 3]);
            if mode == ExchangeMode::Full {
                block.search.mesh_tags.push(obb_list[k].mesh_tag);
            }
        }
    }
    debug_assert_eq!(block.search.origins.len(), total);
    // Inbound and outgoing packets die here; their lifetime is one round.
    Ok(())
}
