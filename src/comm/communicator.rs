//! Thin façade over intra-process (threaded) or inter-process (MPI)
//! personalized exchange.
//!
//! The protocol layer needs exactly two things from a transport: the rank
//! adjacency (who do I send to / receive from) and a blocking personalized
//! exchange that moves one [`Packet`] to every send peer and returns one
//! packet from every receive peer. The call is all-or-nothing: it returns
//! only once every expected inbound packet has arrived, so a stalled peer
//! stalls the round. Liveness is the transport's concern, not ours.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering::Relaxed};

use bytes::Bytes;
use dashmap::DashMap;

use crate::comm::packet::Packet;
use crate::comm::wire::{decode_packet, encode_packet};
use crate::error::OversetError;

/// Rank adjacency for one rank: peers it sends to and peers it receives
/// from, each in a fixed order. The flattening step depends on the receive
/// order being stable across rounds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RankMap {
    pub send: Vec<usize>,
    pub recv: Vec<usize>,
}

impl RankMap {
    /// Symmetric adjacency: send set equals receive set.
    pub fn symmetric(neighbors: Vec<usize>) -> Self {
        Self {
            send: neighbors.clone(),
            recv: neighbors,
        }
    }
}

/// Blocking personalized exchange between a fixed set of ranks.
pub trait Communicator {
    /// This rank's id.
    fn rank(&self) -> usize;

    /// The rank adjacency this communicator was built with.
    fn rank_map(&self) -> &RankMap;

    /// Send `outgoing[k]` to `rank_map().send[k]` and return the inbound
    /// packets in `rank_map().recv` order. Blocks until every inbound packet
    /// has arrived.
    ///
    /// # Errors
    /// `AdjacencyMismatch` if `outgoing` is not parallel to the send set;
    /// `CommError`/`PacketShape` if a peer's payload cannot be decoded.
    fn send_recv_packets(&self, outgoing: &[Packet]) -> Result<Vec<Packet>, OversetError>;
}

fn check_outgoing_len(outgoing: &[Packet], expected: usize) -> Result<(), OversetError> {
    if outgoing.len() == expected {
        Ok(())
    } else {
        Err(OversetError::AdjacencyMismatch {
            got: outgoing.len(),
            expected,
        })
    }
}

/// Compile-time no-op comm for pure serial unit tests: rank 0, no peers.
#[derive(Clone, Debug, Default)]
pub struct NoComm {
    map: RankMap,
}

impl Communicator for NoComm {
    fn rank(&self) -> usize {
        0
    }

    fn rank_map(&self) -> &RankMap {
        &self.map
    }

    fn send_recv_packets(&self, outgoing: &[Packet]) -> Result<Vec<Packet>, OversetError> {
        check_outgoing_len(outgoing, 0)?;
        Ok(Vec::new())
    }
}

// --- LocalComm: intra-process multi-rank transport -------------------------

type MailKey = (usize, usize, u64); // (src, dst, round)

/// Intra-process transport: every "rank" is a `LocalComm` handle sharing one
/// mailbox, typically driven from its own thread. Packets are wire-encoded
/// into the mailbox and spin-waited on the receive side, so the exchange has
/// the same blocking, copy-by-value semantics as the MPI backend.
#[derive(Debug)]
pub struct LocalComm {
    rank: usize,
    map: RankMap,
    mailbox: Arc<DashMap<MailKey, Bytes>>,
    round: AtomicU64,
}

impl LocalComm {
    /// Build one handle per rank from per-rank adjacency, all sharing a
    /// fresh mailbox.
    pub fn group(maps: Vec<RankMap>) -> Vec<LocalComm> {
        let mailbox = Arc::new(DashMap::new());
        maps.into_iter()
            .enumerate()
            .map(|(rank, map)| LocalComm {
                rank,
                map,
                mailbox: Arc::clone(&mailbox),
                round: AtomicU64::new(0),
            })
            .collect()
    }

    /// All-to-all adjacency over `nranks` ranks, peers in ascending order.
    pub fn fully_connected(nranks: usize) -> Vec<LocalComm> {
        let maps = (0..nranks)
            .map(|r| RankMap::symmetric((0..nranks).filter(|&p| p != r).collect()))
            .collect();
        Self::group(maps)
    }
}

impl Communicator for LocalComm {
    fn rank(&self) -> usize {
        self.rank
    }

    fn rank_map(&self) -> &RankMap {
        &self.map
    }

    fn send_recv_packets(&self, outgoing: &[Packet]) -> Result<Vec<Packet>, OversetError> {
        check_outgoing_len(outgoing, self.map.send.len())?;
        // Each call is one round; the round id keeps consecutive exchanges
        // between the same pair from colliding in the mailbox.
        let round = self.round.fetch_add(1, Relaxed);
        for (packet, &peer) in outgoing.iter().zip(&self.map.send) {
            self.mailbox
                .insert((self.rank, peer, round), encode_packet(packet));
        }
        let mut inbound = Vec::with_capacity(self.map.recv.len());
        for &peer in &self.map.recv {
            let bytes = loop {
                if let Some((_, b)) = self.mailbox.remove(&(peer, self.rank, round)) {
                    break b;
                }
                std::thread::yield_now();
            };
            inbound.push(decode_packet(&bytes, peer)?);
        }
        Ok(inbound)
    }
}

// --- MPI backend (feature = "mpi-support") ---------------------------------

#[cfg(feature = "mpi-support")]
mod mpi_backend {
    use super::{Communicator, RankMap, check_outgoing_len};
    use crate::comm::packet::Packet;
    use crate::error::OversetError;
    use mpi::topology::SimpleCommunicator;
    use mpi::traits::{Communicator as _, Destination, Source};

    const TAG_INTS: i32 = 71;
    const TAG_REALS: i32 = 72;

    /// MPI-backed exchange over a communicator and a precomputed adjacency.
    pub struct MpiComm {
        world: SimpleCommunicator,
        rank: usize,
        map: RankMap,
    }

    impl MpiComm {
        pub fn new(world: SimpleCommunicator, map: RankMap) -> Self {
            let rank = world.rank() as usize;
            Self { world, rank, map }
        }
    }

    impl Communicator for MpiComm {
        fn rank(&self) -> usize {
            self.rank
        }

        fn rank_map(&self) -> &RankMap {
            &self.map
        }

        fn send_recv_packets(&self, outgoing: &[Packet]) -> Result<Vec<Packet>, OversetError> {
            check_outgoing_len(outgoing, self.map.send.len())?;
            let mut inbound = Vec::with_capacity(self.map.recv.len());
            mpi::request::scope(|scope| {
                let mut int_reqs = Vec::with_capacity(outgoing.len());
                let mut real_reqs = Vec::with_capacity(outgoing.len());
                for (packet, &peer) in outgoing.iter().zip(&self.map.send) {
                    let proc = self.world.process_at_rank(peer as i32);
                    int_reqs.push(proc.immediate_send_with_tag(
                        scope,
                        &packet.ints[..],
                        TAG_INTS,
                    ));
                    real_reqs.push(proc.immediate_send_with_tag(
                        scope,
                        &packet.reals[..],
                        TAG_REALS,
                    ));
                }
                for &peer in &self.map.recv {
                    let proc = self.world.process_at_rank(peer as i32);
                    let (ints, _) = proc.receive_vec_with_tag::<i32>(TAG_INTS);
                    let (reals, _) = proc.receive_vec_with_tag::<f64>(TAG_REALS);
                    inbound.push(Packet { ints, reals });
                }
                for req in int_reqs {
                    req.wait_without_status();
                }
                for req in real_reqs {
                    req.wait_without_status();
                }
            });
            Ok(inbound)
        }
    }
}

#[cfg(feature = "mpi-support")]
pub use mpi_backend::MpiComm;
