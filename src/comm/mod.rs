//! Inter-rank communication: packets, wire encoding, and the
//! personalized-exchange communicator backends.

pub mod communicator;
pub mod packet;
pub mod wire;

pub use communicator::{Communicator, LocalComm, NoComm, RankMap};
pub use packet::Packet;

#[cfg(feature = "mpi-support")]
pub use communicator::MpiComm;
