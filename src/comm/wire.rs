//! Fixed wire layout for packets crossing the in-process transport.
//!
//! Header fields are stored little-endian; payloads are cast in native byte
//! order, which is fine for the intra-process mailbox (the MPI backend moves
//! typed buffers and never sees these bytes).

use bytemuck::{Pod, Zeroable};
use bytes::Bytes;

use crate::comm::packet::Packet;
use crate::error::OversetError;

/// Bump when the layout changes in incompatible ways.
pub const WIRE_VERSION: u16 = 1;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct PacketHdr {
    pub version_le: u16,
    pub reserved_le: u16, // keep zero
    pub nints_le: u32,
    pub nreals_le: u32,
}

impl PacketHdr {
    pub fn new(nints: usize, nreals: usize) -> Self {
        Self {
            version_le: WIRE_VERSION.to_le(),
            reserved_le: 0,
            nints_le: (nints as u32).to_le(),
            nreals_le: (nreals as u32).to_le(),
        }
    }
    pub fn nints(&self) -> usize {
        u32::from_le(self.nints_le) as usize
    }
    pub fn nreals(&self) -> usize {
        u32::from_le(self.nreals_le) as usize
    }
}

const HDR_LEN: usize = std::mem::size_of::<PacketHdr>();

/// Serialize a packet: header, then ints, then reals.
pub fn encode_packet(packet: &Packet) -> Bytes {
    let hdr = PacketHdr::new(packet.ints.len(), packet.reals.len());
    let mut buf =
        Vec::with_capacity(HDR_LEN + packet.ints.len() * 4 + packet.reals.len() * 8);
    buf.extend_from_slice(bytemuck::bytes_of(&hdr));
    buf.extend_from_slice(bytemuck::cast_slice(&packet.ints));
    buf.extend_from_slice(bytemuck::cast_slice(&packet.reals));
    Bytes::from(buf)
}

/// Decode a packet sent by `peer`. The byte-wise copies avoid any alignment
/// requirement on the incoming buffer.
pub fn decode_packet(bytes: &[u8], peer: usize) -> Result<Packet, OversetError> {
    let shape_err = |nints: usize, nreals: usize| OversetError::PacketShape {
        neighbor: peer,
        nints,
        nreals,
    };
    if bytes.len() < HDR_LEN {
        return Err(shape_err(0, 0));
    }
    let mut hdr = PacketHdr::zeroed();
    bytemuck::bytes_of_mut(&mut hdr).copy_from_slice(&bytes[..HDR_LEN]);
    let (nints, nreals) = (hdr.nints(), hdr.nreals());
    let expected = HDR_LEN + nints * 4 + nreals * 8;
    if bytes.len() != expected {
        return Err(shape_err(nints, nreals));
    }
    let mut ints = Vec::with_capacity(nints);
    let mut off = HDR_LEN;
    for _ in 0..nints {
        let b = &bytes[off..off + 4];
        ints.push(i32::from_ne_bytes([b[0], b[1], b[2], b[3]]));
        off += 4;
    }
    let mut reals = Vec::with_capacity(nreals);
    for _ in 0..nreals {
        let b = &bytes[off..off + 8];
        reals.push(f64::from_ne_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]));
        off += 8;
    }
    Ok(Packet { ints, reals })
}
