//! unix_diag request and response records (unix domain sockets).

use zerocopy::little_endian::{U16, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use super::payload_too_short;
use crate::netlink::Result;

/// Flags selecting which optional attributes the kernel should attach to
/// each response record. The framing core ignores attributes entirely, but
/// the request field is part of the fixed wire layout.
pub mod udiag_show {
    /// Attach the bound pathname.
    pub const NAME: u32 = 0x01;
    /// Attach the peer socket inode.
    pub const PEER: u32 = 0x04;
    /// Attach queue lengths.
    pub const RQLEN: u32 = 0x10;
}

/// Dump request (mirrors struct unix_diag_req).
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
pub struct UnixDiagReq {
    /// Address family; always AF_UNIX.
    pub family: u8,
    /// Protocol; always 0 for unix sockets.
    pub protocol: u8,
    pub pad: U16,
    /// Socket-state filter bitmask.
    pub states: U32,
    /// Inode filter; 0 to match any socket.
    pub ino: U32,
    /// Which attributes to attach (udiag_show bitmask).
    pub show: U32,
    /// Cookie filter; zeroed to match any socket.
    pub cookie: [U32; 2],
}

impl UnixDiagReq {
    /// Request covering every unix socket state.
    pub fn all() -> Self {
        Self {
            family: libc::AF_UNIX as u8,
            states: U32::new(!0),
            ..Default::default()
        }
    }

    /// Replace the socket-state filter bitmask.
    pub fn states(mut self, mask: u32) -> Self {
        self.states = U32::new(mask);
        self
    }

    /// Replace the attribute selection (udiag_show bitmask).
    pub fn show(mut self, mask: u32) -> Self {
        self.show = U32::new(mask);
        self
    }

    /// Serialize to the 24-byte wire form. Never fails.
    pub fn encode(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }

    /// Decode a request from bytes.
    pub fn decode(data: &[u8]) -> Result<&Self> {
        Self::ref_from_prefix(data)
            .map(|(r, _)| r)
            .map_err(|_| payload_too_short("unix_diag_req", size_of::<Self>(), data.len()))
    }
}

/// Response record (mirrors struct unix_diag_msg).
///
/// Optional attributes (path, peer, queues) follow the fixed record on the
/// wire; they are not decoded here.
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
pub struct UnixDiagMsg {
    /// Address family; always AF_UNIX.
    pub family: u8,
    /// Socket type (SOCK_STREAM, SOCK_DGRAM, SOCK_SEQPACKET).
    pub ty: u8,
    /// Socket state (TCP state numbering: established or listen).
    pub state: u8,
    pub pad: u8,
    /// Inode number backing the socket.
    pub ino: U32,
    /// Opaque kernel cookie identifying the socket.
    pub cookie: [U32; 2],
}

impl UnixDiagMsg {
    /// Decode a response record from a well-framed payload.
    pub fn decode(data: &[u8]) -> Result<&Self> {
        Self::ref_from_prefix(data)
            .map(|(r, _)| r)
            .map_err(|_| payload_too_short("unix_diag_msg", size_of::<Self>(), data.len()))
    }
}
