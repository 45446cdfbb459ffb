//! Family-specific sock_diag payload codecs.
//!
//! The framing core carries these records as opaque payload bytes; this
//! module gives them shape. Every record mirrors a fixed-size kernel struct
//! and is encoded/decoded with zerocopy, little-endian at the type level.

pub mod inet;
pub mod types;
pub mod unix;

pub use inet::{InetDiagMsg, InetDiagReqV2, InetDiagSockId};
pub use types::{TcpState, sock_type_name};
pub use unix::{UnixDiagMsg, UnixDiagReq, udiag_show};

use crate::netlink::{Connection, Error, Result, dump_request};

/// Message type for sock_diag requests and responses.
pub const SOCK_DIAG_BY_FAMILY: u16 = 20;

/// Payload codec error for a record that needs more bytes than the frame
/// carries.
pub(crate) fn payload_too_short(what: &str, expected: usize, actual: usize) -> Error {
    Error::Payload(format!("{what} needs {expected} bytes, got {actual}"))
}

impl Connection {
    /// Dump all inet sockets matching the request.
    pub fn dump_inet(&self, req: &InetDiagReqV2) -> Result<Vec<InetDiagMsg>> {
        let mut builder = dump_request(SOCK_DIAG_BY_FAMILY);
        builder.append_bytes(&req.encode());

        let messages = self.dump(builder)?;
        messages
            .iter()
            .map(|m| InetDiagMsg::decode(&m.payload).map(|r| *r))
            .collect()
    }

    /// Dump all unix domain sockets matching the request.
    pub fn dump_unix(&self, req: &UnixDiagReq) -> Result<Vec<UnixDiagMsg>> {
        let mut builder = dump_request(SOCK_DIAG_BY_FAMILY);
        builder.append_bytes(&req.encode());

        let messages = self.dump(builder)?;
        messages
            .iter()
            .map(|m| UnixDiagMsg::decode(&m.payload).map(|r| *r))
            .collect()
    }
}
