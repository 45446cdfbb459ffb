//! Netlink message framing and the dump exchange loop.
//!
//! This module is the protocol core: bit-exact header encode/decode
//! ([`message::NlMsgHdr`]), splitting a receive buffer into discrete
//! messages ([`message::MessageIter`]), and driving a multipart dump to its
//! done or error sentinel ([`Connection::dump`]).
//!
//! Everything here is synchronous; each receive blocks the calling thread
//! until the kernel produces a batch. Callers wanting bounded waits should
//! arrange a receive timeout on the socket fd themselves.
//!
//! # Quick Start
//!
//! ```ignore
//! use sockdiag::netlink::{Connection, dump_request};
//! use sockdiag::diag::{InetDiagReqV2, SOCK_DIAG_BY_FAMILY};
//!
//! let conn = Connection::new()?;
//! let req = InetDiagReqV2::all(libc::AF_INET as u8, libc::IPPROTO_TCP as u8);
//! let sockets = conn.dump_inet(&req)?;
//! ```

mod builder;
mod connection;
mod error;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod message;
mod socket;

pub use builder::MessageBuilder;
pub use connection::{Connection, dump_request, request};
pub use error::{Error, Result};
pub use message::{Message, MessageIter, NLMSG_HDRLEN, NlMsgHdr, NlMsgType};
pub use socket::NetlinkSocket;
