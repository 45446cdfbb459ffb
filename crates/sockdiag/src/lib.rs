//! Blocking netlink client for Linux socket-state introspection.
//!
//! This crate speaks the NETLINK_SOCK_DIAG protocol: it frames netlink
//! messages to and from their wire layout, drives multipart dump exchanges
//! to completion, and decodes the fixed-size inet/unix diagnostic records
//! the kernel answers with.
//!
//! # Example
//!
//! ```ignore
//! use sockdiag::Connection;
//! use sockdiag::diag::InetDiagReqV2;
//!
//! fn main() -> sockdiag::Result<()> {
//!     let conn = Connection::new()?;
//!     let req = InetDiagReqV2::all(libc::AF_INET as u8, libc::IPPROTO_TCP as u8);
//!     for sock in conn.dump_inet(&req)? {
//!         println!("{} -> {}", sock.local(), sock.remote());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! The framing core ([`netlink`]) treats diagnostic records as opaque
//! payload bytes; the [`diag`] module gives them shape.

pub mod diag;
pub mod netlink;

// Re-export common types at crate root for convenience
pub use netlink::{Connection, Error, Result};
