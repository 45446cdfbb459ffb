//! Low-level blocking netlink socket operations.

use std::os::unix::io::{AsRawFd, RawFd};
use std::sync::atomic::{AtomicU32, Ordering};

use bytes::BytesMut;
use netlink_sys::{Socket, SocketAddr, protocols};

use super::error::Result;

/// Receive buffer size per batch. One page is enough for the kernel's
/// nominal dump chunking, but dumps routinely fill larger batches.
const RECV_BUF_SIZE: usize = 32768;

/// Blocking netlink socket bound to the NETLINK_SOCK_DIAG family.
///
/// Each socket owns its own sequence counter; independent exchanges that
/// must run concurrently should each use their own socket.
pub struct NetlinkSocket {
    /// The underlying socket.
    socket: Socket,
    /// Sequence number counter.
    seq: AtomicU32,
    /// Local port ID (assigned by the kernel at bind).
    pid: u32,
}

impl NetlinkSocket {
    /// Create and bind a new sock_diag socket.
    pub fn new() -> Result<Self> {
        let mut socket = Socket::new(protocols::NETLINK_SOCK_DIAG)?;

        // Bind to get a port ID
        let mut addr = SocketAddr::new(0, 0);
        socket.bind(&addr)?;
        socket.get_address(&mut addr)?;
        let pid = addr.port_number();

        Ok(Self {
            socket,
            seq: AtomicU32::new(1),
            pid,
        })
    }

    /// Get the next sequence number.
    pub fn next_seq(&self) -> u32 {
        self.seq.fetch_add(1, Ordering::Relaxed)
    }

    /// Get the local port ID.
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Send a serialized message to the kernel.
    pub fn send(&self, msg: &[u8]) -> Result<()> {
        self.socket.send(msg, 0)?;
        Ok(())
    }

    /// Receive one batch of bytes, blocking until data arrives.
    ///
    /// Returns an empty buffer on a zero-length read.
    pub fn recv(&self) -> Result<Vec<u8>> {
        let mut buf = BytesMut::with_capacity(RECV_BUF_SIZE);
        self.socket.recv(&mut buf, 0)?;
        Ok(buf.to_vec())
    }
}

impl AsRawFd for NetlinkSocket {
    fn as_raw_fd(&self) -> RawFd {
        self.socket.as_raw_fd()
    }
}
