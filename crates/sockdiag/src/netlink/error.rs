//! Error types for netlink operations.

use std::io;

/// Result type for netlink operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while framing messages or driving an exchange.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error from socket operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Fewer bytes were available than the fixed netlink header size.
    #[error("header too short: expected {expected} bytes, got {actual}")]
    HeaderTooShort {
        /// Bytes required for a full header.
        expected: usize,
        /// Bytes actually available.
        actual: usize,
    },

    /// A message's declared length does not fit the remaining buffer, or is
    /// smaller than the header itself.
    #[error("frame does not fit: declared {declared} bytes, {remaining} remaining")]
    FrameDoesNotFit {
        /// Length claimed by the message header.
        declared: usize,
        /// Bytes left in the receive buffer.
        remaining: usize,
    },

    /// The kernel answered with an error message during an exchange.
    #[error("protocol error: {message} (errno {errno})")]
    Protocol {
        /// The errno value carried by the error message.
        errno: i32,
        /// Human-readable error message.
        message: String,
    },

    /// A family-specific record could not be decoded from a well-framed
    /// payload.
    #[error("payload codec error: {0}")]
    Payload(String),
}

impl Error {
    /// Create a protocol error from a (negative) errno value.
    pub fn from_errno(errno: i32) -> Self {
        let message = io::Error::from_raw_os_error(-errno).to_string();
        Self::Protocol {
            errno: -errno,
            message,
        }
    }

    /// Get the errno value if this is a protocol error.
    pub fn errno(&self) -> Option<i32> {
        match self {
            Self::Protocol { errno, .. } => Some(*errno),
            _ => None,
        }
    }

    /// Check if this is a permission error (EPERM, EACCES).
    pub fn is_permission_denied(&self) -> bool {
        matches!(self.errno(), Some(1) | Some(13))
    }
}
