//! Netlink message header, framing, and buffer splitting.
//!
//! Netlink speaks little-endian on the wire regardless of host byte order;
//! the header and every fixed-size record in this crate pin that down at the
//! type level with `zerocopy::little_endian` field types, so there is no
//! runtime byte-order state anywhere.

use super::error::{Error, Result};
use zerocopy::little_endian::{I32, U16, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Netlink message alignment boundary.
pub const NLMSG_ALIGNTO: usize = 4;

/// Align a length to the NLMSG_ALIGNTO boundary.
#[inline]
pub const fn nlmsg_align(len: usize) -> usize {
    (len + NLMSG_ALIGNTO - 1) & !(NLMSG_ALIGNTO - 1)
}

/// Size of the netlink message header.
pub const NLMSG_HDRLEN: usize = nlmsg_align(std::mem::size_of::<NlMsgHdr>());

/// Netlink message header (mirrors struct nlmsghdr).
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
pub struct NlMsgHdr {
    /// Length of message including header.
    pub nlmsg_len: U32,
    /// Message type.
    pub nlmsg_type: U16,
    /// Additional flags.
    pub nlmsg_flags: U16,
    /// Sequence number, echoed by the kernel.
    pub nlmsg_seq: U32,
    /// Sending process port ID (0 for kernel-addressed messages).
    pub nlmsg_pid: U32,
}

impl NlMsgHdr {
    /// Create a header covering an empty payload.
    pub fn new(msg_type: u16, flags: u16) -> Self {
        Self {
            nlmsg_len: U32::new(NLMSG_HDRLEN as u32),
            nlmsg_type: U16::new(msg_type),
            nlmsg_flags: U16::new(flags),
            nlmsg_seq: U32::new(0),
            nlmsg_pid: U32::new(0),
        }
    }

    /// Get the payload length (total length minus header).
    ///
    /// A declared length below the header size counts as an empty payload;
    /// decoding does not validate the length field, so an unvalidated
    /// header must not panic here.
    pub fn payload_len(&self) -> usize {
        (self.nlmsg_len.get() as usize).saturating_sub(NLMSG_HDRLEN)
    }

    /// Check if this is an error message.
    pub fn is_error(&self) -> bool {
        self.nlmsg_type.get() == NlMsgType::ERROR
    }

    /// Check if this is an end-of-dump message.
    pub fn is_done(&self) -> bool {
        self.nlmsg_type.get() == NlMsgType::DONE
    }

    /// Check if this message is part of a multipart response.
    pub fn is_multi(&self) -> bool {
        self.nlmsg_flags.get() & NLM_F_MULTI != 0
    }

    /// Serialize the header to its 16-byte wire form. Never fails.
    pub fn as_bytes(&self) -> &[u8] {
        <Self as IntoBytes>::as_bytes(self)
    }

    /// Parse a header from the start of a buffer.
    ///
    /// Does not validate the length field against the buffer; that is the
    /// job of [`MessageIter`].
    pub fn from_bytes(data: &[u8]) -> Result<&Self> {
        Self::ref_from_prefix(data)
            .map(|(r, _)| r)
            .map_err(|_| Error::HeaderTooShort {
                expected: std::mem::size_of::<Self>(),
                actual: data.len(),
            })
    }
}

/// Standard netlink message types.
pub struct NlMsgType;

impl NlMsgType {
    /// No operation, message must be discarded.
    pub const NOOP: u16 = 1;
    /// Error message or ACK.
    pub const ERROR: u16 = 2;
    /// End of multipart message.
    pub const DONE: u16 = 3;
    /// Data lost, request resend.
    pub const OVERRUN: u16 = 4;
}

/// Netlink message flags.
pub const NLM_F_REQUEST: u16 = 0x01;
pub const NLM_F_MULTI: u16 = 0x02;
pub const NLM_F_ACK: u16 = 0x04;

// Modifiers to GET requests
pub const NLM_F_ROOT: u16 = 0x100;
pub const NLM_F_MATCH: u16 = 0x200;
pub const NLM_F_DUMP: u16 = NLM_F_ROOT | NLM_F_MATCH;

/// An owned netlink message, decoupled from the buffer it was parsed from.
///
/// Payload bytes exclude the header and any alignment padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// The message header.
    pub header: NlMsgHdr,
    /// The payload bytes following the header.
    pub payload: Vec<u8>,
}

/// Iterator over back-to-back netlink messages in a receive buffer.
///
/// Yields `(header, payload)` views in buffer order. Iteration ends cleanly
/// when fewer than a header's worth of bytes remain; a declared length that
/// is below the header size or whose aligned form overruns the buffer yields
/// [`Error::FrameDoesNotFit`].
pub struct MessageIter<'a> {
    data: &'a [u8],
}

impl<'a> MessageIter<'a> {
    /// Create a new message iterator over a buffer.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }
}

impl<'a> Iterator for MessageIter<'a> {
    type Item = Result<(&'a NlMsgHdr, &'a [u8])>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.data.len() < NLMSG_HDRLEN {
            // Trailing padding or a partial tail, not a message.
            return None;
        }

        let header = match NlMsgHdr::from_bytes(self.data) {
            Ok(h) => h,
            Err(e) => return Some(Err(e)),
        };

        let msg_len = header.nlmsg_len.get() as usize;
        let aligned_len = nlmsg_align(msg_len);
        if msg_len < NLMSG_HDRLEN || aligned_len > self.data.len() {
            return Some(Err(Error::FrameDoesNotFit {
                declared: msg_len,
                remaining: self.data.len(),
            }));
        }

        // Payload stops at the declared length; the bytes up to the aligned
        // boundary are padding and must not leak into the payload.
        let payload = &self.data[NLMSG_HDRLEN..msg_len];
        self.data = &self.data[aligned_len..];

        Some(Ok((header, payload)))
    }
}

/// Netlink error message payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct NlMsgError {
    /// Error code (negative errno, or 0 for an ACK).
    pub error: I32,
    /// Original message header that caused the error.
    pub msg: NlMsgHdr,
}

impl NlMsgError {
    /// Parse an error message from an error-sentinel payload.
    pub fn from_bytes(data: &[u8]) -> Result<&Self> {
        Self::ref_from_prefix(data)
            .map(|(r, _)| r)
            .map_err(|_| Error::HeaderTooShort {
                expected: std::mem::size_of::<Self>(),
                actual: data.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netlink::fixtures::frame;

    #[test]
    fn test_nlmsg_align() {
        assert_eq!(nlmsg_align(0), 0);
        assert_eq!(nlmsg_align(1), 4);
        assert_eq!(nlmsg_align(4), 4);
        assert_eq!(nlmsg_align(16), 16);
        assert_eq!(nlmsg_align(22), 24);
    }

    #[test]
    fn test_header_wire_layout() {
        let mut header = NlMsgHdr::new(2, 5);
        header.nlmsg_len = U32::new(20);
        header.nlmsg_seq = U32::new(6);
        header.nlmsg_pid = U32::new(11);

        // Five fields, little-endian, at fixed offsets.
        let bytes = header.as_bytes();
        assert_eq!(bytes.len(), NLMSG_HDRLEN);
        assert_eq!(&bytes[0..4], &[20, 0, 0, 0]);
        assert_eq!(&bytes[4..6], &[2, 0]);
        assert_eq!(&bytes[6..8], &[5, 0]);
        assert_eq!(&bytes[8..12], &[6, 0, 0, 0]);
        assert_eq!(&bytes[12..16], &[11, 0, 0, 0]);
    }

    #[test]
    fn test_header_round_trip() {
        let mut header = NlMsgHdr::new(20, NLM_F_REQUEST | NLM_F_DUMP);
        header.nlmsg_len = U32::new((NLMSG_HDRLEN + 4) as u32);
        header.nlmsg_seq = U32::new(42);

        let decoded = NlMsgHdr::from_bytes(header.as_bytes()).unwrap();
        assert_eq!(*decoded, header);
        assert_eq!(decoded.payload_len(), 4);
    }

    #[test]
    fn test_payload_len_with_undersized_declared_length() {
        // from_bytes leaves the length field unvalidated, so a header
        // claiming less than its own size must still answer safely.
        let mut header = NlMsgHdr::new(20, 0);
        header.nlmsg_len = U32::new(8);
        assert_eq!(header.payload_len(), 0);
    }

    #[test]
    fn test_decode_short_buffer() {
        let err = NlMsgHdr::from_bytes(&[0u8; 7]).unwrap_err();
        assert!(matches!(
            err,
            Error::HeaderTooShort {
                expected: 16,
                actual: 7
            }
        ));
    }

    #[test]
    fn test_split_empty_buffer() {
        assert!(MessageIter::new(&[]).next().is_none());
        // Sub-header-size buffer is not an error either.
        assert!(MessageIter::new(&[0u8; 10]).next().is_none());
    }

    #[test]
    fn test_split_concatenated_messages() {
        let mut buf = frame(20, 1, &[0xAA; 8]);
        buf.extend_from_slice(&frame(20, 1, &[0xBB; 4]));
        buf.extend_from_slice(&frame(20, 1, &[]));

        let msgs: Vec<_> = MessageIter::new(&buf)
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(msgs.len(), 3);
        assert_eq!(msgs[0].1, &[0xAA; 8]);
        assert_eq!(msgs[1].1, &[0xBB; 4]);
        assert_eq!(msgs[2].1, &[] as &[u8]);
    }

    #[test]
    fn test_split_strips_alignment_padding() {
        // 6-byte payload declares a 22-byte message but occupies 24 bytes on
        // the wire; the next message must start at the aligned boundary and
        // the padding must not show up in the payload.
        let mut buf = frame(20, 1, &[1, 2, 3, 4, 5, 6]);
        assert_eq!(buf.len(), NLMSG_HDRLEN + 8);
        buf.extend_from_slice(&frame(3, 1, &[]));

        let msgs: Vec<_> = MessageIter::new(&buf)
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].0.nlmsg_len.get() as usize, NLMSG_HDRLEN + 6);
        assert_eq!(msgs[0].1, &[1, 2, 3, 4, 5, 6]);
        assert!(msgs[1].0.is_done());
    }

    #[test]
    fn test_split_drops_partial_tail() {
        let mut buf = frame(20, 1, &[0xCC; 4]);
        buf.extend_from_slice(&[0u8; 3]);

        let msgs: Vec<_> = MessageIter::new(&buf)
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(msgs.len(), 1);
    }

    #[test]
    fn test_split_length_overruns_buffer() {
        let mut buf = frame(20, 1, &[0u8; 4]);
        // Claim more than the buffer holds.
        buf[0..4].copy_from_slice(&100u32.to_le_bytes());

        let err = MessageIter::new(&buf).next().unwrap().unwrap_err();
        assert!(matches!(
            err,
            Error::FrameDoesNotFit {
                declared: 100,
                remaining: 20
            }
        ));
    }

    #[test]
    fn test_split_length_below_header_size() {
        let mut buf = frame(20, 1, &[]);
        buf[0..4].copy_from_slice(&8u32.to_le_bytes());

        let err = MessageIter::new(&buf).next().unwrap().unwrap_err();
        assert!(matches!(err, Error::FrameDoesNotFit { declared: 8, .. }));
    }

    #[test]
    fn test_nlmsg_error_round_trip() {
        let err = NlMsgError {
            error: I32::new(-13),
            msg: NlMsgHdr::new(20, NLM_F_REQUEST),
        };
        let decoded = NlMsgError::from_bytes(err.as_bytes()).unwrap();
        assert_eq!(decoded.error.get(), -13);

        let short = NlMsgError::from_bytes(&[0u8; 4]).unwrap_err();
        assert!(matches!(short, Error::HeaderTooShort { .. }));
    }
}
