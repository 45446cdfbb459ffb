//! Hand-built netlink frames for testing.
//!
//! These build wire buffers the way the kernel would emit them, so the
//! splitter and the dump loop can be exercised without network access.

use zerocopy::IntoBytes;
use zerocopy::little_endian::{I32, U32};

use super::message::{NLMSG_HDRLEN, NlMsgError, NlMsgHdr, NlMsgType, nlmsg_align};

/// Serialize one message (header + payload) with alignment padding, as it
/// would appear inside a larger receive buffer.
pub fn frame(msg_type: u16, seq: u32, payload: &[u8]) -> Vec<u8> {
    let mut header = NlMsgHdr::new(msg_type, 0);
    header.nlmsg_len = U32::new((NLMSG_HDRLEN + payload.len()) as u32);
    header.nlmsg_seq = U32::new(seq);

    let mut buf = header.as_bytes().to_vec();
    buf.extend_from_slice(payload);
    buf.resize(nlmsg_align(buf.len()), 0);
    buf
}

/// Serialize a done-sentinel message.
pub fn done_frame(seq: u32) -> Vec<u8> {
    frame(NlMsgType::DONE, seq, &[])
}

/// Serialize an error-sentinel message carrying the given errno.
pub fn error_frame(seq: u32, errno: i32) -> Vec<u8> {
    let err = NlMsgError {
        error: I32::new(errno),
        msg: NlMsgHdr::new(0, 0),
    };
    frame(NlMsgType::ERROR, seq, err.as_bytes())
}
