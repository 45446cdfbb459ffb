//! Request/response exchanges over a sock_diag socket.

use tracing::debug;

use super::builder::MessageBuilder;
use super::error::{Error, Result};
use super::message::{
    Message, MessageIter, NLM_F_DUMP, NLM_F_REQUEST, NLMSG_HDRLEN, NlMsgError, NlMsgHdr,
};
use super::socket::NetlinkSocket;

/// A sock_diag connection driving blocking request/response exchanges.
pub struct Connection {
    socket: NetlinkSocket,
}

impl Connection {
    /// Create a new connection.
    pub fn new() -> Result<Self> {
        Ok(Self {
            socket: NetlinkSocket::new()?,
        })
    }

    /// Get the underlying socket.
    pub fn socket(&self) -> &NetlinkSocket {
        &self.socket
    }

    /// Send a dump request and collect the whole multipart response.
    ///
    /// Returns the collected messages in receipt order, excluding the
    /// terminating done sentinel. An error sentinel mid-stream fails the
    /// whole exchange; nothing collected so far is returned, because an
    /// interrupted dump cannot be trusted to be complete.
    pub fn dump(&self, mut builder: MessageBuilder) -> Result<Vec<Message>> {
        let seq = self.socket.next_seq();
        builder.set_seq(seq);
        builder.set_pid(self.socket.pid());
        self.socket.send(&builder.finish())?;

        collect_dump(|| self.socket.recv(), seq)
    }

    /// Send a request that expects a single, non-multipart response.
    ///
    /// Reads exactly one batch and decodes exactly one message from it,
    /// with no sentinel scanning.
    pub fn request(&self, mut builder: MessageBuilder) -> Result<Message> {
        let seq = self.socket.next_seq();
        builder.set_seq(seq);
        builder.set_pid(self.socket.pid());
        self.socket.send(&builder.finish())?;

        let data = self.socket.recv()?;
        decode_single(&data)
    }
}

/// Decode exactly one message from a single-response batch.
///
/// No sentinel scanning; the one message is validated against the batch and
/// returned as-is.
fn decode_single(data: &[u8]) -> Result<Message> {
    let header = NlMsgHdr::from_bytes(data)?;
    let declared = header.nlmsg_len.get() as usize;
    if declared < NLMSG_HDRLEN || declared > data.len() {
        return Err(Error::FrameDoesNotFit {
            declared,
            remaining: data.len(),
        });
    }

    Ok(Message {
        header: *header,
        payload: data[NLMSG_HDRLEN..declared].to_vec(),
    })
}

/// Drive a dump exchange to completion over a receive source.
///
/// Loops over batches from `recv` until a done sentinel or a zero-length
/// read. A zero-length read is treated as clean completion with whatever
/// was collected (the kernel closed the dump early). Messages whose
/// sequence number does not match the request are skipped.
fn collect_dump<R>(mut recv: R, seq: u32) -> Result<Vec<Message>>
where
    R: FnMut() -> Result<Vec<u8>>,
{
    let mut collected = Vec::new();

    loop {
        let data = recv()?;
        if data.is_empty() {
            debug!(collected = collected.len(), "zero-length read ends dump");
            return Ok(collected);
        }

        for item in MessageIter::new(&data) {
            let (header, payload) = item?;

            if header.nlmsg_seq.get() != seq {
                continue;
            }

            if header.is_error() {
                let err = NlMsgError::from_bytes(payload)?;
                return Err(Error::from_errno(err.error.get()));
            }

            if header.is_done() {
                debug!(collected = collected.len(), "dump complete");
                return Ok(collected);
            }

            collected.push(Message {
                header: *header,
                payload: payload.to_vec(),
            });
        }
    }
}

/// Helper to build a dump request.
pub fn dump_request(msg_type: u16) -> MessageBuilder {
    MessageBuilder::new(msg_type, NLM_F_REQUEST | NLM_F_DUMP)
}

/// Helper to build a single-response request.
pub fn request(msg_type: u16) -> MessageBuilder {
    MessageBuilder::new(msg_type, NLM_F_REQUEST)
}
