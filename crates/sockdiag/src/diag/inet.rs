//! inet_diag request and response records (TCP/UDP over IPv4 and IPv6).

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use zerocopy::little_endian::U32;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use super::payload_too_short;
use crate::netlink::Result;

/// Socket identity (mirrors struct inet_diag_sockid).
///
/// Ports are big-endian on the wire and kept as raw byte pairs; addresses
/// are 16-byte fields with IPv4 occupying the leading 4 bytes.
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
pub struct InetDiagSockId {
    /// Source port (network order).
    pub sport: [u8; 2],
    /// Destination port (network order).
    pub dport: [u8; 2],
    /// Source address.
    pub src: [u8; 16],
    /// Destination address.
    pub dst: [u8; 16],
    /// Interface index.
    pub ifindex: U32,
    /// Opaque kernel cookie identifying the socket.
    pub cookie: [U32; 2],
}

impl InetDiagSockId {
    /// Source port in host order.
    pub fn sport(&self) -> u16 {
        u16::from_be_bytes(self.sport)
    }

    /// Destination port in host order.
    pub fn dport(&self) -> u16 {
        u16::from_be_bytes(self.dport)
    }
}

/// Dump request (mirrors struct inet_diag_req_v2).
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
pub struct InetDiagReqV2 {
    /// Address family (AF_INET or AF_INET6).
    pub family: u8,
    /// Transport protocol (IPPROTO_TCP, IPPROTO_UDP, ...).
    pub protocol: u8,
    /// Requested extensions (INET_DIAG_* bitmask).
    pub ext: u8,
    pub pad: u8,
    /// Socket-state filter bitmask.
    pub states: U32,
    /// Identity filter; zeroed to match any socket.
    pub id: InetDiagSockId,
}

impl InetDiagReqV2 {
    /// Request covering every socket state for the given family/protocol.
    pub fn all(family: u8, protocol: u8) -> Self {
        Self {
            family,
            protocol,
            states: U32::new(!0),
            ..Default::default()
        }
    }

    /// Replace the socket-state filter bitmask.
    pub fn states(mut self, mask: u32) -> Self {
        self.states = U32::new(mask);
        self
    }

    /// Serialize to the 56-byte wire form. Never fails.
    pub fn encode(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }

    /// Decode a request from bytes.
    pub fn decode(data: &[u8]) -> Result<&Self> {
        Self::ref_from_prefix(data)
            .map(|(r, _)| r)
            .map_err(|_| payload_too_short("inet_diag_req_v2", size_of::<Self>(), data.len()))
    }
}

/// Response record (mirrors struct inet_diag_msg).
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
pub struct InetDiagMsg {
    /// Address family of the socket.
    pub family: u8,
    /// Socket state (TCP state numbering).
    pub state: u8,
    /// Active kernel timer.
    pub timer: u8,
    /// Retransmit count for the active timer.
    pub retrans: u8,
    /// Socket identity.
    pub id: InetDiagSockId,
    /// Timer expiry in milliseconds.
    pub expires: U32,
    /// Receive queue length.
    pub rqueue: U32,
    /// Write queue length.
    pub wqueue: U32,
    /// Owning user ID.
    pub uid: U32,
    /// Inode number backing the socket.
    pub inode: U32,
}

impl InetDiagMsg {
    /// Decode a response record from a well-framed payload.
    pub fn decode(data: &[u8]) -> Result<&Self> {
        Self::ref_from_prefix(data)
            .map(|(r, _)| r)
            .map_err(|_| payload_too_short("inet_diag_msg", size_of::<Self>(), data.len()))
    }

    /// Local (source) socket address.
    pub fn local(&self) -> SocketAddr {
        SocketAddr::new(self.ip(&self.id.src), self.id.sport())
    }

    /// Remote (destination) socket address.
    pub fn remote(&self) -> SocketAddr {
        SocketAddr::new(self.ip(&self.id.dst), self.id.dport())
    }

    fn ip(&self, raw: &[u8; 16]) -> IpAddr {
        if self.family as i32 == libc::AF_INET {
            IpAddr::V4(Ipv4Addr::new(raw[0], raw[1], raw[2], raw[3]))
        } else {
            IpAddr::V6(Ipv6Addr::from(*raw))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netlink::Error;

    fn sample_sockid() -> InetDiagSockId {
        InetDiagSockId {
            sport: [0x10, 0x20],
            dport: [0x30, 0x40],
            src: [0x11; 16],
            dst: [0x22; 16],
            ifindex: U32::new(6),
            cookie: [U32::new(7), U32::new(8)],
        }
    }

    #[test]
    fn test_wire_sizes() {
        assert_eq!(size_of::<InetDiagSockId>(), 48);
        assert_eq!(size_of::<InetDiagReqV2>(), 56);
        assert_eq!(size_of::<InetDiagMsg>(), 72);
    }

    #[test]
    fn test_request_wire_layout() {
        let req = InetDiagReqV2 {
            family: 1,
            protocol: 2,
            ext: 3,
            pad: 4,
            states: U32::new(5),
            id: sample_sockid(),
        };
        let bytes = req.encode();

        assert_eq!(bytes[0], 1);
        assert_eq!(bytes[1], 2);
        assert_eq!(bytes[2], 3);
        assert_eq!(bytes[3], 4);
        assert_eq!(&bytes[4..8], &[5, 0, 0, 0]);
        // sockid starts at offset 8: ports kept verbatim, then addresses.
        assert_eq!(&bytes[8..10], &[0x10, 0x20]);
        assert_eq!(&bytes[10..12], &[0x30, 0x40]);
        assert_eq!(&bytes[12..28], &[0x11; 16]);
        assert_eq!(&bytes[28..44], &[0x22; 16]);
        assert_eq!(&bytes[44..48], &[6, 0, 0, 0]);
        assert_eq!(&bytes[48..52], &[7, 0, 0, 0]);
        assert_eq!(&bytes[52..56], &[8, 0, 0, 0]);
    }

    #[test]
    fn test_request_round_trip() {
        let req = InetDiagReqV2::all(libc::AF_INET as u8, libc::IPPROTO_TCP as u8);
        assert_eq!(req.states.get(), !0);

        let bytes = req.encode();
        let decoded = InetDiagReqV2::decode(&bytes).unwrap();
        assert_eq!(*decoded, req);
    }

    #[test]
    fn test_response_round_trip_and_addresses() {
        let mut msg = InetDiagMsg {
            family: libc::AF_INET as u8,
            state: 1,
            timer: 0,
            retrans: 0,
            id: sample_sockid(),
            expires: U32::new(0),
            rqueue: U32::new(6),
            wqueue: U32::new(7),
            uid: U32::new(1000),
            inode: U32::new(4242),
        };
        msg.id.src = [127, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];
        msg.id.sport = 8080u16.to_be_bytes();

        let decoded = InetDiagMsg::decode(msg.as_bytes()).unwrap();
        assert_eq!(*decoded, msg);
        assert_eq!(decoded.local().to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn test_decode_short_payload() {
        let err = InetDiagMsg::decode(&[0u8; 40]).unwrap_err();
        assert!(matches!(err, Error::Payload(_)));
        assert!(err.to_string().contains("inet_diag_msg"));
    }
}
