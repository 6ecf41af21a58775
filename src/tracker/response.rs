use std::net::{Ipv4Addr, SocketAddrV4};

use super::error::TrackerError;

/// A peer endpoint in the tracker's compact encoding.
///
/// Six bytes per peer: four address octets followed by a big-endian port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompactPeer(pub SocketAddrV4);

impl CompactPeer {
    /// Parses one 6-byte record.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < 6 {
            return None;
        }
        let ip = Ipv4Addr::new(bytes[0], bytes[1], bytes[2], bytes[3]);
        let port = u16::from_be_bytes([bytes[4], bytes[5]]);
        Some(Self(SocketAddrV4::new(ip, port)))
    }

    /// Serializes back to the 6-byte wire form.
    pub fn to_bytes(self) -> [u8; 6] {
        let mut out = [0u8; 6];
        out[..4].copy_from_slice(&self.0.ip().octets());
        out[4..].copy_from_slice(&self.0.port().to_be_bytes());
        out
    }

    pub fn addr(self) -> SocketAddrV4 {
        self.0
    }
}

/// Parses a compact peers blob into endpoints, preserving order and
/// duplicates.
///
/// # Errors
///
/// Returns [`TrackerError::MalformedPeers`] when the blob length is not a
/// multiple of six.
pub fn parse_compact_peers(data: &[u8]) -> Result<Vec<SocketAddrV4>, TrackerError> {
    if data.len() % 6 != 0 {
        return Err(TrackerError::MalformedPeers);
    }
    Ok(data
        .chunks_exact(6)
        .filter_map(CompactPeer::from_bytes)
        .map(CompactPeer::addr)
        .collect())
}

/// A parsed announce response.
#[derive(Debug, Clone)]
pub struct AnnounceResponse {
    /// Peer endpoints, in the tracker's order.
    pub peers: Vec<SocketAddrV4>,
    /// Seconds the tracker asks us to wait before re-announcing.
    pub interval: Option<u64>,
    /// Number of seeders, when reported.
    pub complete: Option<u64>,
    /// Number of leechers, when reported.
    pub incomplete: Option<u64>,
}
