use std::fmt;

/// The SHA-1 digest of a torrent's canonically bencoded `info` dictionary.
///
/// This 20-byte value is the torrent's identity: it goes into the tracker
/// announce URL (percent-encoded byte by byte) and into the peer handshake
/// (raw).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct InfoHash([u8; 20]);

impl InfoHash {
    /// Computes the info hash over the canonical bencoding of the `info`
    /// dictionary.
    pub fn from_info_bytes(info_bytes: &[u8]) -> Self {
        use sha1::{Digest, Sha1};
        let hash: [u8; 20] = Sha1::digest(info_bytes).into();
        Self(hash)
    }

    /// Wraps a raw 20-byte digest.
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Returns the raw 20 bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Returns the lowercase hexadecimal form.
    pub fn to_hex(&self) -> String {
        hex_encode(&self.0)
    }

    /// Percent-encodes the raw bytes for a tracker announce URL.
    ///
    /// Unreserved characters (`A-Z a-z 0-9 - _ . ~`) pass through; every
    /// other byte becomes `%hh` with lowercase hex.
    pub fn url_encode(&self) -> String {
        self.0.iter().fold(String::with_capacity(60), |mut s, b| {
            use std::fmt::Write;
            if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~') {
                s.push(*b as char);
            } else {
                let _ = write!(s, "%{:02x}", b);
            }
            s
        })
    }
}

impl fmt::Debug for InfoHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InfoHash({})", self.to_hex())
    }
}

impl fmt::Display for InfoHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

pub(crate) fn hex_encode(bytes: &[u8]) -> String {
    bytes
        .iter()
        .fold(String::with_capacity(bytes.len() * 2), |mut s, b| {
            use std::fmt::Write;
            let _ = write!(s, "{:02x}", b);
            s
        })
}
