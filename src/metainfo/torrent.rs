use super::error::MetainfoError;
use super::info_hash::{hex_encode, InfoHash};
use crate::bencode::{decode, encode, Value};
use bytes::Bytes;
use std::fmt::Write as _;

/// A parsed single-file torrent descriptor.
///
/// Immutable after load. Holds the tracker URL, the piece geometry, and the
/// info hash in both raw and hex form.
///
/// # Examples
///
/// ```no_run
/// use grabit::metainfo::Metainfo;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let data = std::fs::read("example.torrent")?;
/// let metainfo = Metainfo::from_bytes(&data)?;
/// println!("{} ({} bytes)", metainfo.name(), metainfo.total_length());
/// println!("info hash: {}", metainfo.info_hash());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Metainfo {
    announce: String,
    info_hash: InfoHash,
    name: String,
    piece_length: u64,
    total_length: u64,
    pieces: Vec<[u8; 20]>,
    raw_info: Bytes,
}

impl Metainfo {
    /// Parses a torrent descriptor from raw bytes.
    ///
    /// The `info` dictionary is re-encoded canonically and SHA-1 hashed to
    /// produce the info hash, so the decoded tree never needs to remember
    /// the original key order.
    ///
    /// # Errors
    ///
    /// Returns an error if the data is not valid bencode, a required field
    /// is missing or has the wrong type, a length is not positive, or the
    /// number of piece digests disagrees with `ceil(length / piece length)`.
    pub fn from_bytes(data: &[u8]) -> Result<Self, MetainfoError> {
        let value = decode(data)?;
        let dict = value.as_dict().ok_or(MetainfoError::InvalidField("root"))?;

        let announce = dict
            .get(b"announce".as_slice())
            .ok_or(MetainfoError::MissingField("announce"))?
            .as_str()
            .ok_or(MetainfoError::InvalidField("announce"))?
            .to_string();

        let info_value = dict
            .get(b"info".as_slice())
            .ok_or(MetainfoError::MissingField("info"))?;

        let raw_info = Bytes::from(encode(info_value)?);
        let info_hash = InfoHash::from_info_bytes(&raw_info);

        let info = info_value
            .as_dict()
            .ok_or(MetainfoError::InvalidField("info"))?;

        let name = info
            .get(b"name".as_slice())
            .ok_or(MetainfoError::MissingField("name"))?
            .as_str()
            .ok_or(MetainfoError::InvalidField("name"))?
            .to_string();

        let total_length = require_positive(info.get(b"length".as_slice()), "length")?;
        let piece_length = require_positive(info.get(b"piece length".as_slice()), "piece length")?;

        let pieces_bytes = info
            .get(b"pieces".as_slice())
            .ok_or(MetainfoError::MissingField("pieces"))?
            .as_bytes()
            .ok_or(MetainfoError::InvalidField("pieces"))?;

        if pieces_bytes.len() % 20 != 0 {
            return Err(MetainfoError::InvalidField("pieces"));
        }

        let pieces: Vec<[u8; 20]> = pieces_bytes
            .chunks_exact(20)
            .map(|chunk| {
                let mut arr = [0u8; 20];
                arr.copy_from_slice(chunk);
                arr
            })
            .collect();

        let expected = total_length.div_ceil(piece_length);
        if pieces.len() as u64 != expected {
            return Err(MetainfoError::PieceCountMismatch {
                expected,
                actual: pieces.len() as u64,
            });
        }

        Ok(Self {
            announce,
            info_hash,
            name,
            piece_length,
            total_length,
            pieces,
            raw_info,
        })
    }

    /// Returns the tracker announce URL.
    pub fn announce(&self) -> &str {
        &self.announce
    }

    /// Returns the info hash.
    pub fn info_hash(&self) -> &InfoHash {
        &self.info_hash
    }

    /// Returns the suggested file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the total file length in bytes.
    pub fn total_length(&self) -> u64 {
        self.total_length
    }

    /// Returns the nominal piece length in bytes.
    pub fn piece_length(&self) -> u64 {
        self.piece_length
    }

    /// Returns the number of pieces.
    pub fn num_pieces(&self) -> u32 {
        self.pieces.len() as u32
    }

    /// Returns the expected SHA-1 digest of piece `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range; callers iterate `0..num_pieces()`.
    pub fn piece_hash(&self, index: u32) -> &[u8; 20] {
        &self.pieces[index as usize]
    }

    /// Returns the size of piece `index`.
    ///
    /// Every piece has the nominal length except the last, which carries
    /// `total_length % piece_length` bytes, or a full piece when the file
    /// divides evenly.
    pub fn piece_size(&self, index: u32) -> u64 {
        if index + 1 < self.num_pieces() {
            return self.piece_length;
        }
        let remainder = self.total_length % self.piece_length;
        if remainder == 0 {
            self.piece_length
        } else {
            remainder
        }
    }

    /// Returns the canonical bencoding of the `info` dictionary.
    pub fn raw_info(&self) -> &Bytes {
        &self.raw_info
    }

    /// Renders the human-readable summary printed by the `info` command.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Tracker URL: {}", self.announce);
        let _ = writeln!(out, "File Name:   {}", self.name);
        let _ = writeln!(out, "File Length: {} bytes", self.total_length);
        let _ = writeln!(out, "Piece Length: {} bytes", self.piece_length);
        let _ = writeln!(out, "Num Pieces:  {}", self.num_pieces());
        let _ = writeln!(out, "Info Hash:   {}", self.info_hash);
        let _ = writeln!(out, "Piece Hashes:");
        for piece in &self.pieces {
            let _ = writeln!(out, "  {}", hex_encode(piece));
        }
        out
    }
}

fn require_positive(value: Option<&Value>, field: &'static str) -> Result<u64, MetainfoError> {
    let n = value
        .ok_or(MetainfoError::MissingField(field))?
        .as_integer()
        .ok_or(MetainfoError::InvalidField(field))?;
    if n <= 0 {
        return Err(MetainfoError::NonPositiveLength(field));
    }
    Ok(n as u64)
}
