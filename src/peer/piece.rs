use super::error::PeerError;
use bytes::Bytes;

/// Transfer unit within a piece (16 KiB).
pub const BLOCK_SIZE: u32 = 16384;

/// A request for one block of a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockRequest {
    /// The piece index.
    pub index: u32,
    /// Byte offset within the piece.
    pub begin: u32,
    /// Length of the block in bytes.
    pub length: u32,
}

/// Partitions `[0, piece_size)` into block requests of [`BLOCK_SIZE`], the
/// last possibly shorter.
pub fn block_requests(index: u32, piece_size: u32) -> Vec<BlockRequest> {
    let mut requests = Vec::with_capacity(piece_size.div_ceil(BLOCK_SIZE) as usize);
    let mut begin = 0;
    while begin < piece_size {
        let length = BLOCK_SIZE.min(piece_size - begin);
        requests.push(BlockRequest {
            index,
            begin,
            length,
        });
        begin += length;
    }
    requests
}

/// Reassembly buffer for one piece.
///
/// Blocks may arrive in any order; each lands at its `begin` offset. The
/// buffer counts received bytes and is complete once the whole piece size
/// has arrived; holes from overlapping deliveries are caught by the SHA-1
/// check downstream.
#[derive(Debug)]
pub struct PieceBuffer {
    buf: Vec<u8>,
    received: usize,
}

impl PieceBuffer {
    pub fn new(piece_size: u32) -> Self {
        Self {
            buf: vec![0; piece_size as usize],
            received: 0,
        }
    }

    /// Places one block at its offset.
    ///
    /// # Errors
    ///
    /// Returns [`PeerError::Protocol`] when the block runs past the end of
    /// the piece.
    pub fn write_block(&mut self, begin: u32, data: &[u8]) -> Result<(), PeerError> {
        let begin = begin as usize;
        let end = begin
            .checked_add(data.len())
            .ok_or(PeerError::Protocol("block offset overflow"))?;
        if end > self.buf.len() {
            return Err(PeerError::Protocol("block outside piece bounds"));
        }

        self.buf[begin..end].copy_from_slice(data);
        self.received += data.len();
        Ok(())
    }

    /// Bytes received so far.
    pub fn received(&self) -> usize {
        self.received
    }

    /// True once the received byte count covers the piece.
    pub fn is_complete(&self) -> bool {
        self.received >= self.buf.len()
    }

    /// Total piece size in bytes.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Consumes the buffer into the assembled piece.
    pub fn into_bytes(self) -> Bytes {
        Bytes::from(self.buf)
    }
}
