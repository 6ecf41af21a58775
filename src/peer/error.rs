use thiserror::Error;

/// Errors that can occur during peer communication.
#[derive(Debug, Error)]
pub enum PeerError {
    /// Network I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A socket read or write exceeded its deadline.
    #[error("timeout")]
    Timeout,

    /// The peer closed the connection.
    #[error("connection closed")]
    ConnectionClosed,

    /// The peer's handshake does not follow the fixed 68-byte layout.
    #[error("invalid handshake")]
    InvalidHandshake,

    /// The peer answered the handshake with a different info hash.
    #[error("handshake info hash mismatch")]
    HandshakeMismatch,

    /// Received a malformed protocol message.
    #[error("invalid message: {0}")]
    InvalidMessage(&'static str),

    /// The peer violated the protocol while a piece was in flight.
    #[error("protocol violation: {0}")]
    Protocol(&'static str),

    /// The peer choked us mid-download.
    #[error("choked by peer")]
    Choked,

    /// A completed piece failed SHA-1 verification.
    #[error("piece {0} failed hash verification")]
    HashMismatch(u32),
}
