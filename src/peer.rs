//! Peer wire protocol (BEP-3)
//!
//! The fixed 68-byte handshake, length-prefixed message framing, and the
//! per-piece request/verify pipeline of a download-only session.

mod bitfield;
mod error;
mod message;
mod peer_id;
mod piece;
mod session;
mod transport;

pub use bitfield::Bitfield;
pub use error::PeerError;
pub use message::{Handshake, Message, MessageId, HANDSHAKE_LEN, PROTOCOL};
pub use peer_id::PeerId;
pub use piece::{block_requests, BlockRequest, PieceBuffer, BLOCK_SIZE};
pub use session::{PeerSession, SessionState};
pub use transport::PeerTransport;
