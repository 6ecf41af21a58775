//! grabit - a minimal single-file BitTorrent v1 download client
//!
//! Given a `.torrent` descriptor for a single-file torrent, grabit locates
//! peers through the HTTP tracker and retrieves the file from one peer
//! over the BitTorrent wire protocol, verifying every piece against its
//! SHA-1 digest before accepting it.
//!
//! # Modules
//!
//! - [`bencode`] - strict bencode codec with canonical re-encoding
//! - [`metainfo`] - torrent descriptor parsing and info-hash computation
//! - [`tracker`] - HTTP announce and compact peer list parsing
//! - [`peer`] - handshake, message framing, and the piece pipeline
//! - [`client`] - sequential download orchestration

pub mod bencode;
pub mod client;
pub mod metainfo;
pub mod peer;
pub mod tracker;

pub use bencode::{decode, encode, BencodeError, Value};
pub use client::ClientError;
pub use metainfo::{InfoHash, Metainfo, MetainfoError};
pub use peer::{
    Bitfield, BlockRequest, Handshake, Message, PeerError, PeerId, PeerSession, SessionState,
};
pub use tracker::{AnnounceResponse, CompactPeer, HttpTracker, TrackerError};
