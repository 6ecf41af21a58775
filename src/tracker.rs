//! HTTP tracker protocol (BEP-3)
//!
//! Builds the percent-encoded announce URL, performs the GET, and parses
//! the compact IPv4 peer list out of the bencoded response.

mod error;
mod http;
mod response;

pub use error::TrackerError;
pub use http::{build_announce_url, parse_announce_response, url_encode_bytes, HttpTracker};
pub use response::{parse_compact_peers, AnnounceResponse, CompactPeer};
