//! Torrent metainfo parsing (BEP-3, single-file torrents)
//!
//! Loads a `.torrent` descriptor, computes the info hash over the
//! canonically re-encoded `info` dictionary, and exposes the piece
//! geometry the download pipeline works from.

mod error;
mod info_hash;
mod torrent;

pub use error::MetainfoError;
pub use info_hash::InfoHash;
pub use torrent::Metainfo;

#[cfg(test)]
mod tests;
