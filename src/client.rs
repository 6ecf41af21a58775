//! Sequential download orchestration.
//!
//! Ties the components together: announce to the tracker, open one session
//! against the first peer, download every piece in index order, and hand
//! back the concatenated, verified file bytes. Writing the output file is
//! the caller's job.

use bytes::Bytes;
use thiserror::Error;
use tracing::info;

use crate::metainfo::Metainfo;
use crate::peer::{PeerError, PeerId, PeerSession};
use crate::tracker::{HttpTracker, TrackerError};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("tracker error: {0}")]
    Tracker(#[from] TrackerError),

    #[error("peer error: {0}")]
    Peer(#[from] PeerError),

    #[error("tracker returned no peers")]
    NoPeers,
}

/// Downloads the torrent's single file and returns its bytes.
///
/// Fail-fast: the first error from any component aborts the run. Every
/// piece is SHA-1 verified by the session before it is appended, so the
/// returned buffer is exactly the file the metainfo describes.
pub async fn download(
    metainfo: &Metainfo,
    peer_id: PeerId,
    port: u16,
) -> Result<Bytes, ClientError> {
    let peers = fetch_peers(metainfo, &peer_id, port).await?;
    let peer = *peers.first().ok_or(ClientError::NoPeers)?;

    let mut session = PeerSession::connect(peer, metainfo, peer_id).await?;
    session.prepare().await?;

    let mut file = Vec::with_capacity(metainfo.total_length() as usize);
    for index in 0..metainfo.num_pieces() {
        let piece = session.download_piece(index).await?;
        file.extend_from_slice(&piece);
        info!(
            piece = index,
            total = metainfo.num_pieces(),
            "piece complete"
        );
    }

    Ok(Bytes::from(file))
}

/// Announces to the metainfo's tracker and returns its peer list.
pub async fn fetch_peers(
    metainfo: &Metainfo,
    peer_id: &PeerId,
    port: u16,
) -> Result<Vec<std::net::SocketAddrV4>, ClientError> {
    let tracker = HttpTracker::new(metainfo.announce())?;
    let response = tracker.announce(metainfo, peer_id, port).await?;
    info!(peers = response.peers.len(), "tracker announce complete");
    Ok(response.peers)
}
