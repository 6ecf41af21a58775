use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use super::error::TrackerError;
use super::response::{parse_compact_peers, AnnounceResponse};
use crate::bencode::decode;
use crate::metainfo::Metainfo;
use crate::peer::PeerId;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// An HTTP tracker client (BEP-3).
///
/// Announces the torrent over a plain GET request and parses the compact
/// peer list out of the bencoded response body.
///
/// # Examples
///
/// ```no_run
/// use grabit::metainfo::Metainfo;
/// use grabit::peer::PeerId;
/// use grabit::tracker::HttpTracker;
///
/// # async fn example(metainfo: Metainfo) -> Result<(), Box<dyn std::error::Error>> {
/// let tracker = HttpTracker::new(metainfo.announce())?;
/// let response = tracker.announce(&metainfo, &PeerId::generate(), 6881).await?;
/// println!("found {} peers", response.peers.len());
/// # Ok(())
/// # }
/// ```
pub struct HttpTracker {
    client: Client,
    url: String,
}

impl HttpTracker {
    pub fn new(url: &str) -> Result<Self, TrackerError> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(TrackerError::InvalidUrl(url.to_string()));
        }

        let client = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(TrackerError::Http)?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    /// Announces to the tracker and returns the peer list.
    ///
    /// `port` is reported as our listening port; a download-only client
    /// does not need a real listener behind it.
    pub async fn announce(
        &self,
        metainfo: &Metainfo,
        peer_id: &PeerId,
        port: u16,
    ) -> Result<AnnounceResponse, TrackerError> {
        let url = build_announce_url(
            &self.url,
            metainfo.info_hash().as_bytes(),
            peer_id.as_bytes(),
            port,
            metainfo.total_length(),
        );
        debug!(%url, "announcing");

        let response = self.client.get(&url).send().await?.error_for_status()?;
        let body = response.bytes().await?;

        parse_announce_response(&body)
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Builds the announce URL with every binary field percent-encoded byte by
/// byte.
pub fn build_announce_url(
    base: &str,
    info_hash: &[u8; 20],
    peer_id: &[u8; 20],
    port: u16,
    left: u64,
) -> String {
    format!(
        "{}?info_hash={}&peer_id={}&port={}&uploaded=0&downloaded=0&left={}&compact=1",
        base,
        url_encode_bytes(info_hash),
        url_encode_bytes(peer_id),
        port,
        left
    )
}

/// Parses a bencoded announce response body.
///
/// A `failure reason` key turns into [`TrackerError::Rejected`]; otherwise
/// the compact `peers` byte string is required.
pub fn parse_announce_response(body: &[u8]) -> Result<AnnounceResponse, TrackerError> {
    let value = decode(body)?;
    let dict = value
        .as_dict()
        .ok_or(TrackerError::InvalidResponse("expected dictionary"))?;

    if let Some(reason) = dict
        .get(b"failure reason".as_slice())
        .and_then(|v| v.as_str())
    {
        return Err(TrackerError::Rejected(reason.to_string()));
    }

    let peers_blob = dict
        .get(b"peers".as_slice())
        .ok_or(TrackerError::InvalidResponse("missing peers"))?
        .as_bytes()
        .ok_or(TrackerError::InvalidResponse("peers is not a byte string"))?;

    let peers = parse_compact_peers(peers_blob)?;

    let int_field = |key: &[u8]| dict.get(key).and_then(|v| v.as_integer()).map(|v| v as u64);

    Ok(AnnounceResponse {
        peers,
        interval: int_field(b"interval"),
        complete: int_field(b"complete"),
        incomplete: int_field(b"incomplete"),
    })
}

/// Percent-encodes arbitrary bytes for a query string: unreserved
/// characters pass through, everything else becomes `%hh` lowercase.
pub fn url_encode_bytes(bytes: &[u8]) -> String {
    use std::fmt::Write;
    bytes.iter().fold(String::new(), |mut s, b| {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~') {
            s.push(*b as char);
        } else {
            let _ = write!(s, "%{:02x}", b);
        }
        s
    })
}
