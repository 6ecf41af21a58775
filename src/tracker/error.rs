use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("bencode error: {0}")]
    Bencode(#[from] crate::bencode::BencodeError),

    #[error("tracker rejected announce: {0}")]
    Rejected(String),

    #[error("invalid response: {0}")]
    InvalidResponse(&'static str),

    #[error("peers blob is not a whole number of 6-byte records")]
    MalformedPeers,

    #[error("invalid tracker url: {0}")]
    InvalidUrl(String),
}
