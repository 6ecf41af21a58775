use super::error::PeerError;
use super::message::{Handshake, Message, HANDSHAKE_LEN};
use bytes::BytesMut;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

// Largest frame we accept: a full block message plus header, with slack
// for bitfields of very large torrents.
const MAX_MESSAGE_LEN: usize = 1024 * 1024;
const READ_TIMEOUT: Duration = Duration::from_secs(30);
const WRITE_TIMEOUT: Duration = Duration::from_secs(30);

/// Length-prefixed framing over a peer TCP stream.
///
/// Partial reads are looped until a whole frame (`4 + N` bytes) is
/// buffered, so a caller always consumes exactly one message at a time.
/// Every socket operation carries a 30 second deadline, turning a dead
/// connection into [`PeerError::Timeout`].
pub struct PeerTransport {
    stream: TcpStream,
    read_buf: BytesMut,
}

impl PeerTransport {
    pub fn new(stream: TcpStream) -> Self {
        Self {
            stream,
            read_buf: BytesMut::with_capacity(32 * 1024),
        }
    }

    async fn fill(&mut self) -> Result<(), PeerError> {
        let n = timeout(READ_TIMEOUT, self.stream.read_buf(&mut self.read_buf))
            .await
            .map_err(|_| PeerError::Timeout)??;

        if n == 0 {
            return Err(PeerError::ConnectionClosed);
        }
        Ok(())
    }

    pub async fn send_handshake(&mut self, handshake: &Handshake) -> Result<(), PeerError> {
        let data = handshake.encode();
        timeout(WRITE_TIMEOUT, self.stream.write_all(&data))
            .await
            .map_err(|_| PeerError::Timeout)??;
        Ok(())
    }

    pub async fn recv_handshake(&mut self) -> Result<Handshake, PeerError> {
        while self.read_buf.len() < HANDSHAKE_LEN {
            self.fill().await?;
        }

        let data = self.read_buf.split_to(HANDSHAKE_LEN);
        Handshake::decode(&data)
    }

    pub async fn send_message(&mut self, message: &Message) -> Result<(), PeerError> {
        let data = message.encode();
        timeout(WRITE_TIMEOUT, self.stream.write_all(&data))
            .await
            .map_err(|_| PeerError::Timeout)??;
        Ok(())
    }

    pub async fn recv_message(&mut self) -> Result<Message, PeerError> {
        while self.read_buf.len() < 4 {
            self.fill().await?;
        }

        let length = u32::from_be_bytes([
            self.read_buf[0],
            self.read_buf[1],
            self.read_buf[2],
            self.read_buf[3],
        ]) as usize;

        if length > MAX_MESSAGE_LEN {
            return Err(PeerError::InvalidMessage("frame too large"));
        }

        let frame_len = 4 + length;
        while self.read_buf.len() < frame_len {
            self.fill().await?;
        }

        let data = self.read_buf.split_to(frame_len);
        Message::decode(data.freeze())
    }
}
