use std::net::SocketAddrV4;

use bytes::Bytes;
use sha1::{Digest, Sha1};
use tokio::net::TcpStream;
use tracing::{debug, info};

use super::bitfield::Bitfield;
use super::error::PeerError;
use super::message::{Handshake, Message};
use super::peer_id::PeerId;
use super::piece::{block_requests, PieceBuffer};
use super::transport::PeerTransport;
use crate::metainfo::Metainfo;

/// Connection lifecycle of a [`PeerSession`].
///
/// `Closed` is terminal and is entered from any state on a fatal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Handshake exchanged and verified.
    Connected,
    /// The peer's opening message (usually its bitfield) was consumed.
    BitfieldReceived,
    /// We announced interest and are waiting to be unchoked.
    Interested,
    /// The peer is serving our requests.
    Unchoked,
    /// A piece download is in flight.
    Downloading(u32),
    /// The connection is dead; the session cannot be used again.
    Closed,
}

/// A blocking-style download session with a single peer.
///
/// The session owns the socket and the in-flight piece buffer; the
/// metainfo is shared by read-only borrow. One session downloads one piece
/// at a time; a failed session is cheap to throw away and re-create
/// against another endpoint.
pub struct PeerSession<'a> {
    addr: SocketAddrV4,
    metainfo: &'a Metainfo,
    transport: PeerTransport,
    state: SessionState,
    remote_id: [u8; 20],
    bitfield: Option<Bitfield>,
    choked: bool,
}

impl<'a> PeerSession<'a> {
    /// Dials the peer and performs the 68-byte handshake exchange.
    ///
    /// The peer's echoed info hash must match ours
    /// ([`PeerError::HandshakeMismatch`] otherwise). Its advertised peer id
    /// is recorded but never trusted for any decision.
    pub async fn connect(
        addr: SocketAddrV4,
        metainfo: &'a Metainfo,
        peer_id: PeerId,
    ) -> Result<PeerSession<'a>, PeerError> {
        let stream = TcpStream::connect(addr).await?;
        let mut transport = PeerTransport::new(stream);

        let info_hash = *metainfo.info_hash().as_bytes();
        let handshake = Handshake::new(info_hash, *peer_id.as_bytes());
        transport.send_handshake(&handshake).await?;

        let theirs = transport.recv_handshake().await?;
        if theirs.info_hash != info_hash {
            return Err(PeerError::HandshakeMismatch);
        }

        info!(peer = %addr, "handshake successful");

        Ok(Self {
            addr,
            metainfo,
            transport,
            state: SessionState::Connected,
            remote_id: theirs.peer_id,
            bitfield: None,
            choked: true,
        })
    }

    /// Drives the session from handshake to the unchoked state.
    ///
    /// Reads until the peer's initial bitfield arrives (leniently, any
    /// message that is not `choke` counts as a proceed signal), then sends
    /// `interested` and waits for `unchoke`. A `choke` while waiting just
    /// resumes the wait.
    pub async fn prepare(&mut self) -> Result<(), PeerError> {
        loop {
            match self.recv().await? {
                Message::Bitfield(bits) => {
                    let bf = Bitfield::from_bytes(bits, self.metainfo.num_pieces() as usize);
                    debug!(peer = %self.addr, have = bf.count(), "peer bitfield");
                    self.bitfield = Some(bf);
                    break;
                }
                Message::Unchoke => {
                    self.choked = false;
                    break;
                }
                Message::Choke => {
                    self.choked = true;
                }
                Message::KeepAlive => {}
                other => {
                    debug!(peer = %self.addr, ?other, "proceeding without bitfield");
                    break;
                }
            }
        }
        self.state = SessionState::BitfieldReceived;

        self.send(Message::Interested).await?;
        self.state = SessionState::Interested;

        while self.choked {
            match self.recv().await? {
                Message::Unchoke => self.choked = false,
                Message::Choke => self.choked = true,
                Message::Bitfield(bits) => {
                    self.bitfield =
                        Some(Bitfield::from_bytes(bits, self.metainfo.num_pieces() as usize));
                }
                _ => {}
            }
        }

        self.state = SessionState::Unchoked;
        info!(peer = %self.addr, "peer unchoked us, ready to download");
        Ok(())
    }

    /// Downloads and verifies one piece.
    ///
    /// Issues every block request up front, reassembles the replies in
    /// whatever order they arrive, then checks the SHA-1 of the completed
    /// buffer against the metainfo. Messages other than `piece`, `choke`,
    /// and `unchoke` are discarded.
    pub async fn download_piece(&mut self, index: u32) -> Result<Bytes, PeerError> {
        if index >= self.metainfo.num_pieces() {
            return Err(PeerError::Protocol("piece index out of range"));
        }

        let size = self.metainfo.piece_size(index) as u32;
        self.state = SessionState::Downloading(index);

        let requests = block_requests(index, size);
        debug!(piece = index, blocks = requests.len(), "requesting blocks");
        for request in &requests {
            self.send(Message::Request {
                index: request.index,
                begin: request.begin,
                length: request.length,
            })
            .await?;
        }

        let mut buffer = PieceBuffer::new(size);
        while !buffer.is_complete() {
            match self.recv().await? {
                Message::Piece {
                    index: received,
                    begin,
                    data,
                } => {
                    if received != index {
                        self.state = SessionState::Closed;
                        return Err(PeerError::Protocol("piece index mismatch"));
                    }
                    if let Err(e) = buffer.write_block(begin, &data) {
                        self.state = SessionState::Closed;
                        return Err(e);
                    }
                    debug!(
                        piece = index,
                        received = buffer.received(),
                        size,
                        "block stored"
                    );
                }
                Message::Choke => {
                    self.choked = true;
                    self.state = SessionState::Interested;
                    return Err(PeerError::Choked);
                }
                Message::Unchoke => {
                    self.choked = false;
                }
                _ => {}
            }
        }

        let data = buffer.into_bytes();
        let digest: [u8; 20] = Sha1::digest(&data).into();
        if &digest != self.metainfo.piece_hash(index) {
            self.state = SessionState::Unchoked;
            return Err(PeerError::HashMismatch(index));
        }

        self.state = SessionState::Unchoked;
        info!(piece = index, bytes = data.len(), "piece verified");
        Ok(data)
    }

    /// Current state of the session FSM.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The peer's endpoint.
    pub fn addr(&self) -> SocketAddrV4 {
        self.addr
    }

    /// The peer id the remote sent in its handshake. Informational only.
    pub fn remote_id(&self) -> &[u8; 20] {
        &self.remote_id
    }

    /// The peer's bitfield, when one was received.
    pub fn bitfield(&self) -> Option<&Bitfield> {
        self.bitfield.as_ref()
    }

    async fn send(&mut self, message: Message) -> Result<(), PeerError> {
        match self.transport.send_message(&message).await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.state = SessionState::Closed;
                Err(e)
            }
        }
    }

    async fn recv(&mut self) -> Result<Message, PeerError> {
        match self.transport.recv_message().await {
            Ok(message) => Ok(message),
            Err(e) => {
                self.state = SessionState::Closed;
                Err(e)
            }
        }
    }
}
