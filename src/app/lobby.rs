use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::timeout;
use tokio_util::codec::Framed;
use tracing::Instrument;
use uuid::Uuid;

use crate::card_game::DeckCatalog;
use crate::connection::{handle_connection, FrameCodec};
use crate::domain::Game;
use crate::error::ProtocolError;
use crate::game::{MatchManager, MatchOutcome};
use crate::shared::{
    COMMAND_QUEUE, HANDSHAKE_BUFFER, HANDSHAKE_TIMEOUT_SECS, MAX_USERNAME_BYTES, OUTBOUND_QUEUE,
    PLAYER_COUNT, SHUTDOWN_GRACE_SECS,
};

/// A connection that has completed the username handshake.
pub struct Seat {
    pub name: String,
    pub peer: SocketAddr,
    stream: TcpStream,
}

/// Owns the listening socket and the players waiting for a match.
pub struct Lobby {
    listener: TcpListener,
    seats: Vec<Seat>,
}

impl Lobby {
    pub async fn bind(addr: SocketAddr) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        Ok(Self::new(listener))
    }

    pub fn new(listener: TcpListener) -> Self {
        Self {
            listener,
            seats: Vec::with_capacity(PLAYER_COUNT),
        }
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    /// Accept connections until every seat is taken.
    ///
    /// Handshakes run side by side and seats go to whoever finishes naming
    /// themselves first. Connections that fail the handshake are dropped and
    /// do not take a seat; handshakes still running when the lobby fills are
    /// cancelled.
    pub async fn fill(&mut self) -> anyhow::Result<()> {
        let mut handshakes = JoinSet::new();
        while self.seats.len() < PLAYER_COUNT {
            tokio::select! {
                accepted = self.listener.accept() => {
                    let (stream, peer) = accepted.context("accept failed")?;
                    handshakes.spawn(handshake(stream, peer));
                }
                Some(joined) = handshakes.join_next() => {
                    match joined {
                        Ok(Some(seat)) => {
                            tracing::info!(
                                peer = %seat.peer,
                                name = %seat.name,
                                seat = self.seats.len(),
                                "player joined"
                            );
                            self.seats.push(seat);
                        }
                        Ok(None) => {}
                        Err(err) => tracing::error!(%err, "handshake task failed"),
                    }
                }
            }
        }
        Ok(())
    }

    /// Deal a new game to the seated players and run it to the end.
    ///
    /// `seed` makes the deck shuffles reproducible.
    pub async fn start_match(
        self,
        catalog: &DeckCatalog,
        seed: Option<u64>,
    ) -> anyhow::Result<MatchOutcome> {
        let Lobby { listener, seats } = self;
        let span = tracing::info_span!("match", match_id = %Uuid::new_v4());

        let names: Vec<String> = seats.iter().map(|s| s.name.clone()).collect();
        let mut game = match seed {
            Some(seed) => Game::with_rng(names.clone(), catalog, &mut StdRng::seed_from_u64(seed)),
            None => Game::new(names.clone(), catalog),
        }?;
        game.lay_out_all();

        let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_QUEUE);
        let mut outbound = Vec::with_capacity(seats.len());
        let mut handlers = Vec::with_capacity(seats.len());
        for (seat, Seat { peer, stream, .. }) in seats.into_iter().enumerate() {
            let (tx, rx) = mpsc::channel(OUTBOUND_QUEUE);
            outbound.push(tx);
            let conn_span = tracing::info_span!(parent: &span, "seat", seat, %peer);
            let framed = Framed::new(stream, FrameCodec);
            handlers.push(tokio::spawn(
                handle_connection(seat, framed, cmd_tx.clone(), rx).instrument(conn_span),
            ));
        }
        drop(cmd_tx);

        let gate = tokio::spawn(turn_away(listener).instrument(span.clone()));
        span.in_scope(|| tracing::info!(players = ?names, "match started"));

        let outcome = MatchManager::new(game, outbound)
            .run(cmd_rx)
            .instrument(span.clone())
            .await;
        gate.abort();

        for handler in handlers {
            if timeout(Duration::from_secs(SHUTDOWN_GRACE_SECS), handler).await.is_err() {
                span.in_scope(|| tracing::warn!("connection did not close in time"));
            }
        }
        outcome
    }
}

/// The username is the first raw (unframed) read on a new connection.
pub async fn read_username(stream: &mut TcpStream) -> Result<String, ProtocolError> {
    let mut buf = [0u8; HANDSHAKE_BUFFER];
    let n = stream.read(&mut buf).await?;
    if n == 0 {
        return Err(ProtocolError::EmptyUsername);
    }
    if n > MAX_USERNAME_BYTES {
        return Err(ProtocolError::UsernameTooLong(n));
    }
    String::from_utf8(buf[..n].to_vec()).map_err(|_| ProtocolError::InvalidUtf8)
}

async fn handshake(mut stream: TcpStream, peer: SocketAddr) -> Option<Seat> {
    match timeout(Duration::from_secs(HANDSHAKE_TIMEOUT_SECS), read_username(&mut stream)).await {
        Ok(Ok(name)) => Some(Seat { name, peer, stream }),
        Ok(Err(err)) => {
            tracing::warn!(%peer, %err, "handshake failed");
            None
        }
        Err(_) => {
            tracing::warn!(%peer, "handshake timed out");
            None
        }
    }
}

/// Close every connection that arrives while a match is running.
async fn turn_away(listener: TcpListener) {
    loop {
        match listener.accept().await {
            Ok((_stream, peer)) => {
                tracing::info!(%peer, "match in progress, refusing connection");
            }
            Err(err) => {
                tracing::warn!(%err, "accept failed");
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
        }
    }
}
