#![cfg(feature = "std")]

//! Match relay: forwards every frame a client sends to all connections of
//! the same match, the sender included.
//!
//! The first frame on a connection names what the client wants:
//! `CONNECT /ws/game/<id>` joins the match (answered with `OK`), while
//! `LOOKUP /game/<id>` asks whether the match exists (answered with `200`
//! or `404`, after which the connection is closed). Frames are relayed
//! verbatim; the relay never parses messages. When a connection of a match
//! ends, the remaining connections receive a `PEER_LEFT` frame.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};
use tokio::sync::{mpsc, RwLock};
use tokio::time::timeout;

use crate::config::NetConfig;
use crate::protocol::{LOOKUP_PATH, WS_PATH};
use crate::transport::frame::{read_frame, write_frame};

/// Acknowledgement of a CONNECT request.
pub const RELAY_OK: &str = "OK";
/// Sent to the rest of a match when one of its connections ends.
pub const RELAY_PEER_LEFT: &str = "PEER_LEFT";
pub const LOOKUP_FOUND: &str = "200";
pub const LOOKUP_MISSING: &str = "404";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayRequest {
    Connect { game_id: String },
    Lookup { game_id: String },
}

impl RelayRequest {
    pub fn parse(line: &str) -> anyhow::Result<Self> {
        let (verb, path) = line
            .split_once(' ')
            .ok_or_else(|| anyhow::anyhow!("Malformed relay request: {:?}", line))?;
        let (prefix, build): (&str, fn(String) -> Self) = match verb {
            "CONNECT" => (WS_PATH, |game_id| Self::Connect { game_id }),
            "LOOKUP" => (LOOKUP_PATH, |game_id| Self::Lookup { game_id }),
            _ => return Err(anyhow::anyhow!("Unknown relay request: {:?}", verb)),
        };
        let game_id = path
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|id| !id.is_empty() && !id.contains(char::is_whitespace))
            .ok_or_else(|| anyhow::anyhow!("Bad relay path: {:?}", path))?;
        Ok(build(game_id.to_string()))
    }

    pub fn game_id(&self) -> &str {
        match self {
            Self::Connect { game_id } | Self::Lookup { game_id } => game_id,
        }
    }
}

impl core::fmt::Display for RelayRequest {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Connect { game_id } => write!(f, "CONNECT {}/{}", WS_PATH, game_id),
            Self::Lookup { game_id } => write!(f, "LOOKUP {}/{}", LOOKUP_PATH, game_id),
        }
    }
}

type Outbox = mpsc::UnboundedSender<String>;

/// Live connections grouped by match id.
///
/// A match exists from its first connection until its last one leaves.
#[derive(Default)]
pub struct MatchRegistry {
    matches: RwLock<HashMap<String, HashMap<u64, Outbox>>>,
    next_id: AtomicU64,
}

impl MatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn exists(&self, game_id: &str) -> bool {
        self.matches.read().await.contains_key(game_id)
    }

    /// Number of matches with at least one connection.
    pub async fn match_count(&self) -> usize {
        self.matches.read().await.len()
    }

    pub async fn connection_count(&self, game_id: &str) -> usize {
        self.matches
            .read()
            .await
            .get(game_id)
            .map_or(0, HashMap::len)
    }

    /// Register a connection, creating the match if needed. Frames for the
    /// match are delivered on the returned receiver.
    pub async fn join(&self, game_id: &str) -> (u64, mpsc::UnboundedReceiver<String>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();
        self.matches
            .write()
            .await
            .entry(game_id.to_string())
            .or_default()
            .insert(id, tx);
        (id, rx)
    }

    /// Drop a connection. The match disappears with its last connection.
    pub async fn leave(&self, game_id: &str, id: u64) {
        let mut matches = self.matches.write().await;
        if let Some(conns) = matches.get_mut(game_id) {
            conns.remove(&id);
            if conns.is_empty() {
                matches.remove(game_id);
                log::info!("match {} closed", game_id);
            }
        }
    }

    /// Deliver `frame` to every connection of the match. Returns how many
    /// connections it was queued for.
    pub async fn broadcast(&self, game_id: &str, frame: &str) -> usize {
        let matches = self.matches.read().await;
        let Some(conns) = matches.get(game_id) else {
            return 0;
        };
        conns
            .values()
            .filter(|tx| tx.send(frame.to_string()).is_ok())
            .count()
    }
}

/// Accept connections until the listener fails.
pub async fn serve(
    listener: TcpListener,
    registry: Arc<MatchRegistry>,
    config: NetConfig,
) -> anyhow::Result<()> {
    log::info!("relay listening on {}", listener.local_addr()?);
    loop {
        let (stream, peer) = listener.accept().await?;
        let registry = registry.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, registry, config).await {
                log::debug!("connection {} ended: {}", peer, e);
            }
        });
    }
}

async fn handle_connection(
    stream: TcpStream,
    registry: Arc<MatchRegistry>,
    config: NetConfig,
) -> anyhow::Result<()> {
    let (mut read, mut write) = stream.into_split();
    let first = timeout(config.timeout, read_frame(&mut read, config.max_frame_size))
        .await
        .map_err(|_| anyhow::anyhow!("No request within {:?}", config.timeout))??;

    let game_id = match RelayRequest::parse(&first)? {
        RelayRequest::Lookup { game_id } => {
            let reply = if registry.exists(&game_id).await {
                LOOKUP_FOUND
            } else {
                LOOKUP_MISSING
            };
            log::debug!("lookup {} -> {}", game_id, reply);
            return write_frame(&mut write, reply, config.max_frame_size).await;
        }
        RelayRequest::Connect { game_id } => game_id,
    };

    let (id, mut outbox) = registry.join(&game_id).await;
    log::info!("connection {} joined match {}", id, game_id);
    if let Err(e) = write_frame(&mut write, RELAY_OK, config.max_frame_size).await {
        registry.leave(&game_id, id).await;
        return Err(e);
    }

    let max = config.max_frame_size;
    let writer = tokio::spawn(async move {
        while let Some(frame) = outbox.recv().await {
            if write_frame(&mut write, &frame, max).await.is_err() {
                break;
            }
        }
    });

    let result = loop {
        match read_frame(&mut read, max).await {
            Ok(frame) => {
                registry.broadcast(&game_id, &frame).await;
            }
            Err(e) => break e,
        }
    };

    registry.leave(&game_id, id).await;
    writer.abort();
    registry.broadcast(&game_id, RELAY_PEER_LEFT).await;
    log::info!("connection {} left match {}", id, game_id);
    Err(result)
}

/// Ask the relay at `addr` whether match `game_id` currently exists.
pub async fn lookup_match<A: ToSocketAddrs>(
    addr: A,
    game_id: &str,
    config: NetConfig,
) -> anyhow::Result<bool> {
    let mut stream = timeout(config.timeout, TcpStream::connect(addr))
        .await
        .map_err(|_| anyhow::anyhow!("Connect timeout after {:?}", config.timeout))??;
    let request = RelayRequest::Lookup {
        game_id: game_id.to_string(),
    };
    write_frame(&mut stream, &request.to_string(), config.max_frame_size).await?;
    let reply = timeout(config.timeout, read_frame(&mut stream, config.max_frame_size))
        .await
        .map_err(|_| anyhow::anyhow!("Lookup timeout after {:?}", config.timeout))??;
    match reply.as_str() {
        LOOKUP_FOUND => Ok(true),
        LOOKUP_MISSING => Ok(false),
        other => Err(anyhow::anyhow!("Unexpected lookup reply: {:?}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_parse_and_print_the_same_way() {
        let connect = RelayRequest::parse("CONNECT /ws/game/abc").unwrap();
        assert_eq!(connect, RelayRequest::Connect { game_id: "abc".into() });
        assert_eq!(connect.to_string(), "CONNECT /ws/game/abc");

        let lookup = RelayRequest::parse("LOOKUP /game/abc").unwrap();
        assert_eq!(lookup.game_id(), "abc");
        assert_eq!(lookup.to_string(), "LOOKUP /game/abc");
    }

    #[test]
    fn malformed_requests_are_rejected() {
        for line in ["", "CONNECT", "CONNECT /ws/game/", "CONNECT /game/x", "PING /ws/game/x"] {
            assert!(RelayRequest::parse(line).is_err(), "{:?}", line);
        }
    }

    #[tokio::test]
    async fn match_lives_while_it_has_connections() {
        let registry = MatchRegistry::new();
        let (a, _rx_a) = registry.join("g").await;
        let (b, _rx_b) = registry.join("g").await;
        assert!(registry.exists("g").await);
        registry.leave("g", a).await;
        assert_eq!(registry.connection_count("g").await, 1);
        registry.leave("g", b).await;
        assert!(!registry.exists("g").await);
        assert_eq!(registry.match_count().await, 0);
    }

    #[tokio::test]
    async fn broadcast_stays_inside_the_match() {
        let registry = MatchRegistry::new();
        let (_, mut rx_a) = registry.join("g1").await;
        let (_, mut rx_b) = registry.join("g1").await;
        let (_, mut rx_other) = registry.join("g2").await;
        assert_eq!(registry.broadcast("g1", "hello").await, 2);
        assert_eq!(rx_a.recv().await.unwrap(), "hello");
        assert_eq!(rx_b.recv().await.unwrap(), "hello");
        assert!(rx_other.try_recv().is_err());
    }
}
