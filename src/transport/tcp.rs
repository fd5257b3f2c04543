use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::timeout;

use crate::config::NetConfig;
use crate::protocol::Message;
use crate::relay::{RelayRequest, RELAY_OK, RELAY_PEER_LEFT};
use crate::transport::frame::{read_frame, write_frame};
use crate::transport::{PeerGone, Transport};

/// Client connection to the relay, scoped to one match.
///
/// The connection becomes ready once the relay acknowledges the CONNECT
/// request; frames are read by a background task so the acknowledgement can
/// arrive while the caller is already trying to send.
pub struct TcpTransport {
    writer: OwnedWriteHalf,
    inbound: mpsc::UnboundedReceiver<anyhow::Result<String>>,
    ready: Arc<AtomicBool>,
    shutdown: Arc<AtomicBool>,
    config: NetConfig,
    reader: JoinHandle<()>,
}

impl TcpTransport {
    /// Open a connection to the relay at `addr` for match `game_id`.
    pub async fn connect<A: ToSocketAddrs>(
        addr: A,
        game_id: &str,
        config: NetConfig,
    ) -> anyhow::Result<Self> {
        let stream = timeout(config.timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| anyhow::anyhow!("Connect timeout after {:?}", config.timeout))??;
        let (read, mut writer) = stream.into_split();
        let request = RelayRequest::Connect {
            game_id: game_id.to_string(),
        };
        write_frame(&mut writer, &request.to_string(), config.max_frame_size).await?;

        let ready = Arc::new(AtomicBool::new(false));
        let (tx, inbound) = mpsc::unbounded_channel();
        let reader = tokio::spawn(read_loop(read, tx, ready.clone(), config.max_frame_size));
        Ok(Self {
            writer,
            inbound,
            ready,
            shutdown: Arc::new(AtomicBool::new(false)),
            config,
            reader,
        })
    }

    fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }
}

async fn read_loop(
    mut read: OwnedReadHalf,
    tx: mpsc::UnboundedSender<anyhow::Result<String>>,
    ready: Arc<AtomicBool>,
    max_frame_size: u32,
) {
    match read_frame(&mut read, max_frame_size).await {
        Ok(ack) if ack == RELAY_OK => ready.store(true, Ordering::SeqCst),
        Ok(other) => {
            let _ = tx.send(Err(anyhow::anyhow!("Relay refused connection: {}", other)));
            return;
        }
        Err(e) => {
            let _ = tx.send(Err(e));
            return;
        }
    }
    loop {
        let frame = read_frame(&mut read, max_frame_size).await;
        let failed = frame.is_err();
        if tx.send(frame).is_err() || failed {
            break;
        }
    }
    ready.store(false, Ordering::SeqCst);
}

impl Drop for TcpTransport {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

#[async_trait::async_trait]
impl Transport for TcpTransport {
    async fn send(&mut self, msg: Message) -> anyhow::Result<()> {
        if self.is_shutdown() {
            return Err(anyhow::anyhow!("Transport is shut down"));
        }
        if !self.ready.load(Ordering::SeqCst) {
            return Err(anyhow::anyhow!("Channel not ready"));
        }
        let text = msg.to_json()?;
        timeout(
            self.config.timeout,
            write_frame(&mut self.writer, &text, self.config.max_frame_size),
        )
        .await
        .map_err(|_| anyhow::anyhow!("Send timeout after {:?}", self.config.timeout))?
    }

    async fn recv(&mut self) -> anyhow::Result<Message> {
        loop {
            if self.is_shutdown() {
                return Err(anyhow::anyhow!("Transport is shut down"));
            }
            let text = match self.inbound.recv().await {
                Some(frame) => frame?,
                None => return Err(anyhow::anyhow!("Connection closed by peer")),
            };
            if text == RELAY_PEER_LEFT {
                return Err(PeerGone.into());
            }
            match Message::from_json(&text) {
                Ok(msg) => return Ok(msg),
                Err(e) => log::warn!("dropping malformed frame: {}", e),
            }
        }
    }

    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst) && !self.is_shutdown()
    }

    fn shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
        self.reader.abort();
    }
}
