use tokio::time::{sleep, Duration};

use crate::protocol::Message;

#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn send(&mut self, msg: Message) -> anyhow::Result<()>;
    async fn recv(&mut self) -> anyhow::Result<Message>;

    /// Whether the channel can take a message right now.
    fn is_ready(&self) -> bool {
        true
    }

    /// Stop using the channel. Later sends and receives fail.
    fn shutdown(&self) {}
}

/// Receive error: the relay reported that another connection of the match
/// has gone away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeerGone;

impl core::fmt::Display for PeerGone {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Peer left the match")
    }
}

impl std::error::Error for PeerGone {}

/// Send `msg`, waiting `retry_delay` once if the channel is not ready yet.
/// A channel still not ready after the delay is an error; nothing is queued.
pub async fn send_deferred<T: Transport + ?Sized>(
    transport: &mut T,
    msg: Message,
    retry_delay: Duration,
) -> anyhow::Result<()> {
    if !transport.is_ready() {
        log::debug!("channel not ready, retrying {:?} in {:?}", msg.status, retry_delay);
        sleep(retry_delay).await;
        if !transport.is_ready() {
            return Err(anyhow::anyhow!(
                "Channel not ready after {:?}, dropping {:?}",
                retry_delay,
                msg.status
            ));
        }
    }
    transport.send(msg).await
}

pub mod frame;
pub mod in_memory;
pub mod tcp;
