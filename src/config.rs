#![cfg(feature = "std")]

use tokio::time::Duration;

/// Default timeout for network operations (30 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum frame size (64 KiB); protocol messages are a few hundred bytes.
pub const MAX_FRAME_SIZE: u32 = 64 * 1024;

/// Delay before the single retry of a send attempted on an unready channel.
pub const SEND_RETRY_DELAY: Duration = Duration::from_millis(200);

/// Runtime network settings shared by the relay and its clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetConfig {
    pub timeout: Duration,
    pub max_frame_size: u32,
    pub send_retry_delay: Duration,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_frame_size: MAX_FRAME_SIZE,
            send_retry_delay: SEND_RETRY_DELAY,
        }
    }
}
