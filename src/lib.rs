#![cfg_attr(not(feature = "std"), no_std)]

//! Two-player naval combat: placement and combat rules, an AI opponent,
//! a match session state machine and peer sync through a relay.

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod core;
pub mod player;

#[cfg(feature = "std")]
pub mod config;
#[cfg(feature = "std")]
mod logging;
#[cfg(feature = "std")]
pub mod node;
#[cfg(feature = "std")]
pub mod protocol;
#[cfg(feature = "std")]
pub mod relay;
#[cfg(feature = "std")]
pub mod session;
#[cfg(feature = "std")]
pub mod sync;
#[cfg(feature = "std")]
pub mod transport;
#[cfg(feature = "std")]
pub mod ui;

pub use crate::core::*;
pub use player::*;

#[cfg(feature = "std")]
pub use config::NetConfig;
#[cfg(feature = "std")]
pub use logging::{init_logging, LOG_ENV};
#[cfg(feature = "std")]
pub use node::{run_versus_ai, PeerNode};
#[cfg(feature = "std")]
pub use protocol::{Message, Status};
#[cfg(feature = "std")]
pub use relay::{lookup_match, serve, MatchRegistry};
#[cfg(feature = "std")]
pub use session::{MatchOutcome, MatchSession, Mode, Phase, SessionError, SessionView};
#[cfg(feature = "std")]
pub use sync::{screen, Screen, TurnLedger};
#[cfg(feature = "std")]
pub use transport::in_memory::InMemoryTransport;
#[cfg(feature = "std")]
pub use transport::tcp::TcpTransport;
#[cfg(feature = "std")]
pub use transport::{send_deferred, PeerGone, Transport};
