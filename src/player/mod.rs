//! Players, opponents and local controllers
//!
//! - [`Player`]: identity, fleet and turn flag of one side.
//! - [`Opponent`]: capability the session uses to fight the other side,
//!   implemented by [`AiOpponent`] (resolves locally and synchronously) and
//!   [`RemotePeer`] (resolves through protocol messages).
//! - [`Controller`]: source of local intents, either [`AutoController`] or,
//!   with `std`, the interactive [`CliController`].

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use rand::rngs::SmallRng;
use rand::Rng;

use crate::core::{AttackOutcome, AttackReport, BoardError, Direction, Fleet, Position, TargetBoard};

/// One side of a match: identity, fleet and whether it may fire.
#[derive(Debug, Clone)]
pub struct Player {
    identity: String,
    fleet: Fleet,
    has_turn: bool,
}

impl Player {
    pub fn new(identity: String) -> Self {
        Self {
            identity,
            fleet: Fleet::new(),
            has_turn: false,
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    pub fn fleet_mut(&mut self) -> &mut Fleet {
        &mut self.fleet
    }

    pub fn has_turn(&self) -> bool {
        self.has_turn
    }

    pub fn set_turn(&mut self, has_turn: bool) {
        self.has_turn = has_turn;
    }
}

/// Opaque per-connection player name.
pub fn generate_identity<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("player-{:08x}", rng.random::<u32>())
}

/// How an opponent answered a shot from the local side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strike {
    /// Resolved on the spot against a fleet held in this process.
    Resolved(AttackOutcome),
    /// Forwarded to the remote side; the outcome arrives later.
    Dispatched,
}

/// What the session needs from the other side of a match.
pub trait Opponent: Send {
    /// Identity of the opponent, once known.
    fn identity(&self) -> Option<&str>;

    /// Readiness and battle start are signalled by remote messages rather
    /// than known locally.
    fn awaits_start_signal(&self) -> bool;

    /// Lay out the opponent's fleet when it is held locally.
    fn prepare(&mut self, rng: &mut SmallRng) -> Result<(), BoardError>;

    /// Whether the opponent's fleet is placed.
    fn is_ready(&self) -> bool;

    /// Take a shot from the local side.
    fn receive_attack(&mut self, target: Position) -> Strike;

    fn has_turn(&self) -> bool;

    fn set_turn(&mut self, has_turn: bool);

    /// Fire at `defender` for as long as the opponent holds the turn.
    /// Opponents whose shots arrive as messages return nothing.
    fn take_turn(&mut self, rng: &mut SmallRng, defender: &mut Fleet) -> Vec<AttackOutcome>;

    /// The opponent announced itself.
    fn peer_joined(&mut self, _identity: &str) {}

    /// The opponent finished placing its fleet.
    fn peer_ready(&mut self) {}
}

/// Source of local intents: where to place ships and where to fire.
pub trait Controller: Send {
    /// Start cell and direction for the fleet's next ship. `None` abandons.
    fn choose_placement(
        &mut self,
        rng: &mut SmallRng,
        fleet: &Fleet,
        direction: Direction,
    ) -> Option<(Position, Direction)>;

    /// Next cell to fire at. `None` abandons.
    fn select_target(&mut self, rng: &mut SmallRng, board: &TargetBoard) -> Option<Position>;

    /// An intent was rejected by the rules.
    fn handle_rejection(&mut self, _reason: &str) {}

    /// An attack by either side was resolved.
    fn handle_report(&mut self, _report: &AttackReport) {}
}

pub mod ai;
pub use ai::AiOpponent;

pub mod remote;
pub use remote::RemotePeer;

pub mod auto;
pub use auto::AutoController;

#[cfg(feature = "std")]
pub mod cli;
#[cfg(feature = "std")]
pub use cli::CliController;
