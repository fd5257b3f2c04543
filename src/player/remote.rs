use alloc::string::{String, ToString};
use alloc::vec::Vec;
use rand::rngs::SmallRng;

use crate::core::{AttackOutcome, BoardError, Fleet, Position};

use super::{Opponent, Strike};

/// Opponent on another machine. Its fleet never leaves that machine, so all
/// this side knows is who it is, whether it is placed, and whose turn it is.
#[derive(Debug, Clone, Default)]
pub struct RemotePeer {
    identity: Option<String>,
    ready: bool,
    has_turn: bool,
}

impl RemotePeer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Opponent for RemotePeer {
    fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    fn awaits_start_signal(&self) -> bool {
        true
    }

    fn prepare(&mut self, _rng: &mut SmallRng) -> Result<(), BoardError> {
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    fn receive_attack(&mut self, _target: Position) -> Strike {
        Strike::Dispatched
    }

    fn has_turn(&self) -> bool {
        self.has_turn
    }

    fn set_turn(&mut self, has_turn: bool) {
        self.has_turn = has_turn;
    }

    fn take_turn(&mut self, _rng: &mut SmallRng, _defender: &mut Fleet) -> Vec<AttackOutcome> {
        Vec::new()
    }

    fn peer_joined(&mut self, identity: &str) {
        if self.identity.is_none() {
            self.identity = Some(identity.to_string());
        }
    }

    fn peer_ready(&mut self) {
        self.ready = true;
    }
}
