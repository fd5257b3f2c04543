use alloc::string::String;
use alloc::vec::Vec;
use rand::rngs::SmallRng;

use crate::core::{
    place_fleet_randomly, resolve_attack, turn_after, AttackOutcome, BoardError, Fleet, Position,
    ShotSampler, Side,
};

use super::{Opponent, Player, Strike};

/// Computer opponent with uniformly random placement and shots.
pub struct AiOpponent {
    player: Player,
    sampler: ShotSampler,
}

impl AiOpponent {
    pub fn new(identity: String) -> Self {
        Self {
            player: Player::new(identity),
            sampler: ShotSampler::new(),
        }
    }

    pub fn fleet(&self) -> &Fleet {
        self.player.fleet()
    }

    /// Cells this opponent has already fired at.
    pub fn shots_fired(&self) -> usize {
        self.sampler.attempted()
    }
}

impl Opponent for AiOpponent {
    fn identity(&self) -> Option<&str> {
        Some(self.player.identity())
    }

    fn awaits_start_signal(&self) -> bool {
        false
    }

    fn prepare(&mut self, rng: &mut SmallRng) -> Result<(), BoardError> {
        place_fleet_randomly(self.player.fleet_mut(), rng)
    }

    fn is_ready(&self) -> bool {
        self.player.fleet().is_fully_placed()
    }

    fn receive_attack(&mut self, target: Position) -> Strike {
        Strike::Resolved(resolve_attack(self.player.fleet_mut(), target))
    }

    fn has_turn(&self) -> bool {
        self.player.has_turn()
    }

    fn set_turn(&mut self, has_turn: bool) {
        self.player.set_turn(has_turn);
    }

    fn take_turn(&mut self, rng: &mut SmallRng, defender: &mut Fleet) -> Vec<AttackOutcome> {
        let mut shots = Vec::new();
        while self.player.has_turn() {
            let Some(target) = self.sampler.next(rng) else {
                break;
            };
            let outcome = resolve_attack(defender, target);
            shots.push(outcome);
            self.player
                .set_turn(turn_after(Side::Opponent, outcome.hit) == Side::Opponent);
            if outcome.fleet_defeated {
                break;
            }
        }
        shots
    }
}
