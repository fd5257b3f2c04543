use alloc::vec::Vec;
use rand::rngs::SmallRng;
use rand::Rng;

use crate::core::{can_place, Direction, Fleet, Position, TargetBoard};

use super::Controller;

/// Controller that plays on its own: random legal placements and random
/// shots at cells not yet resolved.
#[derive(Debug, Default)]
pub struct AutoController;

impl AutoController {
    pub fn new() -> Self {
        Self
    }
}

impl Controller for AutoController {
    fn choose_placement(
        &mut self,
        rng: &mut SmallRng,
        fleet: &Fleet,
        _direction: Direction,
    ) -> Option<(Position, Direction)> {
        let legal: Vec<(Position, Direction)> = Position::all()
            .flat_map(|p| [(p, Direction::Horizontal), (p, Direction::Vertical)])
            .filter(|(p, d)| can_place(fleet, *p, *d))
            .collect();
        if legal.is_empty() {
            return None;
        }
        Some(legal[rng.random_range(0..legal.len())])
    }

    fn select_target(&mut self, rng: &mut SmallRng, board: &TargetBoard) -> Option<Position> {
        let open: Vec<Position> = Position::all().filter(|p| !board.is_resolved(*p)).collect();
        if open.is_empty() {
            return None;
        }
        Some(open[rng.random_range(0..open.len())])
    }
}
