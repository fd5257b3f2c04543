// Uniform random placement and shot selection for the computer opponent.
// No hunting strategy: every untried cell is equally likely.

use alloc::collections::BTreeSet;
use alloc::vec::Vec;

use super::common::BoardError;
use super::config::{INTERIOR_CELLS, MAX_COORD, MAX_PLACEMENT_ATTEMPTS, MIN_COORD};
use super::fleet::Fleet;
use super::placement::place_next;
use super::position::Position;
use super::ship::Direction;
use rand::Rng;

/// Random interior cell.
pub fn random_position<R: Rng + ?Sized>(rng: &mut R) -> Position {
    let x = rng.random_range(MIN_COORD..=MAX_COORD);
    let y = rng.random_range(MIN_COORD..=MAX_COORD);
    Position::from_interior(x, y)
}

pub fn random_direction<R: Rng + ?Sized>(rng: &mut R) -> Direction {
    if rng.random() {
        Direction::Horizontal
    } else {
        Direction::Vertical
    }
}

/// Place every remaining ship of `fleet` at random legal spots.
pub fn place_fleet_randomly<R: Rng + ?Sized>(
    fleet: &mut Fleet,
    rng: &mut R,
) -> Result<(), BoardError> {
    let mut attempts = 0;
    while !fleet.is_fully_placed() {
        if attempts >= MAX_PLACEMENT_ATTEMPTS {
            return Err(BoardError::UnableToPlaceShip);
        }
        attempts += 1;
        let start = random_position(rng);
        let direction = random_direction(rng);
        match place_next(fleet, start, direction) {
            Ok(_) | Err(BoardError::ShipOutOfBounds) | Err(BoardError::ShipOverlaps) => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

/// Shot selection without replacement: every sampled cell is recorded and
/// never offered again.
#[derive(Debug, Clone, Default)]
pub struct ShotSampler {
    attempted: BTreeSet<Position>,
}

impl ShotSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a cell as used without sampling it.
    pub fn exclude(&mut self, pos: Position) {
        self.attempted.insert(pos);
    }

    pub fn attempted(&self) -> usize {
        self.attempted.len()
    }

    /// Draw an untried cell, or `None` once the whole board has been tried.
    pub fn next<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Position> {
        if self.attempted.len() >= INTERIOR_CELLS {
            return None;
        }
        let remaining: Vec<Position> = Position::all()
            .filter(|p| !self.attempted.contains(p))
            .collect();
        if remaining.is_empty() {
            return None;
        }
        let pick = remaining[rng.random_range(0..remaining.len())];
        self.attempted.insert(pick);
        Some(pick)
    }
}
