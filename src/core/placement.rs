//! Legality checks for sequential ship placement.

use alloc::vec::Vec;

use super::common::BoardError;
use super::config::MAX_COORD;
use super::fleet::Fleet;
use super::position::Position;
use super::ship::{Direction, ShipDef};

/// Cells a ship of `length` would cover starting at `start`.
pub fn candidate_run(
    start: Position,
    direction: Direction,
    length: usize,
) -> Result<Vec<Position>, BoardError> {
    let origin = match direction {
        Direction::Horizontal => start.x(),
        Direction::Vertical => start.y(),
    } as usize;
    if length == 0 || origin + length - 1 > MAX_COORD as usize {
        return Err(BoardError::ShipOutOfBounds);
    }
    (0..length)
        .map(|i| {
            start
                .step(direction, i as u8)
                .ok_or(BoardError::ShipOutOfBounds)
        })
        .collect()
}

/// Place the fleet's next ship at `start`. The whole run is assigned at once
/// or the fleet is left untouched.
pub fn place_next(
    fleet: &mut Fleet,
    start: Position,
    direction: Direction,
) -> Result<ShipDef, BoardError> {
    let def = fleet
        .next_to_place()
        .map(|s| s.def())
        .ok_or(BoardError::FleetComplete)?;
    let run = candidate_run(start, direction, def.length())?;
    let occupied = fleet.occupied_positions();
    if run.iter().any(|p| occupied.contains(p)) {
        return Err(BoardError::ShipOverlaps);
    }
    fleet
        .next_to_place_mut()
        .ok_or(BoardError::FleetComplete)?
        .assign(run);
    Ok(def)
}

/// Whether `place_next` would accept this placement.
pub fn can_place(fleet: &Fleet, start: Position, direction: Direction) -> bool {
    let mut trial = fleet.clone();
    place_next(&mut trial, start, direction).is_ok()
}
