#![allow(dead_code)]

use broadside::{Direction, MatchSession, Message, Position};

/// Ships stacked on rows 1..=5, all starting in column 1.
pub fn stacked_layout() -> Vec<(Position, Direction)> {
    (1..=5)
        .map(|y| (Position::new(1, y).unwrap(), Direction::Horizontal))
        .collect()
}

/// Every cell covered by [`stacked_layout`], carrier first.
pub fn stacked_cells() -> Vec<Position> {
    [5u8, 4, 3, 3, 2]
        .iter()
        .zip(1u8..)
        .flat_map(|(&len, y)| (1..=len).map(move |x| Position::new(x, y).unwrap()))
        .collect()
}

pub fn place_stacked(session: &mut MatchSession) -> Vec<Message> {
    let mut outbound = Vec::new();
    for (start, direction) in stacked_layout() {
        session.set_direction(direction);
        outbound.extend(session.place_ship(start).unwrap());
    }
    outbound
}

pub fn pos(x: u8, y: u8) -> Position {
    Position::new(x, y).unwrap()
}

pub fn place_stacked_fleet() -> broadside::Fleet {
    let mut fleet = broadside::Fleet::new();
    for (start, direction) in stacked_layout() {
        broadside::place_next(&mut fleet, start, direction).unwrap();
    }
    fleet
}
