//! A player's ordered set of ships.

use alloc::vec::Vec;

use super::config::SHIPS;
use super::position::Position;
use super::ship::{Ship, ShipDef};

/// Ships in declared placement order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fleet {
    ships: Vec<Ship>,
}

impl Fleet {
    /// The standard five-ship fleet, nothing placed.
    pub fn new() -> Self {
        Self::with_defs(&SHIPS)
    }

    /// A fleet built from arbitrary definitions, in the given order.
    pub fn with_defs(defs: &[ShipDef]) -> Self {
        Self {
            ships: defs.iter().copied().map(Ship::new).collect(),
        }
    }

    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    /// First ship without positions.
    pub fn next_to_place(&self) -> Option<&Ship> {
        self.ships.iter().find(|s| !s.is_placed())
    }

    pub(crate) fn next_to_place_mut(&mut self) -> Option<&mut Ship> {
        self.ships.iter_mut().find(|s| !s.is_placed())
    }

    pub fn is_fully_placed(&self) -> bool {
        self.ships.iter().all(Ship::is_placed)
    }

    /// Returns `true` when all ships are sunk.
    pub fn is_defeated(&self) -> bool {
        !self.ships.is_empty() && self.ships.iter().all(Ship::is_sunk)
    }

    /// Every occupied cell across all placed ships.
    pub fn occupied_positions(&self) -> Vec<Position> {
        self.ships
            .iter()
            .flat_map(|s| s.positions().iter().copied())
            .collect()
    }

    pub fn ship_at(&self, pos: Position) -> Option<&Ship> {
        self.ships.iter().find(|s| s.occupies(pos))
    }

    pub(crate) fn ship_at_mut(&mut self, pos: Position) -> Option<&mut Ship> {
        self.ships.iter_mut().find(|s| s.occupies(pos))
    }
}

impl Default for Fleet {
    fn default() -> Self {
        Self::new()
    }
}
