//! Ship definitions and per-ship placement and hit tracking.

use alloc::vec::Vec;
use core::fmt;

use super::position::Position;

/// Direction a ship run extends from its starting cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Increasing `x`.
    #[default]
    Horizontal,
    /// Increasing `y`.
    Vertical,
}

impl Direction {
    /// The other direction.
    pub fn flipped(self) -> Self {
        match self {
            Direction::Horizontal => Direction::Vertical,
            Direction::Vertical => Direction::Horizontal,
        }
    }
}

/// Type of ship: name and length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShipDef {
    name: &'static str,
    length: usize,
}

impl ShipDef {
    /// Create a new ship definition.
    pub const fn new(name: &'static str, length: usize) -> Self {
        Self { name, length }
    }

    /// Ship's name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Ship's length.
    pub fn length(&self) -> usize {
        self.length
    }
}

/// A ship of a fleet. Positions are empty until the ship is placed and are
/// assigned exactly once; hits only ever grow.
#[derive(Clone, PartialEq, Eq)]
pub struct Ship {
    def: ShipDef,
    positions: Vec<Position>,
    hits: Vec<Position>,
}

impl Ship {
    pub fn new(def: ShipDef) -> Self {
        Self {
            def,
            positions: Vec::new(),
            hits: Vec::new(),
        }
    }

    pub fn def(&self) -> ShipDef {
        self.def
    }

    pub fn name(&self) -> &'static str {
        self.def.name()
    }

    pub fn length(&self) -> usize {
        self.def.length()
    }

    /// Occupied cells in run order, empty while unplaced.
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Cells of this ship that have been hit.
    pub fn hits(&self) -> &[Position] {
        &self.hits
    }

    pub fn is_placed(&self) -> bool {
        !self.positions.is_empty()
    }

    pub fn occupies(&self, pos: Position) -> bool {
        self.positions.contains(&pos)
    }

    /// Check if the ship is sunk (all segments hit).
    pub fn is_sunk(&self) -> bool {
        self.is_placed() && self.hits.len() == self.def.length()
    }

    /// Record a hit at `pos`. Returns `true` if the ship occupies `pos`;
    /// repeated hits on the same cell are reported but not recorded twice.
    pub fn register_hit(&mut self, pos: Position) -> bool {
        if !self.occupies(pos) {
            return false;
        }
        if !self.hits.contains(&pos) {
            self.hits.push(pos);
        }
        true
    }

    pub(crate) fn assign(&mut self, run: Vec<Position>) {
        debug_assert!(!self.is_placed());
        debug_assert_eq!(run.len(), self.def.length());
        self.positions = run;
    }
}

impl fmt::Debug for Ship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ship {{ name: \"{}\", positions: {:?}, hits: {} }}",
            self.def.name(),
            self.positions,
            self.hits.len(),
        )
    }
}
