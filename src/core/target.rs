//! The attacker's record of its shots against the opponent board.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use super::config::TOTAL_SHIP_CELLS;
use super::position::Position;

/// Resolution of a cell on the opponent board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Hit,
    Miss,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetBoard {
    marks: BTreeMap<Position, Mark>,
    sunk: Vec<&'static str>,
}

impl TargetBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&self, pos: Position) -> Option<Mark> {
        self.marks.get(&pos).copied()
    }

    pub fn is_resolved(&self, pos: Position) -> bool {
        self.marks.contains_key(&pos)
    }

    /// Record the resolution of a shot. Returns `false` if the cell was
    /// already resolved, in which case nothing changes.
    pub fn record(&mut self, pos: Position, hit: bool, sunk: Option<&'static str>) -> bool {
        if self.is_resolved(pos) {
            return false;
        }
        self.marks.insert(pos, if hit { Mark::Hit } else { Mark::Miss });
        if let Some(name) = sunk {
            self.sunk.push(name);
        }
        true
    }

    pub fn hits(&self) -> usize {
        self.marks.values().filter(|m| **m == Mark::Hit).count()
    }

    pub fn misses(&self) -> usize {
        self.marks.values().filter(|m| **m == Mark::Miss).count()
    }

    pub fn shots(&self) -> usize {
        self.marks.len()
    }

    /// Names of opponent ships reported sunk, in order.
    pub fn sunk(&self) -> &[&'static str] {
        &self.sunk
    }

    /// Every segment of a standard fleet has been hit.
    pub fn all_ship_cells_hit(&self) -> bool {
        self.hits() >= TOTAL_SHIP_CELLS
    }
}
