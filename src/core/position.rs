//! Board coordinates and their fixed-width wire encoding.

use alloc::format;
use alloc::string::String;
use core::fmt;
use core::str::FromStr;

use super::common::BoardError;
use super::config::{COORD_WIDTH, MAX_COORD, MIN_COORD};
use super::ship::Direction;

/// A playable cell. `x` is the column, `y` the row, both in
/// `MIN_COORD..=MAX_COORD`.
///
/// Ordering is row-major so positions can be kept in ordered sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "std",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct Position {
    x: u8,
    y: u8,
}

impl Position {
    /// Build a position, rejecting coordinates outside the interior.
    pub fn new(x: u8, y: u8) -> Result<Self, BoardError> {
        if in_range(x) && in_range(y) {
            Ok(Self { x, y })
        } else {
            Err(BoardError::MalformedPosition)
        }
    }

    /// Caller guarantees both coordinates are in the interior range.
    pub(crate) fn from_interior(x: u8, y: u8) -> Self {
        debug_assert!(in_range(x) && in_range(y));
        Self { x, y }
    }

    pub fn x(&self) -> u8 {
        self.x
    }

    pub fn y(&self) -> u8 {
        self.y
    }

    /// Concatenate both coordinates, each padded to `COORD_WIDTH` digits.
    pub fn encode(&self) -> String {
        format!("{:0w$}{:0w$}", self.x, self.y, w = COORD_WIDTH)
    }

    /// Inverse of [`Position::encode`]. Only the exact width is accepted.
    pub fn decode(encoded: &str) -> Result<Self, BoardError> {
        if encoded.len() != 2 * COORD_WIDTH {
            return Err(BoardError::MalformedPosition);
        }
        if !encoded.bytes().all(|b| b.is_ascii_digit()) {
            return Err(BoardError::MalformedPosition);
        }
        let (xs, ys) = encoded.split_at(encoded.len() / 2);
        let x = xs.parse::<u8>().map_err(|_| BoardError::MalformedPosition)?;
        let y = ys.parse::<u8>().map_err(|_| BoardError::MalformedPosition)?;
        Self::new(x, y)
    }

    /// Cell `offset` steps away along `direction`, if still on the board.
    pub(crate) fn step(&self, direction: Direction, offset: u8) -> Option<Self> {
        let (x, y) = match direction {
            Direction::Horizontal => (self.x.checked_add(offset)?, self.y),
            Direction::Vertical => (self.x, self.y.checked_add(offset)?),
        };
        Self::new(x, y).ok()
    }

    /// Every playable cell, row by row.
    pub fn all() -> impl Iterator<Item = Position> {
        (MIN_COORD..=MAX_COORD)
            .flat_map(|y| (MIN_COORD..=MAX_COORD).map(move |x| Position { x, y }))
    }
}

fn in_range(v: u8) -> bool {
    (MIN_COORD..=MAX_COORD).contains(&v)
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0w$}{:0w$}", self.x, self.y, w = COORD_WIDTH)
    }
}

impl FromStr for Position {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

impl TryFrom<String> for Position {
    type Error = BoardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::decode(&value)
    }
}

impl From<Position> for String {
    fn from(pos: Position) -> Self {
        pos.encode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::INTERIOR_CELLS;

    #[test]
    fn encodes_column_then_row() {
        let pos = Position::new(3, 5).unwrap();
        assert_eq!(pos.encode(), "35");
        assert_eq!(Position::decode("35").unwrap(), pos);
    }

    #[test]
    fn rejects_wrong_width_and_out_of_range() {
        assert_eq!(Position::decode("123"), Err(BoardError::MalformedPosition));
        assert_eq!(Position::decode(""), Err(BoardError::MalformedPosition));
        assert_eq!(Position::decode("08"), Err(BoardError::MalformedPosition));
        assert_eq!(Position::decode("80"), Err(BoardError::MalformedPosition));
        assert_eq!(Position::decode("a1"), Err(BoardError::MalformedPosition));
        assert_eq!(Position::decode("+1"), Err(BoardError::MalformedPosition));
        assert_eq!(Position::decode("0107"), Err(BoardError::MalformedPosition));
        assert_eq!(Position::decode("1717"), Err(BoardError::MalformedPosition));
    }

    #[test]
    fn interior_has_49_cells() {
        assert_eq!(INTERIOR_CELLS, 49);
        assert_eq!(Position::all().count(), INTERIOR_CELLS);
    }
}
