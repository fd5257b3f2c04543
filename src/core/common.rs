//! Common error type for the board-level rules.

/// Errors returned by position, placement and fleet operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    /// Encoded position has the wrong shape or names a cell outside the
    /// playable interior.
    MalformedPosition,
    /// Ship run would leave the playable interior.
    ShipOutOfBounds,
    /// Ship run intersects a ship that is already placed.
    ShipOverlaps,
    /// Every ship of the fleet is already placed.
    FleetComplete,
    /// Random placement gave up after exhausting its attempt budget.
    UnableToPlaceShip,
}

impl core::fmt::Display for BoardError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BoardError::MalformedPosition => write!(f, "Malformed position"),
            BoardError::ShipOutOfBounds => write!(f, "Ship placement is out of bounds"),
            BoardError::ShipOverlaps => write!(f, "Ship placement overlaps with another ship"),
            BoardError::FleetComplete => write!(f, "All ships are already placed"),
            BoardError::UnableToPlaceShip => write!(f, "Unable to place ship"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BoardError {}
