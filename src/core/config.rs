use super::ship::ShipDef;

/// Side length of the rendered grid. Row and column 0 carry the axis labels,
/// so the playable interior is `1..BOARD_SIZE` on both axes.
pub const BOARD_SIZE: u8 = 8;
/// Smallest playable coordinate.
pub const MIN_COORD: u8 = 1;
/// Largest playable coordinate.
pub const MAX_COORD: u8 = BOARD_SIZE - 1;
/// Digits used per coordinate in the wire encoding of a position.
pub const COORD_WIDTH: usize = 1;
/// Number of playable cells.
pub const INTERIOR_CELLS: usize = (MAX_COORD as usize) * (MAX_COORD as usize);

pub const NUM_SHIPS: usize = 5;
pub const SHIPS: [ShipDef; NUM_SHIPS] = [
    ShipDef::new("carrier", 5),
    ShipDef::new("battleship", 4),
    ShipDef::new("cruiser", 3),
    ShipDef::new("submarine", 3),
    ShipDef::new("destroyer", 2),
];

/// Total number of ship segments used in the standard configuration.
pub const TOTAL_SHIP_CELLS: usize = 5 + 4 + 3 + 3 + 2;

/// Upper bound on random placement attempts for a single fleet.
pub const MAX_PLACEMENT_ATTEMPTS: usize = 10_000;

/// Convert a ship name string to the canonical static name used in the
/// configuration. Returns `None` if the name does not match any defined ship.
pub fn ship_name_static(name: &str) -> Option<&'static str> {
    SHIPS.iter().map(|def| def.name()).find(|n| *n == name)
}
