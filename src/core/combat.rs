//! Attack resolution and the hit-streak turn rule.

use super::fleet::Fleet;
use super::position::Position;

/// One of the two sides of a match, seen from the local process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Local,
    Opponent,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Side::Local => Side::Opponent,
            Side::Opponent => Side::Local,
        }
    }
}

/// Result of one shot against a fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackOutcome {
    pub position: Position,
    pub hit: bool,
    /// Name of the ship this shot sank, if it sank one.
    pub sunk: Option<&'static str>,
    /// Whether every ship of the defending fleet is now sunk.
    pub fleet_defeated: bool,
}

/// A resolved attack together with the side that fired it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackReport {
    pub attacker: Side,
    pub outcome: AttackOutcome,
}

/// Resolve a shot at `position` against the defending `fleet`.
pub fn resolve_attack(fleet: &mut Fleet, position: Position) -> AttackOutcome {
    let mut outcome = AttackOutcome {
        position,
        hit: false,
        sunk: None,
        fleet_defeated: false,
    };
    if let Some(ship) = fleet.ship_at_mut(position) {
        let was_sunk = ship.is_sunk();
        outcome.hit = ship.register_hit(position);
        if !was_sunk && ship.is_sunk() {
            outcome.sunk = Some(ship.name());
        }
    }
    outcome.fleet_defeated = fleet.is_defeated();
    outcome
}

/// Who holds the turn after `attacker` fires: a hit keeps it, a miss passes it.
pub fn turn_after(attacker: Side, hit: bool) -> Side {
    if hit {
        attacker
    } else {
        attacker.other()
    }
}
