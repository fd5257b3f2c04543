//! Core match rules (no_std compatible)
//!
//! Positions, fleets, placement, combat and the random opponent policy. Only
//! `alloc` and `rand` are needed, so this module builds without `std`.

pub mod ai;
pub mod combat;
pub mod common;
pub mod config;
pub mod fleet;
pub mod placement;
pub mod position;
pub mod ship;
pub mod target;

// Re-export commonly used types
pub use ai::{place_fleet_randomly, random_direction, random_position, ShotSampler};
pub use combat::{resolve_attack, turn_after, AttackOutcome, AttackReport, Side};
pub use common::BoardError;
pub use config::*;
pub use fleet::Fleet;
pub use placement::{can_place, candidate_run, place_next};
pub use position::Position;
pub use ship::{Direction, Ship, ShipDef};
pub use target::{Mark, TargetBoard};
