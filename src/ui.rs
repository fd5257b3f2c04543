#![cfg(feature = "std")]

//! Terminal rendering of boards and session state. Rows are labelled with
//! letters starting at `A`, columns with numbers starting at `1`.

use std::string::String;

use crate::core::{AttackReport, Fleet, Mark, Position, Side, TargetBoard, MAX_COORD, MIN_COORD};
use crate::session::{MatchOutcome, Phase, SessionView};

/// Human label of a cell, row letter then column number (`C4`).
pub fn cell_label(pos: Position) -> String {
    let row = (b'A' + pos.y() - MIN_COORD) as char;
    std::format!("{}{}", row, pos.x())
}

/// Parse a human label such as `c4` or `C4`.
pub fn parse_cell(input: &str) -> Result<Position, String> {
    let input = input.trim();
    if input.len() < 2 {
        return Err("Too short - need row letter and column number (e.g., C4)".to_string());
    }
    let mut chars = input.chars();
    let row_ch = chars.next().ok_or("No row letter")?.to_ascii_uppercase();
    let last_row = (b'A' + MAX_COORD - MIN_COORD) as char;
    if !('A'..=last_row).contains(&row_ch) {
        return Err(format!("Invalid row '{}' - must be a letter A-{}", row_ch, last_row));
    }
    let col_str: String = chars.collect();
    let col: u8 = col_str
        .parse()
        .map_err(|_| format!("Invalid column '{}' - must be a number 1-{}", col_str, MAX_COORD))?;
    let y = row_ch as u8 - b'A' + MIN_COORD;
    Position::new(col, y)
        .map_err(|_| format!("Column {} out of bounds - must be 1-{}", col, MAX_COORD))
}

fn print_header() {
    std::print!("     ");
    for x in MIN_COORD..=MAX_COORD {
        std::print!(" {}", x);
    }
    std::println!();
}

fn row_letter(y: u8) -> char {
    (b'A' + y - MIN_COORD) as char
}

/// Own fleet with ships and the hits they have taken.
pub fn print_fleet(fleet: &Fleet, incoming: &[AttackReport]) {
    print_header();
    for y in MIN_COORD..=MAX_COORD {
        std::print!("   {} ", row_letter(y));
        for x in MIN_COORD..=MAX_COORD {
            let pos = Position::from_interior(x, y);
            let shot = incoming
                .iter()
                .any(|r| r.attacker == Side::Opponent && r.outcome.position == pos);
            let ch = match (fleet.ship_at(pos).is_some(), shot) {
                (true, true) => 'X',
                (true, false) => 'S',
                (false, true) => 'o',
                (false, false) => '.',
            };
            std::print!(" {}", ch);
        }
        std::println!();
    }
    std::println!("    Legend: S=Ship  X=Hit  o=Miss  .=Water");
}

/// What is known about the opponent board.
pub fn print_target(board: &TargetBoard) {
    print_header();
    for y in MIN_COORD..=MAX_COORD {
        std::print!("   {} ", row_letter(y));
        for x in MIN_COORD..=MAX_COORD {
            let pos = Position::from_interior(x, y);
            let ch = match board.mark(pos) {
                Some(Mark::Hit) => 'X',
                Some(Mark::Miss) => 'o',
                None => '.',
            };
            std::print!(" {}", ch);
        }
        std::println!();
    }
    std::println!("    Legend: X=Hit  o=Miss  .=Unknown");
}

pub fn describe_report(report: &AttackReport) -> String {
    let at = cell_label(report.outcome.position);
    let who = match report.attacker {
        Side::Local => "You",
        Side::Opponent => "Enemy",
    };
    match (report.outcome.hit, report.outcome.sunk) {
        (true, Some(name)) => format!("{} fired at {}: hit, {} sunk", who, at, name),
        (true, None) => format!("{} fired at {}: hit", who, at),
        (false, _) => format!("{} fired at {}: miss", who, at),
    }
}

pub fn describe_view(view: &SessionView) -> String {
    match view.phase {
        Phase::AwaitingMode => "Choose a mode".to_string(),
        Phase::Placement => match view.next_ship {
            Some(def) => format!(
                "Place your {} (length {}), direction {:?}",
                def.name(),
                def.length(),
                view.direction
            ),
            None => "Placement complete".to_string(),
        },
        Phase::AwaitingPeer => "Waiting for the opponent".to_string(),
        Phase::Battle if view.local_turn => "Your turn".to_string(),
        Phase::Battle => "Opponent's turn".to_string(),
        Phase::Finished(outcome) => match outcome {
            MatchOutcome::Victory => "VICTORY! You have sunk all enemy ships!".to_string(),
            MatchOutcome::Defeat => "DEFEAT. All your ships have been destroyed.".to_string(),
            MatchOutcome::OpponentLeft => "The opponent left the match.".to_string(),
            MatchOutcome::Abandoned => "You left the match.".to_string(),
        },
    }
}
