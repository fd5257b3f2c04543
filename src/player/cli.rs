#![cfg(feature = "std")]

use std::io::{self, BufRead, Write};
use std::string::String;

use rand::rngs::SmallRng;

use crate::core::{AttackReport, Direction, Fleet, Position, TargetBoard};
use crate::ui::{cell_label, describe_report, parse_cell, print_fleet, print_target};

use super::{AutoController, Controller};

const PLACEMENT_PROMPT: &str =
    "Enter cell and direction (e.g. C4 V), ENTER for random, 'q' to quit: ";

/// Interactive controller reading intents from standard input.
pub struct CliController {
    fallback: AutoController,
    incoming: Vec<AttackReport>,
}

impl CliController {
    pub fn new() -> Self {
        Self {
            fallback: AutoController::new(),
            incoming: Vec::new(),
        }
    }

    fn prompt(&self, text: &str) -> Option<String> {
        std::print!("{}", text);
        io::stdout().flush().ok()?;
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }
}

impl Default for CliController {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_direction(token: Option<&str>, current: Direction) -> Result<Direction, String> {
    match token.and_then(|s| s.chars().next()) {
        None => Ok(current),
        Some('h') | Some('H') => Ok(Direction::Horizontal),
        Some('v') | Some('V') => Ok(Direction::Vertical),
        Some(other) => Err(format!("Invalid direction '{}' - use H or V", other)),
    }
}

impl Controller for CliController {
    fn choose_placement(
        &mut self,
        rng: &mut SmallRng,
        fleet: &Fleet,
        direction: Direction,
    ) -> Option<(Position, Direction)> {
        let def = fleet.next_to_place()?.def();
        loop {
            std::println!();
            print_fleet(fleet, &self.incoming);
            std::println!(
                "\nPlace your {} (length {}), direction {:?}",
                def.name(),
                def.length(),
                direction
            );
            let line = self.prompt(PLACEMENT_PROMPT)?;
            if line.is_empty() {
                return self.fallback.choose_placement(rng, fleet, direction);
            }
            if line.eq_ignore_ascii_case("q") {
                return None;
            }
            let mut parts = line.split_whitespace();
            let Some(cell) = parts.next() else {
                continue;
            };
            let start = match parse_cell(cell) {
                Ok(p) => p,
                Err(e) => {
                    std::println!("✗ {}", e);
                    continue;
                }
            };
            match parse_direction(parts.next(), direction) {
                Ok(d) => return Some((start, d)),
                Err(e) => std::println!("✗ {}", e),
            }
        }
    }

    fn select_target(&mut self, rng: &mut SmallRng, board: &TargetBoard) -> Option<Position> {
        loop {
            std::println!("\nOpponent board:");
            print_target(board);
            let line = self.prompt("Enter target (e.g. C4), ENTER for random, 'q' to quit: ")?;
            if line.is_empty() {
                return self.fallback.select_target(rng, board);
            }
            if line.eq_ignore_ascii_case("q") {
                return None;
            }
            match parse_cell(&line) {
                Ok(p) if board.is_resolved(p) => {
                    std::println!(
                        "✗ {} was already fired at. Choose another target.",
                        cell_label(p)
                    );
                }
                Ok(p) => return Some(p),
                Err(e) => std::println!("✗ Invalid cell: {}", e),
            }
        }
    }

    fn handle_rejection(&mut self, reason: &str) {
        std::println!("✗ {}", reason);
    }

    fn handle_report(&mut self, report: &AttackReport) {
        std::println!("{}", describe_report(report));
        self.incoming.push(*report);
    }
}
