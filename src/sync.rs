#![cfg(feature = "std")]

//! Turn ownership and message admission for peer matches.
//!
//! Neither side trusts a replicated "my turn" flag. Each side folds the
//! messages it has sent and accepted into a [`TurnLedger`]; the last START or
//! ATTACK_RESULT decides who fires next.

use crate::protocol::{Message, Status};

/// Turn holder derived from message history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnLedger {
    holder: Option<String>,
}

impl TurnLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger after `msg`. START hands the turn to its sender; ATTACK_RESULT
    /// leaves it with the attacker on a hit and gives it to the defender on a
    /// miss. Every other message leaves it unchanged.
    pub fn apply(&self, msg: &Message) -> TurnLedger {
        match msg.status {
            Status::Start => TurnLedger {
                holder: Some(msg.from.clone()),
            },
            Status::AttackResult => match (msg.result, msg.attacker.as_ref()) {
                (Some(true), Some(attacker)) => TurnLedger {
                    holder: Some(attacker.clone()),
                },
                (Some(false), Some(_)) => TurnLedger {
                    holder: Some(msg.from.clone()),
                },
                _ => self.clone(),
            },
            _ => self.clone(),
        }
    }

    /// Fold a whole history, oldest first.
    pub fn replay<'a, I>(history: I) -> TurnLedger
    where
        I: IntoIterator<Item = &'a Message>,
    {
        history
            .into_iter()
            .fold(TurnLedger::new(), |ledger, msg| ledger.apply(msg))
    }

    pub fn holder(&self) -> Option<&str> {
        self.holder.as_deref()
    }

    pub fn holds(&self, identity: &str) -> bool {
        self.holder.as_deref() == Some(identity)
    }
}

/// Admission decision for an inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Accept,
    /// Scoped to another match.
    ForeignMatch,
    /// Our own message forwarded back by the relay.
    Echo,
    /// From a third identity after the peer is known.
    Stranger,
}

/// Decide whether `msg` belongs to the match `game_id` between `me` and
/// `peer` (unknown until the first accepted message).
pub fn screen(msg: &Message, game_id: &str, me: &str, peer: Option<&str>) -> Screen {
    if msg.game_id != game_id {
        Screen::ForeignMatch
    } else if msg.from == me {
        Screen::Echo
    } else if peer.is_some_and(|p| p != msg.from) {
        Screen::Stranger
    } else {
        Screen::Accept
    }
}
