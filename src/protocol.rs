#![cfg(feature = "std")]

//! Messages exchanged by two peers through the relay.
//!
//! Each message is one JSON object:
//! `{"status": .., "from": .., "gameId": .., "position"?: .., "result"?: .., ...}`.

use serde::{Deserialize, Serialize};

use crate::core::Position;

/// Path prefix a client connects on, followed by the match id.
pub const WS_PATH: &str = "/ws/game";
/// Path prefix of the match existence query.
pub const LOOKUP_PATH: &str = "/game";

/// Kind of a protocol message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// A side connected to the match.
    Join,
    /// A side finished placing its fleet.
    Ready,
    /// The owner opens the battle and takes the first turn.
    Start,
    /// The attacker names a target cell.
    AttackStart,
    /// The defender reports whether the named cell was a hit.
    AttackResult,
    /// A side left the match.
    Leave,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub status: Status,
    pub from: String,
    pub game_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<bool>,
    /// Identity of the side whose attack an `ATTACK_RESULT` answers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attacker: Option<String>,
    /// Name of the ship an `ATTACK_RESULT` reports as sunk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunk: Option<String>,
}

impl Message {
    pub fn new(status: Status, from: &str, game_id: &str) -> Self {
        Self {
            status,
            from: from.to_string(),
            game_id: game_id.to_string(),
            position: None,
            result: None,
            attacker: None,
            sunk: None,
        }
    }

    pub fn attack_start(from: &str, game_id: &str, position: Position) -> Self {
        Self {
            position: Some(position),
            ..Self::new(Status::AttackStart, from, game_id)
        }
    }

    pub fn attack_result(
        from: &str,
        game_id: &str,
        position: Position,
        hit: bool,
        attacker: &str,
        sunk: Option<&str>,
    ) -> Self {
        Self {
            position: Some(position),
            result: Some(hit),
            attacker: Some(attacker.to_string()),
            sunk: sunk.map(str::to_string),
            ..Self::new(Status::AttackResult, from, game_id)
        }
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        serde_json::to_string(self).map_err(|e| anyhow::anyhow!("Serialization error: {}", e))
    }

    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        serde_json::from_str(text).map_err(|e| anyhow::anyhow!("Deserialization error: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_shape_uses_camel_case_and_screaming_status() {
        let pos = Position::new(3, 3).unwrap();
        let msg = Message::attack_result("player-b", "g1", pos, true, "player-a", None);
        let value: serde_json::Value = serde_json::from_str(&msg.to_json().unwrap()).unwrap();
        assert_eq!(value["status"], "ATTACK_RESULT");
        assert_eq!(value["gameId"], "g1");
        assert_eq!(value["position"], "33");
        assert_eq!(value["result"], true);
        assert_eq!(value["attacker"], "player-a");
        assert!(value.get("sunk").is_none());
    }

    #[test]
    fn bad_position_rejects_whole_message() {
        let text = r#"{"status":"ATTACK_START","from":"a","gameId":"g","position":"09"}"#;
        assert!(Message::from_json(text).is_err());
    }

    #[test]
    fn optional_fields_may_be_absent() {
        let msg = Message::from_json(r#"{"status":"JOIN","from":"a","gameId":"g"}"#).unwrap();
        assert_eq!(msg, Message::new(Status::Join, "a", "g"));
    }
}
