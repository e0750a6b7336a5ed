// Player join/leave and server event log entries

use serde::{Deserialize, Serialize};

use crate::utils::millis_to_rfc3339;
use crate::value_objects::SteamId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerEventKind {
    Join,
    Leave,
}

impl PlayerEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerEventKind::Join => "join",
            PlayerEventKind::Leave => "leave",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "join" => Some(PlayerEventKind::Join),
            "leave" => Some(PlayerEventKind::Leave),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerEvent {
    pub player_name: String,
    pub steam_id: Option<SteamId>,
    pub kind: PlayerEventKind,
    pub occurred_at: i64,
}

impl PlayerEvent {
    pub fn to_view(&self) -> PlayerEventView {
        PlayerEventView {
            player_name: self.player_name.clone(),
            steam_id: self.steam_id.as_ref().map(|id| id.to_string()),
            event_type: self.kind,
            timestamp: millis_to_rfc3339(self.occurred_at),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerEventView {
    pub player_name: String,
    pub steam_id: Option<String>,
    pub event_type: PlayerEventKind,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerEventRecord {
    pub event_type: String,
    pub data: serde_json::Value,
    pub occurred_at: i64,
}
