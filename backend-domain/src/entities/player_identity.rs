// Player identity entity
// Steam-keyed consolidation record, one per (steam id, wipe)

use serde::{Deserialize, Serialize};

use crate::value_objects::SteamId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerIdentity {
    pub steam_id: SteamId,
    pub current_name: String,
    pub previous_names: Vec<String>,
    pub first_seen: i64,
    pub last_seen: i64,
    pub wipe_epoch: String,
}

impl PlayerIdentity {
    pub fn new(steam_id: SteamId, name: &str, seen_at: i64, wipe_epoch: &str) -> Self {
        Self {
            steam_id,
            current_name: name.to_string(),
            previous_names: Vec::new(),
            first_seen: seen_at,
            last_seen: seen_at,
            wipe_epoch: wipe_epoch.to_string(),
        }
    }

    /// Records a sighting under `name`. A superseded name is appended to the
    /// history once; the newest spelling always becomes current.
    /// Returns true when the current name changed.
    pub fn observe(&mut self, name: &str, seen_at: i64) -> bool {
        self.last_seen = self.last_seen.max(seen_at);
        if name == self.current_name {
            return false;
        }
        if !self.previous_names.iter().any(|prev| prev == &self.current_name) {
            self.previous_names.push(self.current_name.clone());
        }
        self.current_name = name.to_string();
        true
    }

    pub fn answers_to(&self, name: &str) -> bool {
        self.current_name.eq_ignore_ascii_case(name)
            || self
                .previous_names
                .iter()
                .any(|prev| prev.eq_ignore_ascii_case(name))
    }
}
