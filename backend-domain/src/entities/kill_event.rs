// Kill event entity
// One recorded death, immutable once stored

use serde::{Deserialize, Serialize};

use crate::utils::millis_to_rfc3339;
use crate::value_objects::{Distance, SteamId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KillEvent {
    pub id: String,
    pub killer_name: String,
    pub victim_name: String,
    pub weapon: String,
    pub distance: Distance,
    pub killer_steam_id: Option<SteamId>,
    pub victim_steam_id: Option<SteamId>,
    pub wipe_epoch: String,
    pub occurred_at: i64,
}

impl KillEvent {
    pub fn dedup_key(&self) -> DedupKey {
        DedupKey {
            killer_name: self.killer_name.clone(),
            victim_name: self.victim_name.clone(),
            weapon: self.weapon.clone(),
            distance: self.distance.to_string(),
            occurred_at: self.occurred_at,
            wipe_epoch: self.wipe_epoch.clone(),
        }
    }

    pub fn to_feed_entry(&self) -> KillFeedEntry {
        KillFeedEntry {
            id: self.id.clone(),
            killer: self.killer_name.clone(),
            victim: self.victim_name.clone(),
            weapon: self.weapon.clone(),
            distance: self.distance.to_string(),
            killer_steam_id: self.killer_steam_id.as_ref().map(|id| id.to_string()),
            victim_steam_id: self.victim_steam_id.as_ref().map(|id| id.to_string()),
            timestamp: millis_to_rfc3339(self.occurred_at),
            wipe_id: self.wipe_epoch.clone(),
        }
    }
}

/// Exact-match tuple used to recognize a redelivered notification.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    pub killer_name: String,
    pub victim_name: String,
    pub weapon: String,
    pub distance: String,
    pub occurred_at: i64,
    pub wipe_epoch: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KillFeedEntry {
    pub id: String,
    pub killer: String,
    pub victim: String,
    pub weapon: String,
    pub distance: String,
    pub killer_steam_id: Option<String>,
    pub victim_steam_id: Option<String>,
    pub timestamp: String,
    pub wipe_id: String,
}
