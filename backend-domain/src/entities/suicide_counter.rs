use serde::{Deserialize, Serialize};

use crate::value_objects::SteamId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuicideCounter {
    pub player_name: String,
    pub steam_id: Option<SteamId>,
    pub count: u64,
    pub last_occurred_at: i64,
    pub wipe_epoch: String,
}
