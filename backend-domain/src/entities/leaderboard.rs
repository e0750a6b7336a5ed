// Leaderboard and player profile views

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaderboardCategory {
    MostKills,
    LongestShots,
    MostDeaths,
    KdRatio,
    MrRespawn,
    WeaponMeta,
}

impl LeaderboardCategory {
    pub const ALL: [LeaderboardCategory; 6] = [
        LeaderboardCategory::MostKills,
        LeaderboardCategory::LongestShots,
        LeaderboardCategory::MostDeaths,
        LeaderboardCategory::KdRatio,
        LeaderboardCategory::MrRespawn,
        LeaderboardCategory::WeaponMeta,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        let key = raw.trim();
        Self::ALL.into_iter().find(|category| category.as_str() == key)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LeaderboardCategory::MostKills => "most_kills",
            LeaderboardCategory::LongestShots => "longest_shots",
            LeaderboardCategory::MostDeaths => "most_deaths",
            LeaderboardCategory::KdRatio => "kd_ratio",
            LeaderboardCategory::MrRespawn => "mr_respawn",
            LeaderboardCategory::WeaponMeta => "weapon_meta",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LeaderboardValue {
    Count(u64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub player_name: String,
    pub value: LeaderboardValue,
    pub secondary_value: String,
    pub details: String,
    pub last_activity: Option<String>,
    pub category: LeaderboardCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaponStat {
    pub weapon: String,
    pub kills: u64,
    pub average_distance: u32,
    pub unique_users: usize,
    pub last_used: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStatistics {
    pub total_kills: u64,
    pub total_deaths: u64,
    pub kd_ratio: f64,
    pub longest_shot: u32,
    pub favorite_weapon: String,
    pub suicides: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfile {
    pub player_name: String,
    pub steam_id: Option<String>,
    pub previous_names: Vec<String>,
    pub statistics: PlayerStatistics,
    pub last_activity: Option<String>,
}
