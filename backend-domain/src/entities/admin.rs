// Administrative command reports

use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WipeDetails {
    pub kill_feed: u64,
    pub steam_players: u64,
    pub suicides: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WipeReport {
    pub success: bool,
    pub deleted_entries: u64,
    pub details: WipeDetails,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupReport {
    pub success: bool,
    pub deleted_entries: u64,
    pub repaired_entries: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidationReport {
    pub success: bool,
    pub updated_entries: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct IntegrityReport {
    pub consistent: bool,
    pub issues: Vec<String>,
}
