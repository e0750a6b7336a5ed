use async_trait::async_trait;

use crate::entities::{
    DedupKey, KillEvent, PlayerEvent, PlayerIdentity, ServerEventRecord, SuicideCounter,
};
use crate::value_objects::SteamId;

#[async_trait]
pub trait KillEventRepository: Send + Sync {
    async fn ensure_schema(&self) -> anyhow::Result<()>;
    async fn insert_kill_event(&self, event: &KillEvent) -> anyhow::Result<()>;
    async fn has_duplicate(&self, key: &DedupKey) -> anyhow::Result<bool>;
    async fn fetch_kill_events(&self, wipe: &str) -> anyhow::Result<Vec<KillEvent>>;
    async fn fetch_recent(&self, wipe: &str, limit: usize) -> anyhow::Result<Vec<KillEvent>>;
    async fn delete_wipe(&self, wipe: &str) -> anyhow::Result<u64>;
    /// Removes rows whose killer or victim is the unidentified placeholder.
    async fn delete_unidentified(&self, wipe: &str) -> anyhow::Result<u64>;
    /// Rewrites `killer == victim` rows still carrying PvP defaults.
    async fn repair_self_inflicted_defaults(&self, wipe: &str) -> anyhow::Result<u64>;
    async fn ping(&self) -> anyhow::Result<()>;
}

#[async_trait]
pub trait IdentityRepository: Send + Sync {
    async fn fetch_identity(
        &self,
        steam_id: &SteamId,
        wipe: &str,
    ) -> anyhow::Result<Option<PlayerIdentity>>;
    async fn save_identity(&self, identity: &PlayerIdentity) -> anyhow::Result<()>;
    async fn fetch_identities(&self, wipe: &str) -> anyhow::Result<Vec<PlayerIdentity>>;
    async fn delete_wipe(&self, wipe: &str) -> anyhow::Result<u64>;
}

#[async_trait]
pub trait SuicideRepository: Send + Sync {
    async fn increment(
        &self,
        player_name: &str,
        steam_id: Option<&SteamId>,
        occurred_at: i64,
        wipe: &str,
    ) -> anyhow::Result<SuicideCounter>;
    async fn fetch_counters(&self, wipe: &str) -> anyhow::Result<Vec<SuicideCounter>>;
    async fn delete_wipe(&self, wipe: &str) -> anyhow::Result<u64>;
}

#[async_trait]
pub trait ActivityRepository: Send + Sync {
    async fn insert_player_event(&self, event: &PlayerEvent) -> anyhow::Result<()>;
    async fn fetch_player_events(&self, limit: usize) -> anyhow::Result<Vec<PlayerEvent>>;
    async fn insert_server_event(&self, event: &ServerEventRecord) -> anyhow::Result<()>;
}
