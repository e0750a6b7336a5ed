use anyhow::Result;
use async_trait::async_trait;
use clickhouse::{Client, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::warn;

use backend_domain::ports::{
    ActivityRepository, IdentityRepository, KillEventRepository, SuicideRepository,
};
use backend_domain::{
    current_millis, DedupKey, Distance, KillEvent, PlayerEvent, PlayerEventKind, PlayerIdentity,
    ServerEventRecord, SteamId, SuicideCounter, SELF_INFLICTED_WEAPON, UNKNOWN_NAME,
    UNKNOWN_WEAPON,
};

use crate::utils::{millis_to_utc, utc_to_millis};

#[derive(Debug, Clone, Serialize, Deserialize, Row)]
struct KillEventRow {
    id: String,
    #[serde(with = "clickhouse::serde::time::datetime64::millis")]
    occurred_at: OffsetDateTime,
    killer_name: String,
    victim_name: String,
    weapon: String,
    distance: String,
    killer_steam_id: Option<String>,
    victim_steam_id: Option<String>,
    wipe_epoch: String,
}

impl KillEventRow {
    fn from_event(event: &KillEvent) -> Self {
        Self {
            id: event.id.clone(),
            occurred_at: millis_to_utc(event.occurred_at),
            killer_name: event.killer_name.clone(),
            victim_name: event.victim_name.clone(),
            weapon: event.weapon.clone(),
            distance: event.distance.to_string(),
            killer_steam_id: event.killer_steam_id.as_ref().map(ToString::to_string),
            victim_steam_id: event.victim_steam_id.as_ref().map(ToString::to_string),
            wipe_epoch: event.wipe_epoch.clone(),
        }
    }

    fn into_event(self) -> KillEvent {
        KillEvent {
            id: self.id,
            killer_name: self.killer_name,
            victim_name: self.victim_name,
            weapon: self.weapon,
            distance: Distance::parse(&self.distance),
            killer_steam_id: self.killer_steam_id.as_deref().and_then(SteamId::parse),
            victim_steam_id: self.victim_steam_id.as_deref().and_then(SteamId::parse),
            wipe_epoch: self.wipe_epoch,
            occurred_at: utc_to_millis(self.occurred_at),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Row)]
struct IdentityRow {
    wipe_epoch: String,
    steam_id: String,
    current_name: String,
    previous_names: Vec<String>,
    #[serde(with = "clickhouse::serde::time::datetime64::millis")]
    first_seen: OffsetDateTime,
    #[serde(with = "clickhouse::serde::time::datetime64::millis")]
    last_seen: OffsetDateTime,
    #[serde(with = "clickhouse::serde::time::datetime64::millis")]
    updated_at: OffsetDateTime,
}

impl IdentityRow {
    fn into_identity(self) -> Option<PlayerIdentity> {
        let Some(steam_id) = SteamId::parse(&self.steam_id) else {
            warn!("skipping identity row with malformed steam id '{}'", self.steam_id);
            return None;
        };
        Some(PlayerIdentity {
            steam_id,
            current_name: self.current_name,
            previous_names: self.previous_names,
            first_seen: utc_to_millis(self.first_seen),
            last_seen: utc_to_millis(self.last_seen),
            wipe_epoch: self.wipe_epoch,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Row)]
struct SuicideRow {
    wipe_epoch: String,
    player_key: String,
    player_name: String,
    steam_id: Option<String>,
    count: u64,
    #[serde(with = "clickhouse::serde::time::datetime64::millis")]
    last_occurred_at: OffsetDateTime,
    #[serde(with = "clickhouse::serde::time::datetime64::millis")]
    updated_at: OffsetDateTime,
}

impl SuicideRow {
    fn into_counter(self) -> SuicideCounter {
        SuicideCounter {
            player_name: self.player_name,
            steam_id: self.steam_id.as_deref().and_then(SteamId::parse),
            count: self.count,
            last_occurred_at: utc_to_millis(self.last_occurred_at),
            wipe_epoch: self.wipe_epoch,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Row)]
struct PlayerEventRow {
    #[serde(with = "clickhouse::serde::time::datetime64::millis")]
    event_time: OffsetDateTime,
    player_name: String,
    steam_id: Option<String>,
    event_type: String,
}

#[derive(Debug, Clone, Serialize, Row)]
struct ServerEventRow {
    #[serde(with = "clickhouse::serde::time::datetime64::millis")]
    event_time: OffsetDateTime,
    event_type: String,
    data: String,
}

const KILL_COLUMNS: &str = "id, occurred_at, killer_name, victim_name, weapon, distance, \
     killer_steam_id, victim_steam_id, wipe_epoch";
const IDENTITY_COLUMNS: &str =
    "wipe_epoch, steam_id, current_name, previous_names, first_seen, last_seen, updated_at";
const SUICIDE_COLUMNS: &str =
    "wipe_epoch, player_key, player_name, steam_id, count, last_occurred_at, updated_at";

#[derive(Clone)]
pub struct ClickhouseRepo {
    client: Client,
    database: String,
}

impl ClickhouseRepo {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    /// `source` is the table expression to count from, `FINAL` included for
    /// the replacing tables.
    async fn delete_wipe_rows(&self, table: &str, source: &str, wipe: &str) -> Result<u64> {
        let query = format!("SELECT count() FROM {} WHERE wipe_epoch = ?", source);
        let count: u64 = self.client.query(&query).bind(wipe).fetch_one().await?;
        if count == 0 {
            return Ok(0);
        }
        let query = format!(
            "ALTER TABLE {} DELETE WHERE wipe_epoch = ? SETTINGS mutations_sync = 1",
            table
        );
        self.client.query(&query).bind(wipe).execute().await?;
        Ok(count)
    }
}

#[async_trait]
impl KillEventRepository for ClickhouseRepo {
    async fn ensure_schema(&self) -> Result<()> {
        let create_db = format!("CREATE DATABASE IF NOT EXISTS {}", self.database);
        self.client.query(&create_db).execute().await?;

        let create_kills = r#"
CREATE TABLE IF NOT EXISTS kill_events (
    id String,
    occurred_at DateTime64(3),
    killer_name String,
    victim_name String,
    weapon String,
    distance String,
    killer_steam_id Nullable(String),
    victim_steam_id Nullable(String),
    wipe_epoch String
) ENGINE = MergeTree
PARTITION BY wipe_epoch
ORDER BY (occurred_at, killer_name, victim_name)
"#;
        self.client.query(create_kills).execute().await?;

        let create_identities = r#"
CREATE TABLE IF NOT EXISTS player_identities (
    wipe_epoch String,
    steam_id String,
    current_name String,
    previous_names Array(String),
    first_seen DateTime64(3),
    last_seen DateTime64(3),
    updated_at DateTime64(3)
) ENGINE = ReplacingMergeTree(updated_at)
ORDER BY (wipe_epoch, steam_id)
"#;
        self.client.query(create_identities).execute().await?;

        let create_suicides = r#"
CREATE TABLE IF NOT EXISTS suicide_counters (
    wipe_epoch String,
    player_key String,
    player_name String,
    steam_id Nullable(String),
    count UInt64,
    last_occurred_at DateTime64(3),
    updated_at DateTime64(3)
) ENGINE = ReplacingMergeTree(updated_at)
ORDER BY (wipe_epoch, player_key)
"#;
        self.client.query(create_suicides).execute().await?;

        let create_player_events = r#"
CREATE TABLE IF NOT EXISTS player_events (
    event_time DateTime64(3),
    player_name String,
    steam_id Nullable(String),
    event_type LowCardinality(String)
) ENGINE = MergeTree
PARTITION BY toDate(event_time)
ORDER BY (event_time, player_name)
TTL toDateTime(event_time) + INTERVAL 30 DAY
"#;
        self.client.query(create_player_events).execute().await?;

        let create_server_events = r#"
CREATE TABLE IF NOT EXISTS server_events (
    event_time DateTime64(3),
    event_type LowCardinality(String),
    data String
) ENGINE = MergeTree
PARTITION BY toDate(event_time)
ORDER BY (event_time, event_type)
TTL toDateTime(event_time) + INTERVAL 30 DAY
"#;
        self.client.query(create_server_events).execute().await?;
        Ok(())
    }

    async fn insert_kill_event(&self, event: &KillEvent) -> Result<()> {
        let mut insert = self.client.insert("kill_events")?;
        insert.write(&KillEventRow::from_event(event)).await?;
        insert.end().await?;
        Ok(())
    }

    async fn has_duplicate(&self, key: &DedupKey) -> Result<bool> {
        let count: u64 = self
            .client
            .query(
                "SELECT count() FROM kill_events \
                 WHERE wipe_epoch = ? AND killer_name = ? AND victim_name = ? \
                 AND weapon = ? AND distance = ? AND occurred_at = fromUnixTimestamp64Milli(?)",
            )
            .bind(&key.wipe_epoch)
            .bind(&key.killer_name)
            .bind(&key.victim_name)
            .bind(&key.weapon)
            .bind(&key.distance)
            .bind(key.occurred_at)
            .fetch_one()
            .await?;
        Ok(count > 0)
    }

    async fn fetch_kill_events(&self, wipe: &str) -> Result<Vec<KillEvent>> {
        let query = format!(
            "SELECT {} FROM kill_events WHERE wipe_epoch = ? ORDER BY occurred_at",
            KILL_COLUMNS
        );
        let rows = self
            .client
            .query(&query)
            .bind(wipe)
            .fetch_all::<KillEventRow>()
            .await?;
        Ok(rows.into_iter().map(KillEventRow::into_event).collect())
    }

    async fn fetch_recent(&self, wipe: &str, limit: usize) -> Result<Vec<KillEvent>> {
        let query = format!(
            "SELECT {} FROM kill_events WHERE wipe_epoch = ? \
             ORDER BY occurred_at DESC, id DESC LIMIT ?",
            KILL_COLUMNS
        );
        let rows = self
            .client
            .query(&query)
            .bind(wipe)
            .bind(limit as u64)
            .fetch_all::<KillEventRow>()
            .await?;
        Ok(rows.into_iter().map(KillEventRow::into_event).collect())
    }

    async fn delete_wipe(&self, wipe: &str) -> Result<u64> {
        self.delete_wipe_rows("kill_events", "kill_events", wipe).await
    }

    async fn delete_unidentified(&self, wipe: &str) -> Result<u64> {
        let count: u64 = self
            .client
            .query(
                "SELECT count() FROM kill_events \
                 WHERE wipe_epoch = ? AND (killer_name = ? OR victim_name = ?)",
            )
            .bind(wipe)
            .bind(UNKNOWN_NAME)
            .bind(UNKNOWN_NAME)
            .fetch_one()
            .await?;
        if count == 0 {
            return Ok(0);
        }
        self.client
            .query(
                "ALTER TABLE kill_events DELETE \
                 WHERE wipe_epoch = ? AND (killer_name = ? OR victim_name = ?) \
                 SETTINGS mutations_sync = 1",
            )
            .bind(wipe)
            .bind(UNKNOWN_NAME)
            .bind(UNKNOWN_NAME)
            .execute()
            .await?;
        Ok(count)
    }

    async fn repair_self_inflicted_defaults(&self, wipe: &str) -> Result<u64> {
        let pvp_default_distance = Distance::Meters(0).to_string();
        let count: u64 = self
            .client
            .query(
                "SELECT count() FROM kill_events \
                 WHERE wipe_epoch = ? AND killer_name = victim_name AND weapon = ? AND distance = ?",
            )
            .bind(wipe)
            .bind(UNKNOWN_WEAPON)
            .bind(&pvp_default_distance)
            .fetch_one()
            .await?;
        if count == 0 {
            return Ok(0);
        }
        self.client
            .query(
                "ALTER TABLE kill_events UPDATE weapon = ?, distance = ? \
                 WHERE wipe_epoch = ? AND killer_name = victim_name AND weapon = ? AND distance = ? \
                 SETTINGS mutations_sync = 1",
            )
            .bind(SELF_INFLICTED_WEAPON)
            .bind(Distance::Suicide.to_string())
            .bind(wipe)
            .bind(UNKNOWN_WEAPON)
            .bind(&pvp_default_distance)
            .execute()
            .await?;
        Ok(count)
    }

    async fn ping(&self) -> Result<()> {
        let _: u8 = self.client.query("SELECT toUInt8(1)").fetch_one().await?;
        Ok(())
    }
}

#[async_trait]
impl IdentityRepository for ClickhouseRepo {
    async fn fetch_identity(&self, steam_id: &SteamId, wipe: &str) -> Result<Option<PlayerIdentity>> {
        let query = format!(
            "SELECT {} FROM player_identities FINAL WHERE wipe_epoch = ? AND steam_id = ? LIMIT 1",
            IDENTITY_COLUMNS
        );
        let row = self
            .client
            .query(&query)
            .bind(wipe)
            .bind(steam_id.as_str())
            .fetch_all::<IdentityRow>()
            .await?
            .into_iter()
            .next();
        Ok(row.and_then(IdentityRow::into_identity))
    }

    async fn save_identity(&self, identity: &PlayerIdentity) -> Result<()> {
        let mut insert = self.client.insert("player_identities")?;
        insert
            .write(&IdentityRow {
                wipe_epoch: identity.wipe_epoch.clone(),
                steam_id: identity.steam_id.to_string(),
                current_name: identity.current_name.clone(),
                previous_names: identity.previous_names.clone(),
                first_seen: millis_to_utc(identity.first_seen),
                last_seen: millis_to_utc(identity.last_seen),
                updated_at: millis_to_utc(current_millis()),
            })
            .await?;
        insert.end().await?;
        Ok(())
    }

    async fn fetch_identities(&self, wipe: &str) -> Result<Vec<PlayerIdentity>> {
        let query = format!(
            "SELECT {} FROM player_identities FINAL WHERE wipe_epoch = ? ORDER BY steam_id",
            IDENTITY_COLUMNS
        );
        let rows = self
            .client
            .query(&query)
            .bind(wipe)
            .fetch_all::<IdentityRow>()
            .await?;
        Ok(rows.into_iter().filter_map(IdentityRow::into_identity).collect())
    }

    async fn delete_wipe(&self, wipe: &str) -> Result<u64> {
        self.delete_wipe_rows("player_identities", "player_identities FINAL", wipe).await
    }
}

#[async_trait]
impl SuicideRepository for ClickhouseRepo {
    async fn increment(
        &self,
        player_name: &str,
        steam_id: Option<&SteamId>,
        occurred_at: i64,
        wipe: &str,
    ) -> Result<SuicideCounter> {
        let player_key = match steam_id {
            Some(id) => id.to_string(),
            None => player_name.to_string(),
        };
        let query = format!(
            "SELECT {} FROM suicide_counters FINAL WHERE wipe_epoch = ? AND player_key = ? LIMIT 1",
            SUICIDE_COLUMNS
        );
        let existing = self
            .client
            .query(&query)
            .bind(wipe)
            .bind(&player_key)
            .fetch_all::<SuicideRow>()
            .await?
            .into_iter()
            .next();

        let (count, last_occurred_at) = match &existing {
            Some(row) => (
                row.count + 1,
                utc_to_millis(row.last_occurred_at).max(occurred_at),
            ),
            None => (1, occurred_at),
        };
        let row = SuicideRow {
            wipe_epoch: wipe.to_string(),
            player_key,
            player_name: player_name.to_string(),
            steam_id: steam_id.map(ToString::to_string),
            count,
            last_occurred_at: millis_to_utc(last_occurred_at),
            updated_at: millis_to_utc(current_millis()),
        };
        let mut insert = self.client.insert("suicide_counters")?;
        insert.write(&row).await?;
        insert.end().await?;
        Ok(row.into_counter())
    }

    async fn fetch_counters(&self, wipe: &str) -> Result<Vec<SuicideCounter>> {
        let query = format!(
            "SELECT {} FROM suicide_counters FINAL WHERE wipe_epoch = ? \
             ORDER BY count DESC, player_name",
            SUICIDE_COLUMNS
        );
        let rows = self
            .client
            .query(&query)
            .bind(wipe)
            .fetch_all::<SuicideRow>()
            .await?;
        Ok(rows.into_iter().map(SuicideRow::into_counter).collect())
    }

    async fn delete_wipe(&self, wipe: &str) -> Result<u64> {
        self.delete_wipe_rows("suicide_counters", "suicide_counters FINAL", wipe).await
    }
}

#[async_trait]
impl ActivityRepository for ClickhouseRepo {
    async fn insert_player_event(&self, event: &PlayerEvent) -> Result<()> {
        let mut insert = self.client.insert("player_events")?;
        insert
            .write(&PlayerEventRow {
                event_time: millis_to_utc(event.occurred_at),
                player_name: event.player_name.clone(),
                steam_id: event.steam_id.as_ref().map(ToString::to_string),
                event_type: event.kind.as_str().to_string(),
            })
            .await?;
        insert.end().await?;
        Ok(())
    }

    async fn fetch_player_events(&self, limit: usize) -> Result<Vec<PlayerEvent>> {
        let rows = self
            .client
            .query(
                "SELECT event_time, player_name, steam_id, event_type FROM player_events \
                 ORDER BY event_time DESC LIMIT ?",
            )
            .bind(limit as u64)
            .fetch_all::<PlayerEventRow>()
            .await?;
        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let kind = PlayerEventKind::parse(&row.event_type)?;
                Some(PlayerEvent {
                    player_name: row.player_name,
                    steam_id: row.steam_id.as_deref().and_then(SteamId::parse),
                    kind,
                    occurred_at: utc_to_millis(row.event_time),
                })
            })
            .collect())
    }

    async fn insert_server_event(&self, event: &ServerEventRecord) -> Result<()> {
        let mut insert = self.client.insert("server_events")?;
        insert
            .write(&ServerEventRow {
                event_time: millis_to_utc(event.occurred_at),
                event_type: event.event_type.clone(),
                data: serde_json::to_string(&event.data)?,
            })
            .await?;
        insert.end().await?;
        Ok(())
    }
}
