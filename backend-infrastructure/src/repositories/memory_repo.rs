use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use backend_domain::ports::{
    ActivityRepository, IdentityRepository, KillEventRepository, SuicideRepository,
};
use backend_domain::{
    DedupKey, Distance, KillEvent, PlayerEvent, PlayerIdentity, ServerEventRecord, SteamId,
    SuicideCounter, SELF_INFLICTED_WEAPON, UNKNOWN_NAME, UNKNOWN_WEAPON,
};

/// In-process store backing `storage_backend = "memory"` and the test suites.
#[derive(Default)]
pub struct MemoryRepo {
    kills: RwLock<Vec<KillEvent>>,
    identities: RwLock<BTreeMap<(String, SteamId), PlayerIdentity>>,
    suicides: RwLock<BTreeMap<(String, String), SuicideCounter>>,
    player_events: RwLock<Vec<PlayerEvent>>,
    server_events: RwLock<Vec<ServerEventRecord>>,
}

impl MemoryRepo {
    pub async fn server_events(&self) -> Vec<ServerEventRecord> {
        self.server_events.read().await.clone()
    }
}

fn suicide_key(player_name: &str, steam_id: Option<&SteamId>) -> String {
    match steam_id {
        Some(id) => id.to_string(),
        None => player_name.to_string(),
    }
}

#[async_trait]
impl KillEventRepository for MemoryRepo {
    async fn ensure_schema(&self) -> anyhow::Result<()> {
        Ok(())
    }

    async fn insert_kill_event(&self, event: &KillEvent) -> anyhow::Result<()> {
        self.kills.write().await.push(event.clone());
        Ok(())
    }

    async fn has_duplicate(&self, key: &DedupKey) -> anyhow::Result<bool> {
        let kills = self.kills.read().await;
        Ok(kills.iter().any(|event| event.dedup_key() == *key))
    }

    async fn fetch_kill_events(&self, wipe: &str) -> anyhow::Result<Vec<KillEvent>> {
        let kills = self.kills.read().await;
        Ok(kills
            .iter()
            .filter(|event| event.wipe_epoch == wipe)
            .cloned()
            .collect())
    }

    async fn fetch_recent(&self, wipe: &str, limit: usize) -> anyhow::Result<Vec<KillEvent>> {
        let mut events = self.fetch_kill_events(wipe).await?;
        events.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at).then_with(|| b.id.cmp(&a.id)));
        events.truncate(limit);
        Ok(events)
    }

    async fn delete_wipe(&self, wipe: &str) -> anyhow::Result<u64> {
        let mut kills = self.kills.write().await;
        let before = kills.len();
        kills.retain(|event| event.wipe_epoch != wipe);
        Ok((before - kills.len()) as u64)
    }

    async fn delete_unidentified(&self, wipe: &str) -> anyhow::Result<u64> {
        let mut kills = self.kills.write().await;
        let before = kills.len();
        kills.retain(|event| {
            event.wipe_epoch != wipe
                || (event.killer_name != UNKNOWN_NAME && event.victim_name != UNKNOWN_NAME)
        });
        Ok((before - kills.len()) as u64)
    }

    async fn repair_self_inflicted_defaults(&self, wipe: &str) -> anyhow::Result<u64> {
        let mut kills = self.kills.write().await;
        let mut repaired = 0;
        for event in kills.iter_mut().filter(|event| {
            event.wipe_epoch == wipe
                && event.killer_name == event.victim_name
                && event.weapon == UNKNOWN_WEAPON
                && event.distance == Distance::Meters(0)
        }) {
            event.weapon = SELF_INFLICTED_WEAPON.to_string();
            event.distance = Distance::Suicide;
            repaired += 1;
        }
        Ok(repaired)
    }

    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

#[async_trait]
impl IdentityRepository for MemoryRepo {
    async fn fetch_identity(
        &self,
        steam_id: &SteamId,
        wipe: &str,
    ) -> anyhow::Result<Option<PlayerIdentity>> {
        let identities = self.identities.read().await;
        Ok(identities.get(&(wipe.to_string(), steam_id.clone())).cloned())
    }

    async fn save_identity(&self, identity: &PlayerIdentity) -> anyhow::Result<()> {
        self.identities.write().await.insert(
            (identity.wipe_epoch.clone(), identity.steam_id.clone()),
            identity.clone(),
        );
        Ok(())
    }

    async fn fetch_identities(&self, wipe: &str) -> anyhow::Result<Vec<PlayerIdentity>> {
        let identities = self.identities.read().await;
        Ok(identities
            .iter()
            .filter(|((identity_wipe, _), _)| identity_wipe == wipe)
            .map(|(_, identity)| identity.clone())
            .collect())
    }

    async fn delete_wipe(&self, wipe: &str) -> anyhow::Result<u64> {
        let mut identities = self.identities.write().await;
        let before = identities.len();
        identities.retain(|(identity_wipe, _), _| identity_wipe != wipe);
        Ok((before - identities.len()) as u64)
    }
}

#[async_trait]
impl SuicideRepository for MemoryRepo {
    async fn increment(
        &self,
        player_name: &str,
        steam_id: Option<&SteamId>,
        occurred_at: i64,
        wipe: &str,
    ) -> anyhow::Result<SuicideCounter> {
        let mut suicides = self.suicides.write().await;
        let counter = suicides
            .entry((wipe.to_string(), suicide_key(player_name, steam_id)))
            .or_insert_with(|| SuicideCounter {
                player_name: player_name.to_string(),
                steam_id: steam_id.cloned(),
                count: 0,
                last_occurred_at: occurred_at,
                wipe_epoch: wipe.to_string(),
            });
        counter.count += 1;
        counter.player_name = player_name.to_string();
        counter.last_occurred_at = counter.last_occurred_at.max(occurred_at);
        Ok(counter.clone())
    }

    async fn fetch_counters(&self, wipe: &str) -> anyhow::Result<Vec<SuicideCounter>> {
        let suicides = self.suicides.read().await;
        let mut counters: Vec<SuicideCounter> = suicides
            .values()
            .filter(|counter| counter.wipe_epoch == wipe)
            .cloned()
            .collect();
        counters.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.player_name.cmp(&b.player_name)));
        Ok(counters)
    }

    async fn delete_wipe(&self, wipe: &str) -> anyhow::Result<u64> {
        let mut suicides = self.suicides.write().await;
        let before = suicides.len();
        suicides.retain(|(counter_wipe, _), _| counter_wipe != wipe);
        Ok((before - suicides.len()) as u64)
    }
}

#[async_trait]
impl ActivityRepository for MemoryRepo {
    async fn insert_player_event(&self, event: &PlayerEvent) -> anyhow::Result<()> {
        self.player_events.write().await.push(event.clone());
        Ok(())
    }

    async fn fetch_player_events(&self, limit: usize) -> anyhow::Result<Vec<PlayerEvent>> {
        let mut events = self.player_events.read().await.clone();
        events.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
        events.truncate(limit);
        Ok(events)
    }

    async fn insert_server_event(&self, event: &ServerEventRecord) -> anyhow::Result<()> {
        self.server_events.write().await.push(event.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend_domain::PlayerEventKind;

    fn kill(id: &str, at: i64, wipe: &str) -> KillEvent {
        KillEvent {
            id: id.to_string(),
            killer_name: "Alice".to_string(),
            victim_name: "Bob".to_string(),
            weapon: "AKM".to_string(),
            distance: Distance::Meters(100),
            killer_steam_id: None,
            victim_steam_id: None,
            wipe_epoch: wipe.to_string(),
            occurred_at: at,
        }
    }

    #[tokio::test]
    async fn kill_queries_are_scoped_to_the_wipe() {
        let repo = MemoryRepo::default();
        repo.insert_kill_event(&kill("a", 1, "wipe_1")).await.expect("insert");
        repo.insert_kill_event(&kill("b", 3, "wipe_1")).await.expect("insert");
        repo.insert_kill_event(&kill("c", 2, "wipe_2")).await.expect("insert");

        let recent = repo.fetch_recent("wipe_1", 10).await.expect("recent");
        let ids: Vec<&str> = recent.iter().map(|event| event.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);

        assert!(repo.has_duplicate(&kill("z", 3, "wipe_1").dedup_key()).await.expect("dup"));
        assert!(!repo.has_duplicate(&kill("z", 3, "wipe_2").dedup_key()).await.expect("dup"));

        assert_eq!(KillEventRepository::delete_wipe(&repo, "wipe_1").await.expect("delete"), 2);
        assert_eq!(repo.fetch_kill_events("wipe_2").await.expect("fetch").len(), 1);
    }

    #[tokio::test]
    async fn suicide_counters_key_on_steam_id_when_present() {
        let repo = MemoryRepo::default();
        let steam_id = SteamId::parse("76561198000000001").expect("steam id");
        repo.increment("Bob", Some(&steam_id), 5, "wipe_1").await.expect("inc");
        let counter = repo
            .increment("Bobby", Some(&steam_id), 3, "wipe_1")
            .await
            .expect("inc");
        assert_eq!(counter.count, 2);
        assert_eq!(counter.player_name, "Bobby");
        assert_eq!(counter.last_occurred_at, 5);

        repo.increment("Carl", None, 1, "wipe_1").await.expect("inc");
        assert_eq!(repo.fetch_counters("wipe_1").await.expect("fetch").len(), 2);
    }

    #[tokio::test]
    async fn player_events_come_back_newest_first() {
        let repo = MemoryRepo::default();
        for (name, at) in [("Alice", 1), ("Bob", 3), ("Carl", 2)] {
            repo.insert_player_event(&PlayerEvent {
                player_name: name.to_string(),
                steam_id: None,
                kind: PlayerEventKind::Join,
                occurred_at: at,
            })
            .await
            .expect("insert");
        }
        let events = repo.fetch_player_events(2).await.expect("fetch");
        let names: Vec<&str> = events.iter().map(|event| event.player_name.as_str()).collect();
        assert_eq!(names, vec!["Bob", "Carl"]);
    }
}
