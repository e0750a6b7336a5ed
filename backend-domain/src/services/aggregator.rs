// Leaderboard aggregation over stored kill events

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::entities::{
    KillEvent, LeaderboardCategory, LeaderboardEntry, LeaderboardValue, PlayerIdentity,
    PlayerProfile, PlayerStatistics, WeaponStat,
};
use crate::services::self_harm::is_self_inflicted;
use crate::utils::millis_to_rfc3339;

const NO_FAVORITE: &str = "Unknown";
const SELF_HARM_DEFAULT: &str = "Self-harm specialist";

#[derive(Debug, Default)]
struct PlayerTally<'a> {
    kills: u64,
    deaths: u64,
    suicides: u64,
    longest_shot: u32,
    longest_weapon: Option<&'a str>,
    weapons: BTreeMap<&'a str, u64>,
    killers: BTreeMap<&'a str, u64>,
    suicide_weapons: BTreeMap<&'a str, u64>,
    last_kill: Option<i64>,
    last_death: Option<i64>,
    last_suicide: Option<i64>,
}

#[derive(Debug, Default)]
struct WeaponTally<'a> {
    kills: u64,
    measured: u64,
    total_meters: u64,
    users: BTreeSet<&'a str>,
    last_used: Option<i64>,
}

/// Ranked views over one wipe's kill events.
///
/// Events are canonicalized on construction: any party carrying a Steam id
/// with a known identity is renamed to that identity's current name, so a
/// player who changed names mid-wipe ranks as one entity.
#[derive(Debug, Clone)]
pub struct LeaderboardAggregator {
    events: Vec<KillEvent>,
}

impl LeaderboardAggregator {
    pub fn new(events: Vec<KillEvent>, identities: &[PlayerIdentity]) -> Self {
        let canonical: HashMap<&str, &str> = identities
            .iter()
            .map(|identity| (identity.steam_id.as_str(), identity.current_name.as_str()))
            .collect();
        let events = events
            .into_iter()
            .map(|mut event| {
                if let Some(name) = event
                    .killer_steam_id
                    .as_ref()
                    .and_then(|id| canonical.get(id.as_str()))
                {
                    event.killer_name = name.to_string();
                }
                if let Some(name) = event
                    .victim_steam_id
                    .as_ref()
                    .and_then(|id| canonical.get(id.as_str()))
                {
                    event.victim_name = name.to_string();
                }
                event
            })
            .collect();
        Self { events }
    }

    pub fn events(&self) -> &[KillEvent] {
        &self.events
    }

    pub fn leaderboard(&self, category: LeaderboardCategory, limit: usize) -> Vec<LeaderboardEntry> {
        match category {
            LeaderboardCategory::MostKills => self.most_kills(limit),
            LeaderboardCategory::LongestShots => self.longest_shots(limit),
            LeaderboardCategory::MostDeaths => self.most_deaths(limit),
            LeaderboardCategory::KdRatio => self.kd_ratio(limit),
            LeaderboardCategory::MrRespawn => self.mr_respawn(limit),
            LeaderboardCategory::WeaponMeta => self.weapon_meta(limit),
        }
    }

    pub fn most_kills(&self, limit: usize) -> Vec<LeaderboardEntry> {
        let rows = self
            .tallies()
            .into_iter()
            .filter(|(_, tally)| tally.kills > 0)
            .map(|(name, tally)| {
                let entry = entry(
                    name,
                    LeaderboardValue::Count(tally.kills),
                    format!("{}m shot", tally.longest_shot),
                    modal(&tally.weapons).unwrap_or(NO_FAVORITE).to_string(),
                    tally.last_kill,
                    LeaderboardCategory::MostKills,
                );
                (tally.kills, entry)
            })
            .collect();
        rank(rows, limit)
    }

    pub fn longest_shots(&self, limit: usize) -> Vec<LeaderboardEntry> {
        let rows = self
            .tallies()
            .into_iter()
            .filter(|(_, tally)| tally.longest_shot > 0)
            .map(|(name, tally)| {
                let entry = entry(
                    name,
                    LeaderboardValue::Text(format!("{}m", tally.longest_shot)),
                    tally.longest_weapon.unwrap_or(NO_FAVORITE).to_string(),
                    format!("{}m shot", tally.longest_shot),
                    tally.last_kill,
                    LeaderboardCategory::LongestShots,
                );
                (tally.longest_shot, entry)
            })
            .collect();
        rank(rows, limit)
    }

    pub fn most_deaths(&self, limit: usize) -> Vec<LeaderboardEntry> {
        let rows = self
            .tallies()
            .into_iter()
            .filter(|(_, tally)| tally.deaths > 0)
            .map(|(name, tally)| {
                let entry = entry(
                    name,
                    LeaderboardValue::Count(tally.deaths),
                    "deaths".to_string(),
                    modal(&tally.killers).unwrap_or(NO_FAVORITE).to_string(),
                    tally.last_death,
                    LeaderboardCategory::MostDeaths,
                );
                (tally.deaths, entry)
            })
            .collect();
        rank(rows, limit)
    }

    pub fn kd_ratio(&self, limit: usize) -> Vec<LeaderboardEntry> {
        let rows = self
            .tallies()
            .into_iter()
            .filter(|(_, tally)| tally.kills > 0 || tally.deaths > 0)
            .map(|(name, tally)| {
                let ratio = kd_ratio(tally.kills, tally.deaths);
                let entry = entry(
                    name,
                    LeaderboardValue::Text(format!("{:.2}", ratio)),
                    format!("{}K/{}D", tally.kills, tally.deaths),
                    kd_tier(ratio).to_string(),
                    latest(tally.last_kill, tally.last_death),
                    LeaderboardCategory::KdRatio,
                );
                ((ratio * 1000.0).round() as i64, entry)
            })
            .collect();
        rank(rows, limit)
    }

    pub fn mr_respawn(&self, limit: usize) -> Vec<LeaderboardEntry> {
        let rows = self
            .tallies()
            .into_iter()
            .filter(|(_, tally)| tally.suicides > 0)
            .map(|(name, tally)| {
                let entry = entry(
                    name,
                    LeaderboardValue::Count(tally.suicides),
                    "suicides".to_string(),
                    modal(&tally.suicide_weapons)
                        .unwrap_or(SELF_HARM_DEFAULT)
                        .to_string(),
                    tally.last_suicide,
                    LeaderboardCategory::MrRespawn,
                );
                (tally.suicides, entry)
            })
            .collect();
        rank(rows, limit)
    }

    pub fn weapon_meta(&self, limit: usize) -> Vec<LeaderboardEntry> {
        self.weapon_stats(limit)
            .into_iter()
            .enumerate()
            .map(|(idx, stat)| LeaderboardEntry {
                rank: idx + 1,
                player_name: stat.weapon,
                value: LeaderboardValue::Count(stat.kills),
                secondary_value: format!("avg {}m", stat.average_distance),
                details: format!("{} users", stat.unique_users),
                last_activity: stat.last_used,
                category: LeaderboardCategory::WeaponMeta,
            })
            .collect()
    }

    /// Non-suicide kills grouped by weapon. The average only covers kills
    /// with a measured distance.
    pub fn weapon_stats(&self, limit: usize) -> Vec<WeaponStat> {
        let mut weapons: BTreeMap<&str, WeaponTally> = BTreeMap::new();
        for event in self.events.iter().filter(|e| !is_self_inflicted(e)) {
            let tally = weapons.entry(event.weapon.as_str()).or_default();
            tally.kills += 1;
            if event.distance.is_known() {
                tally.measured += 1;
                tally.total_meters += u64::from(event.distance.meters());
            }
            tally.users.insert(event.killer_name.as_str());
            tally.last_used = latest(tally.last_used, Some(event.occurred_at));
        }

        let mut stats: Vec<WeaponStat> = weapons
            .into_iter()
            .map(|(weapon, tally)| WeaponStat {
                weapon: weapon.to_string(),
                kills: tally.kills,
                average_distance: if tally.measured == 0 {
                    0
                } else {
                    (tally.total_meters as f64 / tally.measured as f64).round() as u32
                },
                unique_users: tally.users.len(),
                last_used: tally.last_used.map(millis_to_rfc3339),
            })
            .collect();
        stats.sort_by(|a, b| b.kills.cmp(&a.kills));
        stats.truncate(limit);
        stats
    }

    /// (qualifying kills, self-inflicted deaths). Together they cover every event.
    pub fn kill_totals(&self) -> (u64, u64) {
        self.events.iter().fold((0, 0), |(kills, suicides), event| {
            if is_self_inflicted(event) {
                (kills, suicides + 1)
            } else {
                (kills + 1, suicides)
            }
        })
    }

    /// Case-insensitive exact match against the canonical names in play.
    pub fn resolve_name(&self, query: &str) -> Option<String> {
        let query = query.trim();
        self.events
            .iter()
            .flat_map(|event| [event.killer_name.as_str(), event.victim_name.as_str()])
            .find(|name| name.eq_ignore_ascii_case(query))
            .map(ToString::to_string)
    }

    pub fn player_profile(
        &self,
        name: &str,
        identity: Option<&PlayerIdentity>,
        suicides: u64,
    ) -> Option<PlayerProfile> {
        let tallies = self.tallies();
        let tally = tallies.get(name);
        if tally.is_none() && identity.is_none() {
            return None;
        }

        let (kills, deaths, longest, favorite, last) = match tally {
            Some(t) => (
                t.kills,
                t.deaths,
                t.longest_shot,
                modal(&t.weapons).unwrap_or(NO_FAVORITE),
                latest(t.last_kill, t.last_death),
            ),
            None => (0, 0, 0, NO_FAVORITE, None),
        };

        Some(PlayerProfile {
            player_name: name.to_string(),
            steam_id: identity.map(|i| i.steam_id.to_string()),
            previous_names: identity.map(|i| i.previous_names.clone()).unwrap_or_default(),
            statistics: PlayerStatistics {
                total_kills: kills,
                total_deaths: deaths,
                kd_ratio: kd_ratio(kills, deaths),
                longest_shot: longest,
                favorite_weapon: favorite.to_string(),
                suicides,
            },
            last_activity: last.map(millis_to_rfc3339),
        })
    }

    fn tallies(&self) -> BTreeMap<&str, PlayerTally<'_>> {
        let mut out: BTreeMap<&str, PlayerTally<'_>> = BTreeMap::new();
        for event in &self.events {
            let self_inflicted = is_self_inflicted(event);

            let victim = out.entry(event.victim_name.as_str()).or_default();
            victim.deaths += 1;
            *victim.killers.entry(event.killer_name.as_str()).or_insert(0) += 1;
            victim.last_death = latest(victim.last_death, Some(event.occurred_at));
            if self_inflicted {
                victim.suicides += 1;
                *victim.suicide_weapons.entry(event.weapon.as_str()).or_insert(0) += 1;
                victim.last_suicide = latest(victim.last_suicide, Some(event.occurred_at));
                continue;
            }

            let killer = out.entry(event.killer_name.as_str()).or_default();
            killer.kills += 1;
            *killer.weapons.entry(event.weapon.as_str()).or_insert(0) += 1;
            let meters = event.distance.meters();
            if meters > killer.longest_shot {
                killer.longest_shot = meters;
                killer.longest_weapon = Some(event.weapon.as_str());
            }
            killer.last_kill = latest(killer.last_kill, Some(event.occurred_at));
        }
        out
    }
}

/// Kills over deaths rounded to three places; with no deaths the ratio is the kill count.
pub fn kd_ratio(kills: u64, deaths: u64) -> f64 {
    if deaths == 0 {
        return kills as f64;
    }
    (kills as f64 / deaths as f64 * 1000.0).round() / 1000.0
}

fn kd_tier(ratio: f64) -> &'static str {
    if ratio >= 2.0 {
        "Elite PvP"
    } else if ratio >= 1.0 {
        "Positive"
    } else {
        "Learning"
    }
}

fn entry(
    name: &str,
    value: LeaderboardValue,
    secondary_value: String,
    details: String,
    last_activity: Option<i64>,
    category: LeaderboardCategory,
) -> LeaderboardEntry {
    LeaderboardEntry {
        rank: 0,
        player_name: name.to_string(),
        value,
        secondary_value,
        details,
        last_activity: last_activity.map(millis_to_rfc3339),
        category,
    }
}

/// Stable sort by key, descending; equal keys keep the alphabetical input order.
fn rank<K: Ord>(mut rows: Vec<(K, LeaderboardEntry)>, limit: usize) -> Vec<LeaderboardEntry> {
    rows.sort_by(|a, b| b.0.cmp(&a.0));
    rows.into_iter()
        .take(limit)
        .enumerate()
        .map(|(idx, (_, mut entry))| {
            entry.rank = idx + 1;
            entry
        })
        .collect()
}

/// Most frequent key; ties go to the alphabetically first.
fn modal<'a>(counts: &BTreeMap<&'a str, u64>) -> Option<&'a str> {
    let mut best: Option<(&'a str, u64)> = None;
    for (key, count) in counts {
        if best.map_or(true, |(_, top)| *count > top) {
            best = Some((*key, *count));
        }
    }
    best.map(|(key, _)| key)
}

fn latest(current: Option<i64>, candidate: Option<i64>) -> Option<i64> {
    match (current, candidate) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::{Distance, SteamId};

    fn kill(killer: &str, victim: &str, weapon: &str, meters: u32, at: i64) -> KillEvent {
        KillEvent {
            id: format!("{}-{}-{}", killer, victim, at),
            killer_name: killer.to_string(),
            victim_name: victim.to_string(),
            weapon: weapon.to_string(),
            distance: Distance::Meters(meters),
            killer_steam_id: None,
            victim_steam_id: None,
            wipe_epoch: "wipe_1".to_string(),
            occurred_at: at,
        }
    }

    fn suicide(player: &str, weapon: &str, at: i64) -> KillEvent {
        KillEvent {
            distance: Distance::Suicide,
            ..kill(player, player, weapon, 0, at)
        }
    }

    fn sample() -> LeaderboardAggregator {
        LeaderboardAggregator::new(
            vec![
                kill("Alice", "Bob", "AKM", 350, 1),
                kill("Alice", "Carol", "AKM", 120, 2),
                kill("Alice", "Bob", "M4A1", 90, 3),
                kill("Bob", "Alice", "Mosin", 420, 4),
                kill("Carol", "Bob", "Fall Damage", 0, 5),
                suicide("Bob", "Self-inflicted", 6),
                suicide("Bob", "Self-inflicted", 7),
                kill("Dave", "Carol", "CR-75", 0, 8),
            ],
            &[],
        )
    }

    fn count(entry: &LeaderboardEntry) -> u64 {
        match entry.value {
            LeaderboardValue::Count(n) => n,
            LeaderboardValue::Text(_) => panic!("expected count"),
        }
    }

    #[test]
    fn most_kills_excludes_self_harm() {
        let board = sample().most_kills(10);
        assert_eq!(board[0].player_name, "Alice");
        assert_eq!(count(&board[0]), 3);
        assert_eq!(board[0].secondary_value, "350m shot");
        assert_eq!(board[0].details, "AKM");
        assert_eq!(board[0].rank, 1);
        let names: Vec<&str> = board.iter().map(|e| e.player_name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob", "Dave"]);
    }

    #[test]
    fn kill_and_suicide_buckets_cover_every_event() {
        let aggregator = sample();
        let ranked: u64 = aggregator.most_kills(usize::MAX).iter().map(count).sum();
        let (kills, suicides) = aggregator.kill_totals();
        assert_eq!(ranked, kills);
        assert_eq!(kills + suicides, aggregator.events().len() as u64);
        assert_eq!(suicides, 3);
    }

    #[test]
    fn longest_shots_reports_the_weapon_of_that_shot() {
        let board = sample().longest_shots(10);
        assert_eq!(board[0].player_name, "Bob");
        assert_eq!(board[0].value, LeaderboardValue::Text("420m".to_string()));
        assert_eq!(board[0].secondary_value, "Mosin");
        assert_eq!(board[1].player_name, "Alice");
        assert_eq!(board[1].details, "350m shot");
        assert!(board.iter().all(|e| e.player_name != "Dave"));
    }

    #[test]
    fn most_deaths_counts_suicides_too() {
        let board = sample().most_deaths(10);
        assert_eq!(board[0].player_name, "Bob");
        assert_eq!(count(&board[0]), 5);
        assert_eq!(board[0].details, "Alice");
    }

    #[test]
    fn kd_ratio_with_no_deaths_is_kill_count() {
        let aggregator = LeaderboardAggregator::new(
            (0..5).map(|i| kill("Ace", &format!("V{}", i), "AKM", 10, i)).collect(),
            &[],
        );
        let board = aggregator.kd_ratio(10);
        assert_eq!(board[0].player_name, "Ace");
        assert_eq!(board[0].value, LeaderboardValue::Text("5.00".to_string()));
        assert_eq!(board[0].secondary_value, "5K/0D");
        assert_eq!(board[0].details, "Elite PvP");
        assert_eq!(kd_ratio(5, 0), 5.0);
        assert_eq!(kd_ratio(2, 3), 0.667);
    }

    #[test]
    fn mr_respawn_is_the_inverse_of_the_kill_filter() {
        let board = sample().mr_respawn(10);
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].player_name, "Bob");
        assert_eq!(count(&board[0]), 3);
        assert_eq!(board[0].details, "Self-inflicted");
    }

    #[test]
    fn weapon_meta_averages_measured_distances() {
        let stats = sample().weapon_stats(10);
        assert_eq!(stats[0].weapon, "AKM");
        assert_eq!(stats[0].kills, 2);
        assert_eq!(stats[0].average_distance, 235);
        assert_eq!(stats[0].unique_users, 1);
        assert!(stats.iter().all(|s| s.weapon != "Fall Damage"));
        let entries = sample().weapon_meta(10);
        assert_eq!(entries[0].secondary_value, "avg 235m");
        assert_eq!(entries[0].details, "1 users");
    }

    #[test]
    fn renamed_players_aggregate_under_their_current_name() {
        let steam_id = SteamId::parse("76561198000000002").expect("steam id");
        let mut first = kill("OldAlice", "Bob", "AKM", 10, 1);
        first.killer_steam_id = Some(steam_id.clone());
        let mut second = kill("Alice", "Carol", "AKM", 20, 2);
        second.killer_steam_id = Some(steam_id.clone());
        let mut identity = PlayerIdentity::new(steam_id, "OldAlice", 1, "wipe_1");
        identity.observe("Alice", 2);

        let aggregator = LeaderboardAggregator::new(vec![first, second], &[identity.clone()]);
        let board = aggregator.most_kills(10);
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].player_name, "Alice");
        assert_eq!(count(&board[0]), 2);

        let profile = aggregator
            .player_profile("Alice", Some(&identity), 0)
            .expect("profile");
        assert_eq!(profile.statistics.total_kills, 2);
        assert_eq!(profile.previous_names, vec!["OldAlice"]);
        assert_eq!(aggregator.resolve_name("alice"), Some("Alice".to_string()));
    }

    #[test]
    fn ties_keep_alphabetical_order() {
        let aggregator = LeaderboardAggregator::new(
            vec![kill("Zed", "A", "AKM", 5, 1), kill("Amy", "B", "AKM", 5, 2)],
            &[],
        );
        let names: Vec<String> = aggregator
            .most_kills(10)
            .into_iter()
            .map(|e| e.player_name)
            .collect();
        assert_eq!(names, vec!["Amy", "Zed"]);
    }
}
