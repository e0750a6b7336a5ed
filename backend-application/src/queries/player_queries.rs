use backend_domain::{
    is_profile_steam_id, LeaderboardAggregator, PlayerEventView, PlayerIdentity, PlayerProfile,
    SteamId, SuicideCounter,
};

use crate::queries::leaderboard_queries::load_aggregator;
use crate::{AppError, AppState};

const DEFAULT_EVENT_LIMIT: usize = 50;
const MAX_EVENT_LIMIT: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Name,
    SteamId,
}

impl SearchKind {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|value| value.trim().to_ascii_lowercase()) {
            Some(value) if value == "steamid" => SearchKind::SteamId,
            _ => SearchKind::Name,
        }
    }
}

pub async fn search_players(
    state: &AppState,
    query: &str,
    kind: SearchKind,
) -> Result<Vec<PlayerProfile>, AppError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(AppError::BadRequest("search query is required".to_string()));
    }
    if kind == SearchKind::SteamId && !is_profile_steam_id(query) {
        return Err(AppError::BadRequest("invalid Steam ID format".to_string()));
    }

    let wipe = state.wipe();
    let aggregator = load_aggregator(state).await?;
    let identities = state.identity_repo.fetch_identities(wipe).await?;
    let counters = state.suicide_repo.fetch_counters(wipe).await?;

    let profile = match kind {
        SearchKind::SteamId => profile_by_steam_id(&aggregator, &identities, &counters, query),
        SearchKind::Name => profile_by_name(&aggregator, &identities, &counters, query),
    };
    Ok(profile.into_iter().collect())
}

/// Single profile for a name or Steam id; `None` when nothing matches.
pub async fn player_stats(
    state: &AppState,
    player: &str,
) -> Result<Option<PlayerProfile>, AppError> {
    let player = player.trim();
    if player.is_empty() {
        return Err(AppError::BadRequest("player is required".to_string()));
    }
    let kind = if is_profile_steam_id(player) {
        SearchKind::SteamId
    } else {
        SearchKind::Name
    };
    Ok(search_players(state, player, kind).await?.into_iter().next())
}

pub async fn recent_player_events(
    state: &AppState,
    limit: Option<usize>,
) -> Result<Vec<PlayerEventView>, AppError> {
    let limit = limit.unwrap_or(DEFAULT_EVENT_LIMIT).clamp(1, MAX_EVENT_LIMIT);
    let events = state.activity_repo.fetch_player_events(limit).await?;
    Ok(events.iter().map(|event| event.to_view()).collect())
}

fn profile_by_steam_id(
    aggregator: &LeaderboardAggregator,
    identities: &[PlayerIdentity],
    counters: &[SuicideCounter],
    query: &str,
) -> Option<PlayerProfile> {
    let steam_id = SteamId::parse(query)?;
    let identity = identities.iter().find(|identity| identity.steam_id == steam_id)?;
    let suicides = suicide_count(counters, &identity.current_name, Some(&steam_id));
    aggregator.player_profile(&identity.current_name, Some(identity), suicides)
}

/// Exact, case-insensitive name match. A former name resolves to the
/// identity's current name.
fn profile_by_name(
    aggregator: &LeaderboardAggregator,
    identities: &[PlayerIdentity],
    counters: &[SuicideCounter],
    query: &str,
) -> Option<PlayerProfile> {
    let identity = identities
        .iter()
        .find(|identity| identity.current_name.eq_ignore_ascii_case(query))
        .or_else(|| identities.iter().find(|identity| identity.answers_to(query)));
    let name = match identity {
        Some(identity) => identity.current_name.clone(),
        None => aggregator.resolve_name(query)?,
    };
    let suicides = suicide_count(counters, &name, identity.map(|i| &i.steam_id));
    aggregator.player_profile(&name, identity, suicides)
}

fn suicide_count(counters: &[SuicideCounter], name: &str, steam_id: Option<&SteamId>) -> u64 {
    counters
        .iter()
        .filter(|counter| match (steam_id, &counter.steam_id) {
            (Some(wanted), Some(stored)) => wanted == stored,
            _ => counter.player_name == name,
        })
        .map(|counter| counter.count)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend_domain::WebhookPayload;
    use serde_json::json;

    use crate::commands::ingest_commands::process_webhook;
    use crate::state::test_support::memory_state;

    async fn ingest(state: &AppState, killer: &str, victim: &str, details: &str, ts: &str) {
        let payload = WebhookPayload::from_value(json!({
            "embeds": [{
                "title": "Kill / Death Report:",
                "timestamp": ts,
                "fields": [
                    {"name": "Killer", "value": killer},
                    {"name": "Victim", "value": victim},
                    {"name": "Details", "value": details}
                ]
            }]
        }))
        .expect("payload");
        process_webhook(state, payload).await.expect("ingest");
    }

    #[tokio::test]
    async fn steam_id_search_validates_format() {
        let state = memory_state();
        let err = search_players(&state, "12345", SearchKind::SteamId)
            .await
            .expect_err("invalid id");
        assert!(matches!(err, AppError::BadRequest(_)));
        assert!(search_players(&state, "76561198000000001", SearchKind::SteamId)
            .await
            .expect("search")
            .is_empty());
    }

    #[tokio::test]
    async fn former_names_resolve_to_the_consolidated_profile() {
        let state = memory_state();
        ingest(
            &state,
            "Alice\n[76561198000000002]",
            "Bob",
            "with [AKM] from [120] meters",
            "2024-05-01T12:00:00Z",
        )
        .await;
        ingest(
            &state,
            "Alicia\n[76561198000000002]",
            "Carol",
            "with [SVD] from [640] meters",
            "2024-05-01T12:05:00Z",
        )
        .await;
        ingest(
            &state,
            "Suicide",
            "Alicia\n[76561198000000002]",
            "",
            "2024-05-01T12:10:00Z",
        )
        .await;

        let profile = player_stats(&state, "alice")
            .await
            .expect("stats")
            .expect("profile");
        assert_eq!(profile.player_name, "Alicia");
        assert_eq!(profile.steam_id.as_deref(), Some("76561198000000002"));
        assert_eq!(profile.previous_names, vec!["Alice"]);
        assert_eq!(profile.statistics.total_kills, 2);
        assert_eq!(profile.statistics.total_deaths, 1);
        assert_eq!(profile.statistics.longest_shot, 640);
        assert_eq!(profile.statistics.suicides, 1);
        assert_eq!(profile.statistics.kd_ratio, 2.0);

        let by_id = player_stats(&state, "76561198000000002")
            .await
            .expect("stats")
            .expect("profile");
        assert_eq!(by_id.player_name, "Alicia");
    }

    #[tokio::test]
    async fn unknown_player_has_no_profile() {
        let state = memory_state();
        assert!(player_stats(&state, "Nobody").await.expect("stats").is_none());
        assert!(matches!(
            player_stats(&state, "  ").await,
            Err(AppError::BadRequest(_))
        ));
    }
}
