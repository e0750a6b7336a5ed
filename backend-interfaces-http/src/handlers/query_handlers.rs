use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use backend_application::queries::player_queries::SearchKind;
use backend_application::queries::{
    kill_feed_queries, leaderboard_queries, player_queries, server_status_queries,
};
use backend_application::AppState;
use backend_domain::{
    KillFeedEntry, LeaderboardEntry, PlayerEventView, PlayerProfile, ServerStatsView, WeaponStat,
};

use crate::error::HttpError;

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    pub category: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct PlayerSearchQuery {
    pub query: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PlayerStatsQuery {
    pub player: Option<String>,
}

pub async fn kill_feed(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<KillFeedEntry>>, HttpError> {
    let entries = kill_feed_queries::recent_kills(&state, query.limit).await?;
    Ok(Json(entries))
}

pub async fn leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<Vec<LeaderboardEntry>>, HttpError> {
    let entries =
        leaderboard_queries::leaderboard(&state, query.category.as_deref(), query.limit).await?;
    Ok(Json(entries))
}

pub async fn weapons_meta(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<WeaponStat>>, HttpError> {
    let stats = leaderboard_queries::weapon_meta(&state, query.limit).await?;
    Ok(Json(stats))
}

pub async fn player_search(
    State(state): State<AppState>,
    Query(query): Query<PlayerSearchQuery>,
) -> Result<Json<Vec<PlayerProfile>>, HttpError> {
    let kind = SearchKind::parse(query.kind.as_deref());
    let profiles =
        player_queries::search_players(&state, query.query.as_deref().unwrap_or(""), kind).await?;
    Ok(Json(profiles))
}

pub async fn player_stats(
    State(state): State<AppState>,
    Query(query): Query<PlayerStatsQuery>,
) -> Result<Json<Option<PlayerProfile>>, HttpError> {
    let profile =
        player_queries::player_stats(&state, query.player.as_deref().unwrap_or("")).await?;
    Ok(Json(profile))
}

pub async fn player_events(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<PlayerEventView>>, HttpError> {
    let events = player_queries::recent_player_events(&state, query.limit).await?;
    Ok(Json(events))
}

pub async fn server_stats(State(state): State<AppState>) -> Json<ServerStatsView> {
    Json(server_status_queries::server_stats(&state).await)
}
