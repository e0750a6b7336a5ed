use tracing::{debug, error};

use backend_domain::{LeaderboardAggregator, LeaderboardCategory, LeaderboardEntry, WeaponStat};

use crate::{AppError, AppState};

const MAX_LEADERBOARD_LIMIT: usize = 10;
const DEFAULT_WEAPON_LIMIT: usize = 10;
const MAX_WEAPON_LIMIT: usize = 50;

pub async fn load_aggregator(state: &AppState) -> Result<LeaderboardAggregator, AppError> {
    let wipe = state.wipe();
    let events = state.kill_repo.fetch_kill_events(wipe).await.map_err(|err| {
        error!("failed to fetch kill events: {}", err);
        AppError::Internal(err)
    })?;
    let identities = state.identity_repo.fetch_identities(wipe).await?;
    Ok(LeaderboardAggregator::new(events, &identities))
}

/// Unknown categories yield an empty board rather than an error.
pub async fn leaderboard(
    state: &AppState,
    category: Option<&str>,
    limit: Option<usize>,
) -> Result<Vec<LeaderboardEntry>, AppError> {
    let key = category.unwrap_or(LeaderboardCategory::MostKills.as_str());
    let Some(category) = LeaderboardCategory::parse(key) else {
        debug!("unknown leaderboard category '{}'", key);
        return Ok(Vec::new());
    };
    let limit = limit
        .unwrap_or(MAX_LEADERBOARD_LIMIT)
        .clamp(1, MAX_LEADERBOARD_LIMIT);
    let aggregator = load_aggregator(state).await?;
    Ok(aggregator.leaderboard(category, limit))
}

pub async fn weapon_meta(
    state: &AppState,
    limit: Option<usize>,
) -> Result<Vec<WeaponStat>, AppError> {
    let limit = limit.unwrap_or(DEFAULT_WEAPON_LIMIT).clamp(1, MAX_WEAPON_LIMIT);
    let aggregator = load_aggregator(state).await?;
    Ok(aggregator.weapon_stats(limit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend_domain::{Distance, KillEvent};

    use crate::state::test_support::memory_state;

    async fn seed(state: &AppState, count: usize) {
        for idx in 0..count {
            let event = KillEvent {
                id: format!("k{}", idx),
                killer_name: format!("Player{:02}", idx),
                victim_name: "Bob".to_string(),
                weapon: "AKM".to_string(),
                distance: Distance::Meters(100),
                killer_steam_id: None,
                victim_steam_id: None,
                wipe_epoch: "wipe_1".to_string(),
                occurred_at: idx as i64,
            };
            state.kill_repo.insert_kill_event(&event).await.expect("insert");
        }
    }

    #[tokio::test]
    async fn limit_is_capped_at_ten() {
        let state = memory_state();
        seed(&state, 14).await;
        let board = leaderboard(&state, Some("most_kills"), Some(50)).await.expect("board");
        assert_eq!(board.len(), 10);
        assert_eq!(board[0].rank, 1);
        assert_eq!(board[9].rank, 10);
    }

    #[tokio::test]
    async fn unknown_category_is_empty() {
        let state = memory_state();
        seed(&state, 2).await;
        assert!(leaderboard(&state, Some("most_hugs"), None).await.expect("board").is_empty());
        let default_board = leaderboard(&state, None, None).await.expect("board");
        assert_eq!(default_board.len(), 2);
    }

    #[tokio::test]
    async fn weapon_meta_groups_by_weapon() {
        let state = memory_state();
        seed(&state, 3).await;
        let stats = weapon_meta(&state, None).await.expect("stats");
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].kills, 3);
        assert_eq!(stats[0].unique_users, 3);
        assert_eq!(stats[0].average_distance, 100);
    }
}
