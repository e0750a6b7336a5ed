use tracing::error;

use backend_domain::{KillFeedEntry, LeaderboardAggregator};

use crate::{AppError, AppState};

const MAX_FEED_LIMIT: usize = 500;

pub async fn recent_kills(
    state: &AppState,
    limit: Option<usize>,
) -> Result<Vec<KillFeedEntry>, AppError> {
    let limit = limit
        .unwrap_or(state.config.kill_feed_default_limit)
        .clamp(1, MAX_FEED_LIMIT);
    let wipe = state.wipe();
    let events = state.kill_repo.fetch_recent(wipe, limit).await.map_err(|err| {
        error!("failed to fetch kill feed: {}", err);
        AppError::Internal(err)
    })?;
    let identities = state.identity_repo.fetch_identities(wipe).await?;

    let feed = LeaderboardAggregator::new(events, &identities)
        .events()
        .iter()
        .map(|event| event.to_feed_entry())
        .collect();
    Ok(feed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend_domain::{Distance, KillEvent};

    use crate::state::test_support::memory_state;

    #[tokio::test]
    async fn feed_is_newest_first_and_clamped() {
        let state = memory_state();
        for at in 1..=3 {
            let event = KillEvent {
                id: format!("k{}", at),
                killer_name: "Alice".to_string(),
                victim_name: "Bob".to_string(),
                weapon: "AKM".to_string(),
                distance: Distance::Meters(10 * at as u32),
                killer_steam_id: None,
                victim_steam_id: None,
                wipe_epoch: "wipe_1".to_string(),
                occurred_at: at,
            };
            state.kill_repo.insert_kill_event(&event).await.expect("insert");
        }

        let feed = recent_kills(&state, Some(2)).await.expect("feed");
        assert_eq!(feed.len(), 2);
        assert_eq!(feed[0].id, "k3");
        assert_eq!(feed[0].distance, "30m");
        assert_eq!(feed[1].id, "k2");

        let feed = recent_kills(&state, Some(0)).await.expect("feed");
        assert_eq!(feed.len(), 1);
    }
}
