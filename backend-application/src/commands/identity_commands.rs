use tracing::info;

use backend_domain::{PlayerIdentity, SteamId};

use crate::{AppError, AppState};

/// Canonical name for a party without touching stored identities.
pub async fn resolve(
    state: &AppState,
    steam_id: Option<&SteamId>,
    observed_name: &str,
) -> Result<String, AppError> {
    let Some(steam_id) = steam_id else {
        return Ok(observed_name.to_string());
    };
    let identity = state
        .identity_repo
        .fetch_identity(steam_id, state.wipe())
        .await?;
    Ok(identity
        .map(|identity| identity.current_name)
        .unwrap_or_else(|| observed_name.to_string()))
}

/// Records one sighting of a party and returns its canonical name.
///
/// Without a Steam id there is nothing to consolidate. A new Steam id creates
/// an identity; a known one adopts the observed spelling and keeps the
/// superseded name in its history.
pub async fn record_sighting(
    state: &AppState,
    steam_id: Option<&SteamId>,
    observed_name: &str,
    seen_at: i64,
) -> Result<String, AppError> {
    let Some(steam_id) = steam_id else {
        return Ok(observed_name.to_string());
    };

    let wipe = state.wipe();
    let identity = match state.identity_repo.fetch_identity(steam_id, wipe).await? {
        Some(mut identity) => {
            let previous = identity.current_name.clone();
            if identity.observe(observed_name, seen_at) {
                info!(
                    "player {} renamed from '{}' to '{}'",
                    steam_id, previous, identity.current_name
                );
            }
            identity
        }
        None => PlayerIdentity::new(steam_id.clone(), observed_name, seen_at, wipe),
    };
    state.identity_repo.save_identity(&identity).await?;
    Ok(identity.current_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::memory_state;

    #[tokio::test]
    async fn sightings_converge_on_latest_name() {
        let state = memory_state();
        let steam_id = SteamId::parse("76561198000000001").expect("steam id");

        for (at, name) in ["Bob", "Bobby", "Bobby", "Robert"].iter().enumerate() {
            let canonical = record_sighting(&state, Some(&steam_id), name, at as i64)
                .await
                .expect("sighting");
            assert_eq!(canonical, *name);
        }

        let identity = state
            .identity_repo
            .fetch_identity(&steam_id, "wipe_1")
            .await
            .expect("fetch")
            .expect("identity");
        assert_eq!(identity.current_name, "Robert");
        assert_eq!(identity.previous_names, vec!["Bob", "Bobby"]);
        assert_eq!(
            resolve(&state, Some(&steam_id), "Bob").await.expect("resolve"),
            "Robert"
        );
    }

    #[tokio::test]
    async fn parties_without_steam_id_keep_observed_name() {
        let state = memory_state();
        let canonical = record_sighting(&state, None, "Drifter", 1).await.expect("sighting");
        assert_eq!(canonical, "Drifter");
        assert!(state
            .identity_repo
            .fetch_identities("wipe_1")
            .await
            .expect("fetch")
            .is_empty());
    }
}
