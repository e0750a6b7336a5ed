use tracing::{info, warn};

use backend_domain::{CleanupReport, ConsolidationReport, WipeDetails, WipeReport};

use crate::{AppError, AppState};

pub async fn wipe_reset(state: &AppState) -> Result<WipeReport, AppError> {
    let wipe = state.wipe();
    let details = WipeDetails {
        kill_feed: state.kill_repo.delete_wipe(wipe).await?,
        steam_players: state.identity_repo.delete_wipe(wipe).await?,
        suicides: state.suicide_repo.delete_wipe(wipe).await?,
    };
    let deleted_entries = details.kill_feed + details.steam_players + details.suicides;
    warn!(
        "wipe '{}' reset: {} kills, {} identities, {} suicide counters removed",
        wipe, details.kill_feed, details.steam_players, details.suicides
    );
    Ok(WipeReport {
        success: true,
        deleted_entries,
        details,
    })
}

pub async fn cleanup_invalid(state: &AppState) -> Result<CleanupReport, AppError> {
    let wipe = state.wipe();
    let deleted_entries = state.kill_repo.delete_unidentified(wipe).await?;
    let repaired_entries = state.kill_repo.repair_self_inflicted_defaults(wipe).await?;
    if deleted_entries > 0 || repaired_entries > 0 {
        info!(
            "cleanup on '{}': {} unidentified rows deleted, {} self-inflicted rows repaired",
            wipe, deleted_entries, repaired_entries
        );
    }
    Ok(CleanupReport {
        success: true,
        deleted_entries,
        repaired_entries,
    })
}

/// Names are consolidated on read, so this reports how many identities the
/// current wipe tracks.
pub async fn consolidate_players(state: &AppState) -> Result<ConsolidationReport, AppError> {
    let identities = state.identity_repo.fetch_identities(state.wipe()).await?;
    Ok(ConsolidationReport {
        success: true,
        updated_entries: identities.len() as u64,
    })
}
