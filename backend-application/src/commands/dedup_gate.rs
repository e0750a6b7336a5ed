use backend_domain::KillEvent;

use crate::{AppError, AppState};

/// True when the event is not yet stored for its wipe.
///
/// Matching is on the exact (killer, victim, weapon, distance, timestamp)
/// tuple; the upstream notifier carries no event id. Check and insert are two
/// separate store calls, so two deliveries racing past the check can both land.
pub async fn admit(state: &AppState, event: &KillEvent) -> Result<bool, AppError> {
    let duplicate = state.kill_repo.has_duplicate(&event.dedup_key()).await?;
    Ok(!duplicate)
}
