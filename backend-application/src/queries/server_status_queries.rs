use backend_domain::{current_millis, ServerStatsView};

use crate::AppState;

pub async fn server_stats(state: &AppState) -> ServerStatsView {
    let snapshot = state.status.snapshot().await;
    snapshot.to_view(current_millis(), state.stale_after_ms())
}
