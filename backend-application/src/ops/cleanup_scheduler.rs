use std::time::Duration;

use tracing::{error, info};

use crate::commands::admin_commands;
use crate::AppState;

/// Periodically drops unidentified kill rows and repairs self-inflicted
/// defaults. An interval of zero disables the task.
pub async fn schedule_cleanup(state: AppState) {
    let interval = state.config.cleanup_interval_seconds;
    if interval == 0 {
        info!("scheduled cleanup disabled");
        return;
    }

    loop {
        tokio::time::sleep(Duration::from_secs(interval)).await;

        match admin_commands::cleanup_invalid(&state).await {
            Ok(report) if report.deleted_entries > 0 || report.repaired_entries > 0 => {
                info!(
                    "scheduled cleanup removed {} and repaired {} kill rows",
                    report.deleted_entries, report.repaired_entries
                );
            }
            Ok(_) => {}
            Err(err) => error!("scheduled cleanup failed: {}", err),
        }
    }
}
