use std::sync::Arc;

use backend_domain::ports::{
    ActivityRepository, HealthCheckService, IdentityRepository, KillEventRepository,
    SuicideRepository,
};
use backend_domain::RuntimeConfig;

use crate::ops::ServerStatusCell;
use crate::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub kill_repo: Arc<dyn KillEventRepository>,
    pub identity_repo: Arc<dyn IdentityRepository>,
    pub suicide_repo: Arc<dyn SuicideRepository>,
    pub activity_repo: Arc<dyn ActivityRepository>,
    pub health: Arc<dyn HealthCheckService>,
    pub status: Arc<ServerStatusCell>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn wipe(&self) -> &str {
        self.config.wipe_epoch.as_str()
    }

    pub fn stale_after_ms(&self) -> i64 {
        i64::try_from(self.config.status_stale_seconds.saturating_mul(1000)).unwrap_or(i64::MAX)
    }
}
