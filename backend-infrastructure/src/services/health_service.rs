use std::sync::Arc;

use async_trait::async_trait;
use backend_domain::ports::{HealthCheckService, KillEventRepository};

pub struct DefaultHealthService {
    kill_repo: Arc<dyn KillEventRepository>,
}

impl DefaultHealthService {
    pub fn new(kill_repo: Arc<dyn KillEventRepository>) -> Self {
        Self { kill_repo }
    }
}

#[async_trait]
impl HealthCheckService for DefaultHealthService {
    async fn check_database(&self) -> anyhow::Result<bool> {
        self.kill_repo.ping().await.map(|_| true)
    }
}
