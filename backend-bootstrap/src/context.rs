use std::sync::Arc;

use anyhow::Result;
use clickhouse::Client;
use tracing::{info, warn};

use backend_application::ops::ServerStatusCell;
use backend_application::{AppState, Metrics};
use backend_domain::ports::{
    ActivityRepository, IdentityRepository, KillEventRepository, SuicideRepository,
};
use backend_domain::{DbConfig, RuntimeConfig, StorageBackend};
use backend_infrastructure::{AppConfig, ClickhouseRepo, DefaultHealthService, MemoryRepo};

pub struct AppContext {
    pub state: AppState,
}

impl AppContext {
    pub async fn new() -> Result<Self> {
        let config = AppConfig::load().await?;
        let runtime_config = config.to_runtime_config();
        let db_config = config.to_db_config();

        let state = match db_config.storage_backend {
            StorageBackend::Clickhouse => {
                let repo = Arc::new(ClickhouseRepo::new(
                    clickhouse_client(&db_config),
                    db_config.clickhouse_database.clone(),
                ));
                repo.ensure_schema().await?;
                info!(
                    "using clickhouse store at {} ({})",
                    db_config.clickhouse_url, db_config.clickhouse_database
                );
                assemble(repo, runtime_config)
            }
            StorageBackend::Memory => {
                warn!("using in-memory store, data is lost on restart");
                assemble(Arc::new(MemoryRepo::default()), runtime_config)
            }
        };

        Ok(Self { state })
    }
}

fn clickhouse_client(db_config: &DbConfig) -> Client {
    let mut clickhouse = Client::default()
        .with_url(&db_config.clickhouse_url)
        .with_database(&db_config.clickhouse_database);
    if let Some(user) = &db_config.clickhouse_user {
        clickhouse = clickhouse.with_user(user);
    }
    if let Some(password) = &db_config.clickhouse_password {
        clickhouse = clickhouse.with_password(password);
    }
    clickhouse
}

fn assemble<R>(repo: Arc<R>, config: RuntimeConfig) -> AppState
where
    R: KillEventRepository + IdentityRepository + SuicideRepository + ActivityRepository + 'static,
{
    AppState {
        status: Arc::new(ServerStatusCell::new(config.max_players)),
        config,
        kill_repo: repo.clone(),
        identity_repo: repo.clone(),
        suicide_repo: repo.clone(),
        activity_repo: repo.clone(),
        health: Arc::new(DefaultHealthService::new(repo)),
        metrics: Arc::new(Metrics::default()),
    }
}
