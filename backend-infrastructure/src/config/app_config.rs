use std::env;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use backend_domain::{DbConfig, RuntimeConfig, StorageBackend, WipeEpoch, DEFAULT_WIPE_EPOCH};

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub admin_token: Option<String>,
    pub storage_backend: String,
    pub clickhouse_url: String,
    pub clickhouse_database: String,
    pub clickhouse_user: Option<String>,
    pub clickhouse_password: Option<String>,
    pub wipe_epoch: String,
    pub max_players: u32,
    pub status_stale_seconds: u64,
    pub kill_feed_default_limit: usize,
    pub cleanup_interval_seconds: u64,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:5000".to_string(),
            admin_token: None,
            storage_backend: "clickhouse".to_string(),
            clickhouse_url: "http://127.0.0.1:8123".to_string(),
            clickhouse_database: "killboard".to_string(),
            clickhouse_user: None,
            clickhouse_password: None,
            wipe_epoch: DEFAULT_WIPE_EPOCH.to_string(),
            max_players: 30,
            status_stale_seconds: 300,
            kill_feed_default_limit: 50,
            cleanup_interval_seconds: 300,
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 15,
        }
    }
}

impl AppConfig {
    pub async fn load() -> Result<Self> {
        let path = env::var("KILLBOARD_CONFIG").unwrap_or_else(|_| "./config.toml".to_string());
        let file_path = Path::new(&path);
        let mut config = if file_path.exists() {
            let content = fs::read_to_string(file_path).await?;
            toml::from_str(&content)?
        } else {
            warn!("{} not found, using defaults", path);
            AppConfig::default()
        };
        config.apply_env_overrides();
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn normalize(&mut self) {
        blank_to_none(&mut self.admin_token);
        blank_to_none(&mut self.clickhouse_user);
        blank_to_none(&mut self.clickhouse_password);
        self.storage_backend = self.storage_backend.trim().to_ascii_lowercase();
        self.wipe_epoch = self.wipe_epoch.trim().to_string();
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|err| anyhow!("invalid bind_addr: {}", err))?;
        if self.max_body_bytes == 0 {
            return Err(anyhow!("max_body_bytes must be greater than 0"));
        }
        if self.wipe_epoch.is_empty() {
            return Err(anyhow!("wipe_epoch must not be empty"));
        }
        if StorageBackend::parse(&self.storage_backend).is_none() {
            return Err(anyhow!(
                "unknown storage_backend '{}', expected clickhouse or memory",
                self.storage_backend
            ));
        }
        if self.max_players == 0 {
            return Err(anyhow!("max_players must be greater than 0"));
        }
        Ok(())
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: self.bind_addr.clone(),
            admin_token: self.admin_token.clone(),
            wipe_epoch: WipeEpoch::from(self.wipe_epoch.as_str()),
            max_players: self.max_players,
            status_stale_seconds: self.status_stale_seconds,
            kill_feed_default_limit: self.kill_feed_default_limit,
            cleanup_interval_seconds: self.cleanup_interval_seconds,
            max_body_bytes: self.max_body_bytes,
            request_timeout_seconds: self.request_timeout_seconds,
        }
    }

    pub fn to_db_config(&self) -> DbConfig {
        DbConfig {
            storage_backend: StorageBackend::parse(&self.storage_backend)
                .unwrap_or(StorageBackend::Clickhouse),
            clickhouse_url: self.clickhouse_url.clone(),
            clickhouse_database: self.clickhouse_database.clone(),
            clickhouse_user: self.clickhouse_user.clone(),
            clickhouse_password: self.clickhouse_password.clone(),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = env::var("KILLBOARD_BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Ok(value) = env::var("KILLBOARD_ADMIN_TOKEN") {
            self.admin_token = Some(value);
        }
        if let Ok(value) = env::var("KILLBOARD_STORAGE_BACKEND") {
            self.storage_backend = value;
        }
        if let Ok(value) = env::var("KILLBOARD_CLICKHOUSE_URL") {
            self.clickhouse_url = value;
        }
        if let Ok(value) = env::var("KILLBOARD_CLICKHOUSE_DATABASE") {
            self.clickhouse_database = value;
        }
        if let Ok(value) = env::var("KILLBOARD_CLICKHOUSE_USER") {
            self.clickhouse_user = Some(value);
        }
        if let Ok(value) = env::var("KILLBOARD_CLICKHOUSE_PASSWORD") {
            self.clickhouse_password = Some(value);
        }
        if let Ok(value) = env::var("KILLBOARD_WIPE_EPOCH") {
            self.wipe_epoch = value;
        }
        if let Ok(value) = env::var("KILLBOARD_MAX_PLAYERS") {
            self.max_players = value.parse().unwrap_or(self.max_players);
        }
        if let Ok(value) = env::var("KILLBOARD_STATUS_STALE_SECONDS") {
            self.status_stale_seconds = value.parse().unwrap_or(self.status_stale_seconds);
        }
        if let Ok(value) = env::var("KILLBOARD_KILL_FEED_DEFAULT_LIMIT") {
            self.kill_feed_default_limit = value.parse().unwrap_or(self.kill_feed_default_limit);
        }
        if let Ok(value) = env::var("KILLBOARD_CLEANUP_INTERVAL_SECONDS") {
            self.cleanup_interval_seconds = value.parse().unwrap_or(self.cleanup_interval_seconds);
        }
        if let Ok(value) = env::var("KILLBOARD_MAX_BODY_BYTES") {
            self.max_body_bytes = value.parse().unwrap_or(self.max_body_bytes);
        }
        if let Ok(value) = env::var("KILLBOARD_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.parse().unwrap_or(self.request_timeout_seconds);
        }
    }
}

fn blank_to_none(value: &mut Option<String>) {
    if value.as_deref().is_some_and(|inner| inner.trim().is_empty()) {
        *value = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config = AppConfig::default();
        config.validate().expect("defaults are valid");
        let runtime = config.to_runtime_config();
        assert_eq!(runtime.wipe_epoch.as_str(), "wipe_1");
        assert_eq!(runtime.max_players, 30);
        assert_eq!(config.to_db_config().storage_backend, StorageBackend::Clickhouse);
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let mut config: AppConfig = toml::from_str(
            r#"
bind_addr = "0.0.0.0:8080"
admin_token = "  "
storage_backend = " Memory "
wipe_epoch = "wipe_7"
"#,
        )
        .expect("parse config");
        config.normalize();
        config.validate().expect("valid");
        assert_eq!(config.admin_token, None);
        assert_eq!(config.to_db_config().storage_backend, StorageBackend::Memory);
        assert_eq!(config.to_runtime_config().wipe_epoch.as_str(), "wipe_7");
        assert_eq!(config.clickhouse_database, "killboard");
        assert_eq!(config.kill_feed_default_limit, 50);
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = AppConfig {
            storage_backend: "postgres".to_string(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());

        config.storage_backend = "memory".to_string();
        config.wipe_epoch = "   ".to_string();
        config.normalize();
        assert!(config.validate().is_err());

        config.wipe_epoch = "wipe_2".to_string();
        config.max_players = 0;
        assert!(config.validate().is_err());

        config.max_players = 60;
        config.bind_addr = "not-an-addr".to_string();
        assert!(config.validate().is_err());
    }
}
