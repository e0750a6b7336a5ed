// Runtime configuration projected from the on-disk config

use crate::value_objects::WipeEpoch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Clickhouse,
    Memory,
}

impl StorageBackend {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "clickhouse" => Some(StorageBackend::Clickhouse),
            "memory" => Some(StorageBackend::Memory),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub bind_addr: String,
    pub admin_token: Option<String>,
    pub wipe_epoch: WipeEpoch,
    pub max_players: u32,
    pub status_stale_seconds: u64,
    pub kill_feed_default_limit: usize,
    pub cleanup_interval_seconds: u64,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:5000".to_string(),
            admin_token: None,
            wipe_epoch: WipeEpoch::default(),
            max_players: 30,
            status_stale_seconds: 300,
            kill_feed_default_limit: 50,
            cleanup_interval_seconds: 300,
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 15,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub storage_backend: StorageBackend,
    pub clickhouse_url: String,
    pub clickhouse_database: String,
    pub clickhouse_user: Option<String>,
    pub clickhouse_password: Option<String>,
}
