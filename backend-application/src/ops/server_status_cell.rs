use tokio::sync::RwLock;

use backend_domain::{ServerStatusSnapshot, StatusUpdate};

/// Single owner of the server status projection. Writers are serialized by
/// the lock; the last status-bearing webhook wins.
#[derive(Debug)]
pub struct ServerStatusCell {
    inner: RwLock<ServerStatusSnapshot>,
}

impl ServerStatusCell {
    pub fn new(max_players: u32) -> Self {
        Self {
            inner: RwLock::new(ServerStatusSnapshot::new(max_players)),
        }
    }

    pub async fn apply(&self, update: StatusUpdate, at: i64) {
        self.inner.write().await.apply(update, at);
    }

    pub async fn touch(&self, at: i64) {
        self.inner.write().await.touch(at);
    }

    pub async fn snapshot(&self) -> ServerStatusSnapshot {
        self.inner.read().await.clone()
    }
}
