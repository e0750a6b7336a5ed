// Server status projection
// Latest operational state as reported by status-bearing webhooks

use serde::{Deserialize, Serialize};

use crate::utils::millis_to_rfc3339;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerState {
    Online,
    Offline,
    Restarting,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerStatusSnapshot {
    pub players_online: u32,
    pub max_players: u32,
    pub status: ServerState,
    pub fps: Option<u32>,
    pub uptime_seconds: Option<u64>,
    pub last_activity_at: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusUpdate {
    pub status: Option<ServerState>,
    pub players_online: Option<u32>,
    pub fps: Option<u32>,
    pub uptime_seconds: Option<u64>,
}

impl ServerStatusSnapshot {
    pub fn new(max_players: u32) -> Self {
        Self {
            players_online: 0,
            max_players,
            status: ServerState::Offline,
            fps: None,
            uptime_seconds: None,
            last_activity_at: None,
        }
    }

    pub fn apply(&mut self, update: StatusUpdate, at: i64) {
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(players) = update.players_online {
            self.players_online = players;
        }
        if update.fps.is_some() {
            self.fps = update.fps;
        }
        if update.uptime_seconds.is_some() {
            self.uptime_seconds = update.uptime_seconds;
        }
        self.touch(at);
    }

    pub fn touch(&mut self, at: i64) {
        self.last_activity_at = Some(self.last_activity_at.map_or(at, |prev| prev.max(at)));
    }

    /// Status as displayed: anything quiet for longer than `stale_ms` is offline.
    pub fn effective_status(&self, now: i64, stale_ms: i64) -> ServerState {
        match self.last_activity_at {
            Some(last) if now.saturating_sub(last) > stale_ms => ServerState::Offline,
            _ => self.status,
        }
    }

    pub fn to_view(&self, now: i64, stale_ms: i64) -> ServerStatsView {
        let status = self.effective_status(now, stale_ms);
        let players_online = if status == ServerState::Offline {
            0
        } else {
            self.players_online
        };
        ServerStatsView {
            players: PlayersView {
                online: players_online,
                max: self.max_players,
            },
            server: ServerView {
                status,
                uptime_seconds: self.uptime_seconds,
                fps: self.fps,
            },
            last_activity: self.last_activity_at.map(millis_to_rfc3339),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerStatsView {
    pub players: PlayersView,
    pub server: ServerView,
    pub last_activity: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayersView {
    pub online: u32,
    pub max: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerView {
    pub status: ServerState,
    pub uptime_seconds: Option<u64>,
    pub fps: Option<u32>,
}
