use serde::{Deserialize, Serialize};

/// Event kinds recognized from an embed title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    KillReport,
    PlayerJoined,
    ServerFps,
    ServerRestart,
    ServerShutdown,
    ServerStartup,
    AdminKillIgnored,
    Unrecognized,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::KillReport => "kill_report",
            EventKind::PlayerJoined => "player_joined",
            EventKind::ServerFps => "server_fps",
            EventKind::ServerRestart => "server_restart",
            EventKind::ServerShutdown => "server_shutdown",
            EventKind::ServerStartup => "server_startup",
            EventKind::AdminKillIgnored => "admin_kill_ignored",
            EventKind::Unrecognized => "unrecognized",
        }
    }
}
