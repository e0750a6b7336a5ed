// Turns either payload shape into one typed inbound event

use std::sync::LazyLock;

use regex::Regex;

use crate::entities::{Embed, FlatEvent, ServerState, StatusUpdate, WebhookPayload};
use crate::services::classifier::{classify_title, looks_like_kill_fields};
use crate::services::extractor::{extract_entity, Entity};
use crate::utils::parse_rfc3339_millis;
use crate::value_objects::{EventKind, SteamId};

const KILLER_FIELDS: &[&str] = &["Killer", "Killer:", "Admin"];
const VICTIM_FIELDS: &[&str] = &["Victim", "Victim:", "Player"];
const DETAILS_FIELDS: &[&str] = &["Details", "Details:"];
const WEAPON_FIELDS: &[&str] = &["Weapon", "Weapon:"];
const DISTANCE_FIELDS: &[&str] = &["Distance", "Distance:"];
const PLAYER_FIELDS: &[&str] = &["Player", "Player:"];
const PLAYER_COUNT_FIELDS: &[&str] = &["Players", "Online", "Current Players"];
const FPS_FIELDS: &[&str] = &["Average", "FPS"];
const UPTIME_FIELDS: &[&str] = &["Uptime"];

static UPTIME_PART: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(days?|d|hours?|hrs?|h|minutes?|mins?|m|seconds?|secs?|s)?\b")
        .expect("uptime pattern")
});

#[derive(Debug, Clone, PartialEq)]
pub struct KillReport {
    pub killer: Option<Entity>,
    pub victim: Option<Entity>,
    pub details: Option<String>,
    pub weapon: Option<String>,
    pub distance: Option<String>,
    pub occurred_at: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSighting {
    pub player: Option<Entity>,
    pub players_online: Option<u32>,
    pub occurred_at: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Startup,
    Shutdown,
    Restart,
    Fps,
}

impl StatusKind {
    pub fn event_type(&self) -> &'static str {
        match self {
            StatusKind::Startup => "status_startup",
            StatusKind::Shutdown => "status_shutdown",
            StatusKind::Restart => "server_restart",
            StatusKind::Fps => "status_fps",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    pub kind: StatusKind,
    pub fps: Option<u32>,
    pub players_online: Option<u32>,
    pub uptime_seconds: Option<u64>,
    pub occurred_at: i64,
}

impl StatusReport {
    /// Startup means online, shutdown means offline and empty, restart is its
    /// own state, and an FPS report is online only with a non-zero uptime.
    pub fn to_update(&self) -> StatusUpdate {
        match self.kind {
            StatusKind::Startup => StatusUpdate {
                status: Some(ServerState::Online),
                players_online: self.players_online,
                fps: self.fps,
                uptime_seconds: self.uptime_seconds,
            },
            StatusKind::Shutdown => StatusUpdate {
                status: Some(ServerState::Offline),
                players_online: Some(0),
                fps: Some(0),
                uptime_seconds: Some(0),
            },
            StatusKind::Restart => StatusUpdate {
                status: Some(ServerState::Restarting),
                players_online: self.players_online,
                fps: self.fps,
                uptime_seconds: None,
            },
            StatusKind::Fps => {
                let online = self.uptime_seconds.unwrap_or(0) > 0;
                StatusUpdate {
                    status: Some(if online {
                        ServerState::Online
                    } else {
                        ServerState::Offline
                    }),
                    players_online: Some(self.players_online.unwrap_or(0)),
                    fps: Some(self.fps.unwrap_or(0)),
                    uptime_seconds: self.uptime_seconds,
                }
            }
        }
    }

    pub fn to_event_data(&self) -> serde_json::Value {
        serde_json::json!({
            "fps": self.fps,
            "playerCount": self.players_online,
            "uptimeSeconds": self.uptime_seconds,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    Kill(KillReport),
    PlayerJoined(PlayerSighting),
    PlayerLeft(PlayerSighting),
    ServerStatus(StatusReport),
    Weather { weather: String, occurred_at: i64 },
    AdminKillIgnored,
    Unrecognized { label: String, suspected_kill: bool },
}

impl InboundEvent {
    pub fn kind_label(&self) -> &'static str {
        match self {
            InboundEvent::Kill(_) => "kill",
            InboundEvent::PlayerJoined(_) => "player_joined",
            InboundEvent::PlayerLeft(_) => "player_left",
            InboundEvent::ServerStatus(report) => report.kind.event_type(),
            InboundEvent::Weather { .. } => "weather_changed",
            InboundEvent::AdminKillIgnored => "admin_kill_ignored",
            InboundEvent::Unrecognized { .. } => "unrecognized",
        }
    }
}

pub fn translate(payload: WebhookPayload, received_at: i64) -> InboundEvent {
    match payload {
        WebhookPayload::Embed(embed) => translate_embed(&embed, received_at),
        WebhookPayload::Flat(flat) => translate_flat(flat, received_at),
    }
}

pub fn translate_embed(embed: &Embed, received_at: i64) -> InboundEvent {
    let occurred_at = embed
        .timestamp
        .as_deref()
        .and_then(parse_rfc3339_millis)
        .unwrap_or(received_at);

    match classify_title(embed.title()) {
        EventKind::AdminKillIgnored => InboundEvent::AdminKillIgnored,
        EventKind::KillReport => InboundEvent::Kill(KillReport {
            killer: extract_entity(embed.field(KILLER_FIELDS)),
            victim: extract_entity(embed.field(VICTIM_FIELDS)),
            details: non_blank(embed.field(DETAILS_FIELDS)),
            weapon: non_blank(embed.field(WEAPON_FIELDS)),
            distance: non_blank(embed.field(DISTANCE_FIELDS)),
            occurred_at,
        }),
        EventKind::PlayerJoined => InboundEvent::PlayerJoined(PlayerSighting {
            player: extract_entity(embed.field(PLAYER_FIELDS)),
            players_online: embed.field(PLAYER_COUNT_FIELDS).and_then(leading_u32),
            occurred_at,
        }),
        EventKind::ServerFps => InboundEvent::ServerStatus(StatusReport {
            kind: StatusKind::Fps,
            fps: embed.field(FPS_FIELDS).and_then(leading_u32),
            players_online: embed.field(&["Players"]).and_then(leading_u32),
            uptime_seconds: embed.field(UPTIME_FIELDS).and_then(parse_uptime_seconds),
            occurred_at,
        }),
        EventKind::ServerRestart => status_only(StatusKind::Restart, occurred_at),
        EventKind::ServerShutdown => status_only(StatusKind::Shutdown, occurred_at),
        EventKind::ServerStartup => status_only(StatusKind::Startup, occurred_at),
        EventKind::Unrecognized => InboundEvent::Unrecognized {
            label: embed.title().to_string(),
            suspected_kill: looks_like_kill_fields(&embed.fields),
        },
    }
}

pub fn translate_flat(flat: FlatEvent, received_at: i64) -> InboundEvent {
    let occurred_at = flat
        .timestamp
        .as_deref()
        .and_then(parse_rfc3339_millis)
        .unwrap_or(received_at);
    let players_online = flat.player_count.and_then(float_to_u32);

    match flat.event.trim() {
        "kill_any_player" => InboundEvent::Kill(KillReport {
            killer: with_steam_id(extract_entity(flat.killer.as_deref()), flat.killer_steam_id.as_deref()),
            victim: with_steam_id(extract_entity(flat.victim.as_deref()), flat.victim_steam_id.as_deref()),
            details: None,
            weapon: flat.weapon,
            distance: flat.distance,
            occurred_at,
        }),
        "player_joined" => InboundEvent::PlayerJoined(PlayerSighting {
            player: with_steam_id(extract_entity(flat.player.as_deref()), flat.steam_id.as_deref()),
            players_online,
            occurred_at,
        }),
        "player_left" => InboundEvent::PlayerLeft(PlayerSighting {
            player: with_steam_id(extract_entity(flat.player.as_deref()), flat.steam_id.as_deref()),
            players_online,
            occurred_at,
        }),
        "status_startup" | "status_shutdown" | "status_fps" | "server_restart" => {
            let kind = match flat.event.trim() {
                "status_startup" => StatusKind::Startup,
                "status_shutdown" => StatusKind::Shutdown,
                "server_restart" => StatusKind::Restart,
                _ => StatusKind::Fps,
            };
            InboundEvent::ServerStatus(StatusReport {
                kind,
                fps: flat.fps.and_then(float_to_u32),
                players_online,
                uptime_seconds: flat.uptime.as_deref().and_then(parse_uptime_seconds),
                occurred_at,
            })
        }
        "weather_changed" => InboundEvent::Weather {
            weather: flat.weather.unwrap_or_default(),
            occurred_at,
        },
        other => InboundEvent::Unrecognized {
            label: other.to_string(),
            suspected_kill: false,
        },
    }
}

fn status_only(kind: StatusKind, occurred_at: i64) -> InboundEvent {
    InboundEvent::ServerStatus(StatusReport {
        kind,
        fps: None,
        players_online: None,
        uptime_seconds: None,
        occurred_at,
    })
}

/// A separately supplied Steam id fills in for one the name text did not carry.
fn with_steam_id(entity: Option<Entity>, steam_id: Option<&str>) -> Option<Entity> {
    let mut entity = entity?;
    if entity.steam_id.is_none() {
        entity.steam_id = steam_id.and_then(SteamId::parse);
    }
    Some(entity)
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

fn float_to_u32(value: f64) -> Option<u32> {
    (value.is_finite() && value >= 0.0).then(|| value.round().min(u32::MAX as f64) as u32)
}

/// Leading integer of a field like `"12/30"` or `"58.7"`.
pub fn leading_u32(raw: &str) -> Option<u32> {
    let digits: String = raw
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Uptime text such as `"2h 15m 3s"`, `"1 day 4 hours"`, `"01:02:03"` or a
/// bare seconds count.
pub fn parse_uptime_seconds(raw: &str) -> Option<u64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.contains(':') {
        let mut total: u64 = 0;
        for part in trimmed.split(':') {
            let value: u64 = part.trim().parse().ok()?;
            total = total.saturating_mul(60).saturating_add(value);
        }
        return Some(total);
    }

    let mut total: f64 = 0.0;
    let mut matched = false;
    for caps in UPTIME_PART.captures_iter(trimmed) {
        let Ok(value) = caps[1].parse::<f64>() else {
            continue;
        };
        let unit = caps
            .get(2)
            .map(|m| m.as_str().to_ascii_lowercase())
            .unwrap_or_default();
        let scale = match unit.chars().next() {
            Some('d') => 86_400.0,
            Some('h') => 3_600.0,
            Some('m') => 60.0,
            _ => 1.0,
        };
        total += value * scale;
        matched = true;
    }
    matched.then(|| total.round() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn embed_payload(value: serde_json::Value) -> WebhookPayload {
        WebhookPayload::from_value(value).expect("payload")
    }

    #[test]
    fn kill_report_fields_are_extracted() {
        let payload = embed_payload(json!({
            "embeds": [{
                "title": "Kill / Death Report:",
                "timestamp": "2024-05-01T12:00:00.000Z",
                "fields": [
                    {"name": "Victim:", "value": "Bob\n[76561198000000001]"},
                    {"name": "Killer:", "value": "Alice\n[76561198000000002]"},
                    {"name": "Details:", "value": "Alice killed Bob with [AKM] from [350] meters"}
                ]
            }]
        }));
        let InboundEvent::Kill(report) = translate(payload, 0) else {
            panic!("expected kill");
        };
        assert_eq!(report.killer.as_ref().map(|e| e.name.as_str()), Some("Alice"));
        assert_eq!(report.victim.as_ref().map(|e| e.name.as_str()), Some("Bob"));
        assert_eq!(
            report.details.as_deref(),
            Some("Alice killed Bob with [AKM] from [350] meters")
        );
        assert_eq!(report.occurred_at, 1_714_564_800_000);
    }

    #[test]
    fn fps_report_reads_uptime_and_players() {
        let payload = embed_payload(json!({
            "embeds": [{
                "title": "Server FPS",
                "fields": [
                    {"name": "Average", "value": "58.2"},
                    {"name": "Players", "value": "14/30"},
                    {"name": "Uptime", "value": "2h 15m 3s"}
                ]
            }]
        }));
        let InboundEvent::ServerStatus(report) = translate(payload, 42) else {
            panic!("expected status");
        };
        assert_eq!(report.kind, StatusKind::Fps);
        assert_eq!(report.fps, Some(58));
        assert_eq!(report.players_online, Some(14));
        assert_eq!(report.uptime_seconds, Some(8_103));
        assert_eq!(report.occurred_at, 42);
        assert_eq!(report.to_update().status, Some(ServerState::Online));
    }

    #[test]
    fn zero_uptime_reports_offline() {
        let report = StatusReport {
            kind: StatusKind::Fps,
            fps: Some(0),
            players_online: None,
            uptime_seconds: parse_uptime_seconds("0s"),
            occurred_at: 0,
        };
        assert_eq!(report.to_update().status, Some(ServerState::Offline));
        assert_eq!(parse_uptime_seconds("01:00:05"), Some(3_605));
        assert_eq!(parse_uptime_seconds("1 day 2 hours"), Some(93_600));
        assert_eq!(parse_uptime_seconds("n/a"), None);
    }

    #[test]
    fn join_reads_player_count_prefix() {
        let payload = embed_payload(json!({
            "embeds": [{
                "title": "Player Joined",
                "fields": [
                    {"name": "Player", "value": "[Carol](https://steamcommunity.com/profiles/76561198000000003)"},
                    {"name": "Current Players", "value": "12/30"}
                ]
            }]
        }));
        let InboundEvent::PlayerJoined(sighting) = translate(payload, 0) else {
            panic!("expected join");
        };
        assert_eq!(sighting.players_online, Some(12));
        let player = sighting.player.expect("player");
        assert_eq!(player.name, "Carol");
        assert_eq!(player.steam_id, SteamId::parse("76561198000000003"));
    }

    #[test]
    fn flat_kill_takes_separate_steam_ids() {
        let payload = embed_payload(json!({
            "event": "kill_any_player",
            "killer": "Alice",
            "victim": "Bob",
            "weapon": "M4A1",
            "distance": "120m",
            "victimSteamId": "76561198000000001"
        }));
        let InboundEvent::Kill(report) = translate(payload, 7) else {
            panic!("expected kill");
        };
        assert_eq!(report.weapon.as_deref(), Some("M4A1"));
        assert_eq!(report.distance.as_deref(), Some("120m"));
        assert!(report.killer.and_then(|e| e.steam_id).is_none());
        assert_eq!(
            report.victim.and_then(|e| e.steam_id),
            SteamId::parse("76561198000000001")
        );
    }

    #[test]
    fn unknown_titles_and_events_are_unrecognized() {
        let payload = embed_payload(json!({
            "embeds": [{"title": "Base raided", "fields": [{"name": "Killer", "value": "x"}]}]
        }));
        assert_eq!(
            translate(payload, 0),
            InboundEvent::Unrecognized {
                label: "Base raided".to_string(),
                suspected_kill: true
            }
        );
        let flat = embed_payload(json!({"event": "vehicle_destroyed"}));
        assert_eq!(translate(flat, 0).kind_label(), "unrecognized");
    }
}
