use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};

use backend_application::commands::ingest_commands;
use backend_application::AppState;
use backend_domain::{current_millis, millis_to_rfc3339};

use crate::error::HttpError;
use crate::middleware::{decode_body, parse_webhook};

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub success: bool,
    pub message: String,
}

impl WebhookAck {
    fn ok(message: &str) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.to_string(),
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookListing {
    pub message: String,
    pub timestamp: String,
    pub endpoints: Vec<String>,
    pub supported_events: Vec<String>,
}

/// Title gate applied by the secondary endpoints before the shared pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EndpointFilter {
    Backup,
    Players,
}

impl EndpointFilter {
    fn admits(&self, title: &str) -> bool {
        let title = title.to_lowercase();
        let keywords: &[&str] = match self {
            EndpointFilter::Backup => &["kill", "death", "eliminated", "player"],
            EndpointFilter::Players => &[
                "player",
                "joined",
                "left",
                "disconnected",
                "kill",
                "death",
                "eliminated",
                "report",
            ],
        };
        keywords.iter().any(|keyword| title.contains(keyword))
            || (*self == EndpointFilter::Backup && title == "error")
    }

    fn ignored_message(&self) -> &'static str {
        match self {
            EndpointFilter::Backup => "Backup event ignored",
            EndpointFilter::Players => "Event ignored - not relevant",
        }
    }

    fn no_data_message(&self) -> &'static str {
        match self {
            EndpointFilter::Backup => "No valid backup data found",
            EndpointFilter::Players => "No valid event data found",
        }
    }
}

pub async fn dayz_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, HttpError> {
    let value = decode(&headers, &body)?;
    ingest(&state, value).await
}

pub async fn dayz_backup_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, HttpError> {
    let value = decode(&headers, &body)?;
    filtered_ingest(&state, value, EndpointFilter::Backup).await
}

pub async fn dayz_players_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, HttpError> {
    let value = decode(&headers, &body)?;
    filtered_ingest(&state, value, EndpointFilter::Players).await
}

pub async fn catch_all_webhook(Path(rest): Path<String>, body: Bytes) -> Json<WebhookAck> {
    info!(
        "unrouted webhook delivery on /api/webhook/{} ({} bytes)",
        rest,
        body.len()
    );
    WebhookAck::ok("Webhook received")
}

pub async fn webhook_test() -> Json<WebhookListing> {
    Json(WebhookListing {
        message: "DayZ webhook endpoint is active".to_string(),
        timestamp: millis_to_rfc3339(current_millis()),
        endpoints: vec![
            "/api/webhook/dayz (server events)".to_string(),
            "/api/webhook/dayz-alt1 (kill/death events)".to_string(),
            "/api/webhook/dayz-players (player events)".to_string(),
        ],
        supported_events: [
            "kill_any_player",
            "weather_changed",
            "player_joined",
            "player_left",
            "status_startup",
            "status_shutdown",
            "status_fps",
            "server_restart",
        ]
        .iter()
        .map(ToString::to_string)
        .collect(),
    })
}

fn decode(headers: &HeaderMap, body: &[u8]) -> Result<Value, HttpError> {
    decode_body(headers, body).map_err(|err| {
        error!("failed to decode webhook body: {}", err);
        HttpError::BadRequest(err.to_string())
    })
}

async fn ingest(state: &AppState, value: Value) -> Result<Json<WebhookAck>, HttpError> {
    let payload = parse_webhook(value).map_err(|err| {
        warn!("rejected webhook payload: {}", err);
        HttpError::BadRequest(err.to_string())
    })?;
    let outcome = ingest_commands::process_webhook(state, payload).await?;
    Ok(WebhookAck::ok(outcome.message()))
}

async fn filtered_ingest(
    state: &AppState,
    value: Value,
    filter: EndpointFilter,
) -> Result<Json<WebhookAck>, HttpError> {
    let title = match value.get("embeds").and_then(Value::as_array) {
        Some(embeds) if !embeds.is_empty() => embeds[0]
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string(),
        _ => {
            state.metrics.record_webhook();
            state.metrics.record_dropped();
            return Ok(WebhookAck::ok(filter.no_data_message()));
        }
    };
    if !filter.admits(&title) {
        info!("{:?} endpoint ignored embed titled '{}'", filter, title);
        state.metrics.record_webhook();
        state.metrics.record_dropped();
        return Ok(WebhookAck::ok(filter.ignored_message()));
    }
    ingest(state, value).await
}
