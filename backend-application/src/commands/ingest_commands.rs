use tracing::{info, warn};
use uuid::Uuid;

use backend_domain::{
    current_millis, is_self_inflicted, normalize_kill, translate, InboundEvent, KillEvent,
    KillReport, KillRejection, PlayerEvent, PlayerEventKind, PlayerSighting, ServerEventRecord,
    ServerState, StatusReport, StatusUpdate, WebhookPayload,
};

use crate::commands::{dedup_gate, identity_commands};
use crate::{AppError, AppState};

#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
    KillRecorded(KillEvent),
    DuplicateSkipped,
    KillRejected(KillRejection),
    PlayerEventRecorded,
    ServerEventRecorded,
    AdminKillIgnored,
    Unrecognized,
}

impl IngestOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            IngestOutcome::KillRecorded(_)
            | IngestOutcome::PlayerEventRecorded
            | IngestOutcome::ServerEventRecorded => "Webhook processed successfully",
            IngestOutcome::DuplicateSkipped => "Duplicate kill event skipped",
            IngestOutcome::KillRejected(_) => "Kill event dropped - unidentified party",
            IngestOutcome::AdminKillIgnored => "Admin kill event ignored",
            IngestOutcome::Unrecognized => "Unrecognized event ignored",
        }
    }
}

/// Runs one webhook through the pipeline: translate, normalize, consolidate
/// identities, dedup, store. Only store failures surface as errors.
pub async fn process_webhook(
    state: &AppState,
    payload: WebhookPayload,
) -> Result<IngestOutcome, AppError> {
    state.metrics.record_webhook();
    let received_at = current_millis();
    let event = translate(payload, received_at);

    let result = dispatch(state, event, received_at).await;
    if result.is_err() {
        state.metrics.record_ingest_error();
    }
    result
}

async fn dispatch(
    state: &AppState,
    event: InboundEvent,
    received_at: i64,
) -> Result<IngestOutcome, AppError> {
    match event {
        InboundEvent::Kill(report) => ingest_kill(state, report, received_at).await,
        InboundEvent::PlayerJoined(sighting) => {
            ingest_player_event(state, sighting, PlayerEventKind::Join, received_at).await
        }
        InboundEvent::PlayerLeft(sighting) => {
            ingest_player_event(state, sighting, PlayerEventKind::Leave, received_at).await
        }
        InboundEvent::ServerStatus(report) => ingest_status(state, report, received_at).await,
        InboundEvent::Weather {
            weather,
            occurred_at,
        } => {
            let record = ServerEventRecord {
                event_type: "weather_changed".to_string(),
                data: serde_json::json!({ "weather": weather }),
                occurred_at,
            };
            state.activity_repo.insert_server_event(&record).await?;
            state.status.touch(received_at).await;
            Ok(IngestOutcome::ServerEventRecorded)
        }
        InboundEvent::AdminKillIgnored => {
            info!("admin kill event ignored");
            state.metrics.record_dropped();
            Ok(IngestOutcome::AdminKillIgnored)
        }
        InboundEvent::Unrecognized {
            label,
            suspected_kill,
        } => {
            if suspected_kill {
                warn!("unrecognized event '{}' has kill-like fields, possible missed kill", label);
            } else {
                info!("unrecognized event '{}' ignored", label);
            }
            state.metrics.record_dropped();
            Ok(IngestOutcome::Unrecognized)
        }
    }
}

async fn ingest_kill(
    state: &AppState,
    report: KillReport,
    received_at: i64,
) -> Result<IngestOutcome, AppError> {
    let candidate = match normalize_kill(report) {
        Ok(candidate) => candidate,
        Err(rejection) => {
            warn!("kill event dropped: {}", rejection.as_str());
            state.metrics.record_dropped();
            return Ok(IngestOutcome::KillRejected(rejection));
        }
    };

    let at = candidate.occurred_at;
    let killer_name = identity_commands::record_sighting(
        state,
        candidate.killer.steam_id.as_ref(),
        &candidate.killer.name,
        at,
    )
    .await?;
    let victim_name = identity_commands::record_sighting(
        state,
        candidate.victim.steam_id.as_ref(),
        &candidate.victim.name,
        at,
    )
    .await?;

    let event = KillEvent {
        id: Uuid::now_v7().to_string(),
        killer_name,
        victim_name,
        weapon: candidate.weapon,
        distance: candidate.distance,
        killer_steam_id: candidate.killer.steam_id,
        victim_steam_id: candidate.victim.steam_id,
        wipe_epoch: state.wipe().to_string(),
        occurred_at: at,
    };

    if !dedup_gate::admit(state, &event).await? {
        info!(
            "duplicate kill event skipped: {} -> {}",
            event.killer_name, event.victim_name
        );
        state.metrics.record_duplicate();
        return Ok(IngestOutcome::DuplicateSkipped);
    }

    state.kill_repo.insert_kill_event(&event).await?;
    if is_self_inflicted(&event) {
        state
            .suicide_repo
            .increment(
                &event.victim_name,
                event.victim_steam_id.as_ref(),
                at,
                state.wipe(),
            )
            .await?;
        info!("suicide recorded: {} ({})", event.victim_name, event.weapon);
    } else {
        info!(
            "kill recorded: {} eliminated {} with {} at {}",
            event.killer_name, event.victim_name, event.weapon, event.distance
        );
    }

    state.status.touch(received_at).await;
    state.metrics.record_kill();
    Ok(IngestOutcome::KillRecorded(event))
}

async fn ingest_player_event(
    state: &AppState,
    sighting: PlayerSighting,
    kind: PlayerEventKind,
    received_at: i64,
) -> Result<IngestOutcome, AppError> {
    match &sighting.player {
        Some(player) => {
            let player_name = match kind {
                PlayerEventKind::Join => {
                    identity_commands::record_sighting(
                        state,
                        player.steam_id.as_ref(),
                        &player.name,
                        sighting.occurred_at,
                    )
                    .await?
                }
                PlayerEventKind::Leave => {
                    identity_commands::resolve(state, player.steam_id.as_ref(), &player.name)
                        .await?
                }
            };
            let event = PlayerEvent {
                player_name,
                steam_id: player.steam_id.clone(),
                kind,
                occurred_at: sighting.occurred_at,
            };
            state.activity_repo.insert_player_event(&event).await?;
            info!("player {}: {}", kind.as_str(), event.player_name);
        }
        None => warn!("player {} event without an identifiable player", kind.as_str()),
    }

    match (kind, sighting.players_online) {
        (PlayerEventKind::Join, Some(players)) => {
            state
                .status
                .apply(
                    StatusUpdate {
                        status: Some(ServerState::Online),
                        players_online: Some(players),
                        ..StatusUpdate::default()
                    },
                    received_at,
                )
                .await
        }
        (PlayerEventKind::Leave, Some(players)) => {
            state
                .status
                .apply(
                    StatusUpdate {
                        players_online: Some(players),
                        ..StatusUpdate::default()
                    },
                    received_at,
                )
                .await
        }
        (_, None) => state.status.touch(received_at).await,
    }
    Ok(IngestOutcome::PlayerEventRecorded)
}

async fn ingest_status(
    state: &AppState,
    report: StatusReport,
    received_at: i64,
) -> Result<IngestOutcome, AppError> {
    let record = ServerEventRecord {
        event_type: report.kind.event_type().to_string(),
        data: report.to_event_data(),
        occurred_at: report.occurred_at,
    };
    state.activity_repo.insert_server_event(&record).await?;

    let update = report.to_update();
    info!(
        "server {}: status {:?}, players {:?}, fps {:?}",
        record.event_type, update.status, update.players_online, update.fps
    );
    state.status.apply(update, received_at).await;
    Ok(IngestOutcome::ServerEventRecorded)
}
