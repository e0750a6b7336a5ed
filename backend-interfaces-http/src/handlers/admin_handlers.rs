use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use backend_application::commands::admin_commands;
use backend_application::queries::integrity_queries;
use backend_application::AppState;
use backend_domain::{CleanupReport, ConsolidationReport, IntegrityReport, WipeReport};

use crate::error::HttpError;
use crate::middleware::authorize_admin;

pub async fn wipe_reset(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<WipeReport>, HttpError> {
    if !authorize_admin(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let report = admin_commands::wipe_reset(&state).await?;
    Ok(Json(report))
}

pub async fn cleanup_invalid(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<CleanupReport>, HttpError> {
    if !authorize_admin(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let report = admin_commands::cleanup_invalid(&state).await?;
    Ok(Json(report))
}

pub async fn consolidate_players(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ConsolidationReport>, HttpError> {
    if !authorize_admin(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let report = admin_commands::consolidate_players(&state).await?;
    Ok(Json(report))
}

pub async fn data_integrity(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<IntegrityReport>, HttpError> {
    if !authorize_admin(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let report = integrity_queries::check_integrity(&state).await?;
    Ok(Json(report))
}
