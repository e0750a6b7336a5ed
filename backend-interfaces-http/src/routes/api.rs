use axum::Router;

use backend_application::AppState;

use crate::handlers::{admin_handlers, ops_handlers, query_handlers, webhook_handlers};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/webhook/dayz",
            axum::routing::post(webhook_handlers::dayz_webhook),
        )
        .route(
            "/api/webhook/dayz-alt1",
            axum::routing::post(webhook_handlers::dayz_backup_webhook),
        )
        .route(
            "/api/webhook/dayz-players",
            axum::routing::post(webhook_handlers::dayz_players_webhook),
        )
        .route(
            "/api/webhook/test",
            axum::routing::get(webhook_handlers::webhook_test),
        )
        .route(
            "/api/webhook/*rest",
            axum::routing::post(webhook_handlers::catch_all_webhook),
        )
        .route("/api/killfeed", axum::routing::get(query_handlers::kill_feed))
        .route(
            "/api/leaderboard",
            axum::routing::get(query_handlers::leaderboard),
        )
        .route(
            "/api/weapons/meta",
            axum::routing::get(query_handlers::weapons_meta),
        )
        .route(
            "/api/player/search",
            axum::routing::get(query_handlers::player_search),
        )
        .route(
            "/api/player/stats",
            axum::routing::get(query_handlers::player_stats),
        )
        .route(
            "/api/player/events",
            axum::routing::get(query_handlers::player_events),
        )
        .route(
            "/api/server/stats",
            axum::routing::get(query_handlers::server_stats),
        )
        .route(
            "/api/admin/wipe-reset",
            axum::routing::post(admin_handlers::wipe_reset),
        )
        .route(
            "/api/admin/cleanup-invalid",
            axum::routing::post(admin_handlers::cleanup_invalid),
        )
        .route(
            "/api/admin/consolidate-players",
            axum::routing::post(admin_handlers::consolidate_players),
        )
        .route(
            "/api/admin/data-integrity",
            axum::routing::get(admin_handlers::data_integrity),
        )
        .route(
            "/api/ops/health/live",
            axum::routing::get(ops_handlers::health_live),
        )
        .route(
            "/api/ops/health/ready",
            axum::routing::get(ops_handlers::health_ready),
        )
        .route(
            "/api/ops/metrics/prometheus",
            axum::routing::get(ops_handlers::metrics_prometheus),
        )
        .with_state(state)
}
