//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    achievements, activities, auth, dashboard, games, health, inventory, missions, progress,
    ranking, settings, shop,
};
use crate::state::AppState;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /health` - Health check
/// - `POST /v1/auth/register` - Register a student
/// - `POST /v1/auth/login` - Log in, returning a session token and cookie
///
/// ## Session
/// - `POST /v1/auth/logout` - Clear the session cookie
/// - `GET /v1/dashboard` - Student summary and quick missions
/// - `GET /v1/shop` - Items for sale
/// - `POST /v1/shop/items/:item_id/purchase` - Buy an item
/// - `GET /v1/inventory` - Owned items
/// - `POST /v1/inventory/:category/:item_id/equip` - Equip an owned item
/// - `GET /v1/ranking` - All students by points
/// - `GET /v1/missions` - Missions with progress
/// - `GET /v1/achievements` - Achievements with unlock state
/// - `GET /v1/activities` - Activity catalog
/// - `GET /v1/activities/history` - Completed activities
/// - `POST /v1/activities/:activity_id/complete` - Complete an activity
/// - `GET /v1/settings` - Settings view
/// - `POST /v1/settings/name` - Rename
/// - `POST /v1/settings/avatar` - Upload an avatar (multipart)
/// - `POST /v1/progress/reset` - Reset progress
/// - `GET /v1/games` - Games menu
/// - `GET /v1/games/:game/config` - Difficulty table
/// - `POST /v1/games/result` - Report a finished game
pub fn create_router(state: AppState) -> Router {
    // Extract config values before moving state
    let cors_origins = state.config.cors_origins.clone();
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    // Build CORS layer
    let cors = build_cors_layer(&cors_origins);

    let state = Arc::new(state);

    Router::new()
        // Health (public)
        .route("/health", get(health::health))
        // Auth
        .route("/v1/auth/register", post(auth::register))
        .route("/v1/auth/login", post(auth::login))
        .route("/v1/auth/logout", post(auth::logout))
        // Dashboard
        .route("/v1/dashboard", get(dashboard::get_dashboard))
        // Shop and inventory
        .route("/v1/shop", get(shop::list_shop))
        .route("/v1/shop/items/:item_id/purchase", post(shop::purchase_item))
        .route("/v1/inventory", get(inventory::list_inventory))
        .route(
            "/v1/inventory/:category/:item_id/equip",
            post(inventory::equip_item),
        )
        // Progress views
        .route("/v1/ranking", get(ranking::get_ranking))
        .route("/v1/missions", get(missions::list_missions))
        .route("/v1/achievements", get(achievements::list_achievements))
        // Activities
        .route("/v1/activities", get(activities::list_activities))
        .route("/v1/activities/history", get(activities::activity_history))
        .route(
            "/v1/activities/:activity_id/complete",
            post(activities::complete),
        )
        // Settings
        .route("/v1/settings", get(settings::get_settings))
        .route("/v1/settings/name", post(settings::rename))
        .route("/v1/settings/avatar", post(settings::upload_avatar))
        .route("/v1/progress/reset", post(progress::reset))
        // Games
        .route("/v1/games", get(games::list_games))
        .route("/v1/games/:game/config", get(games::get_config))
        .route("/v1/games/result", post(games::post_result))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
