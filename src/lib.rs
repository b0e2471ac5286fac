use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, patch, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod snapshots;

use config::Config;
use snapshots::SnapshotHub;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub hub: SnapshotHub,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let hub = SnapshotHub::new(&config);
        Self {
            config: Arc::new(config),
            hub,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let user_routes = Router::new()
        .route(
            "/api/users/:user_id/entries",
            put(handlers::entries::replace_entries),
        )
        .route(
            "/api/users/:user_id/moods",
            get(handlers::moods::get_moods)
                .put(handlers::moods::replace_moods)
                .post(handlers::moods::add_mood),
        )
        .route(
            "/api/users/:user_id/moods/:symbol",
            patch(handlers::moods::update_mood).delete(handlers::moods::delete_mood),
        )
        .route("/api/users/:user_id/stats", get(handlers::stats::get_stats))
        .route(
            "/api/users/:user_id/calendar",
            get(handlers::calendar::get_calendar),
        )
        .route(
            "/api/users/:user_id/journal",
            get(handlers::journal::get_journal),
        )
        .route("/api/users/:user_id/quote", get(handlers::quotes::get_quote));

    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/api/stats", post(handlers::stats::compute_stats))
        .route("/ws", get(handlers::ws::ws_handler));

    let cors = cors_layer(&state.config);

    Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = std::iter::once(&config.frontend_url)
        .chain(config.cors_extra_origins.iter())
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(hv) => Some(hv),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}
