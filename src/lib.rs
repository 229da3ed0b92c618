use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;

use config::Config;
use db::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}

/// The full application: public and protected routes plus the shared layers.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz))
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/users/managers", get(handlers::users::list_managers));

    let protected_routes = Router::new()
        .route("/api/auth/me", get(handlers::auth::me))
        // Daily logs
        .route(
            "/api/logs",
            post(handlers::daily_logs::create_daily_log).get(handlers::daily_logs::list_daily_logs),
        )
        .route("/api/logs/:id", put(handlers::daily_logs::update_daily_log))
        // Team (managers only)
        .route("/api/team/logs", get(handlers::team::list_team_logs))
        .route(
            "/api/team/developers",
            get(handlers::team::list_team_developers),
        )
        .route("/api/feedback", post(handlers::feedback::add_feedback))
        // Notifications
        .route(
            "/api/notifications",
            get(handlers::notifications::list_notifications),
        )
        .route(
            "/api/notifications/:id/read",
            put(handlers::notifications::mark_read),
        )
        // Analytics
        .route(
            "/api/analytics/productivity",
            get(handlers::analytics::get_productivity),
        )
        .route("/api/analytics/export", get(handlers::analytics::export_logs))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(cors_layer(&state.config))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = std::iter::once(&config.frontend_url)
        .chain(config.cors_extra_origins.iter())
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring unparsable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}
