//! soundclash-ui library - battle voting web service
//!
//! JSON presentation layer over the core store: voting, results, admin
//! reconciliation. The core never sees HTTP; this crate never touches SQL.

use std::path::PathBuf;

use axum::Router;
use soundclash_common::Store;

pub mod api;
pub mod config;
pub mod error;
pub mod scanner;

pub use config::{Config, ServerConfig};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub config: ServerConfig,
    /// Root directory scanned for battles
    pub battles_dir: PathBuf,
    /// Bearer token for administrative endpoints; empty disables them
    pub api_key: String,
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, post};
    use tower_http::trace::TraceLayer;

    // Administrative routes (bearer token required)
    let admin = Router::new()
        .route("/api/admin/scan", post(api::admin::scan))
        .route("/api/admin/battles/:name", get(api::admin::battle_data))
        .route("/api/admin/battles/:name/open", post(api::admin::open_battle))
        .route("/api/admin/battles/:name/close", post(api::admin::close_battle))
        .route("/api/admin/battles/:name/hide", post(api::admin::hide_battle))
        .route("/api/admin/battles/:name/unhide", post(api::admin::unhide_battle))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth::auth_middleware,
        ));

    // Voting routes (cookie-identified callers)
    let voting = Router::new()
        .route("/api/battles/:name/vote", get(api::vote::vote_form))
        .route("/api/vote", post(api::vote::vote))
        .route("/api/unvote", post(api::vote::unvote))
        .layer(middleware::from_fn(api::client_id::client_id_middleware));

    // Public routes
    let public = Router::new()
        .route("/health", get(api::health::health))
        .route("/api/battles", get(api::battles::list_battles))
        .route("/api/battles/:name/results", get(api::results::results))
        .route("/api/battles/:name/events", get(api::events::battle_events));

    Router::new()
        .merge(admin)
        .merge(voting)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
