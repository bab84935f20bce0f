pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Analysis API
        .route(
            "/api/v1/analyses",
            post(handlers::handle_create_analysis).get(handlers::handle_list_analyses),
        )
        .route(
            "/api/v1/analyses/latest",
            get(handlers::handle_latest_analysis),
        )
        .route("/api/v1/analyses/:id", get(handlers::handle_get_analysis))
        .route(
            "/api/v1/analyses/:id/skills",
            put(handlers::handle_set_skill_confidence),
        )
        .route(
            "/api/v1/analyses/:id/export",
            get(handlers::handle_export_analysis),
        )
        .with_state(state)
}
