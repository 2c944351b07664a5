use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/fragment", get(handlers::fragment))
        .route("/api/state", get(handlers::get_state))
        .route("/api/page", get(handlers::get_page))
        .route("/api/events", post(handlers::post_event))
        .route("/api/stats", post(handlers::post_stats))
        .route("/api/save", post(handlers::save))
        .with_state(state)
}
