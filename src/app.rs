use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/entries",
            get(handlers::list_entries).post(handlers::create_entry),
        )
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/moods", get(handlers::get_moods))
        .route("/api/settings", get(handlers::get_settings))
        .with_state(state)
}
