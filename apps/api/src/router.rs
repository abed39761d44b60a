use axum::{routing::get, Router};

use appointment_cell::router::{appointment_routes, stats_routes};
use shared_storage::AppState;
use slot_cell::router::slot_routes;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "Dock agenda API is running!" }))
        .nest("/api/slots", slot_routes(state.clone()))
        .nest("/api/appointments", appointment_routes(state.clone()))
        .nest("/api/stats", stats_routes(state))
}
