use axum::{
    routing::{get, put},
    Router,
};

use shared_storage::AppState;

use crate::handlers;

pub fn appointment_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/",
            get(handlers::list_appointments).post(handlers::book_appointment),
        )
        .route("/code/{code}", get(handlers::find_appointment_by_code))
        .route(
            "/{appointment_id}",
            put(handlers::update_appointment).delete(handlers::cancel_appointment),
        )
        .with_state(state)
}

pub fn stats_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::get_stats))
        .with_state(state)
}
