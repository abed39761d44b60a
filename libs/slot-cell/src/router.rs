use axum::{
    routing::{get, post, put},
    Router,
};

use shared_storage::AppState;

use crate::handlers;

pub fn slot_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::list_slots).post(handlers::create_slot))
        .route("/date/{date}", get(handlers::list_slots_by_date))
        .route("/block", post(handlers::block_slots))
        .route("/bulk-week", post(handlers::bulk_week))
        .route(
            "/{slot_id}",
            put(handlers::update_slot).delete(handlers::delete_slot),
        )
        .with_state(state)
}
