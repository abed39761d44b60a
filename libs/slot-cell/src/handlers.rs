use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;
use shared_storage::{AppState, SlotUpdate};

use crate::models::{BlockSlotsRequest, BulkWeekRequest, CreateSlotRequest, SlotError};
use crate::services::slots::SlotAdminService;

impl From<SlotError> for AppError {
    fn from(err: SlotError) -> Self {
        match err {
            SlotError::NotFound => AppError::NotFound("Slot not found".to_string()),
            SlotError::Referenced => {
                AppError::Conflict("Slot is referenced by a live appointment".to_string())
            }
            SlotError::Validation(msg) => AppError::BadRequest(msg),
            SlotError::Store(msg) => AppError::Database(msg),
        }
    }
}

#[axum::debug_handler]
pub async fn list_slots(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let service = SlotAdminService::new(state.store.clone());
    let slots = service.list().await?;
    Ok(Json(json!(slots)))
}

#[axum::debug_handler]
pub async fn list_slots_by_date(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
) -> Result<Json<Value>, AppError> {
    let service = SlotAdminService::new(state.store.clone());
    let slots = service.list_by_date(date).await?;
    Ok(Json(json!(slots)))
}

#[axum::debug_handler]
pub async fn create_slot(
    State(state): State<AppState>,
    Json(request): Json<CreateSlotRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = SlotAdminService::new(state.store.clone());
    let slot = service.create(request).await?;
    Ok((StatusCode::CREATED, Json(json!(slot))))
}

#[axum::debug_handler]
pub async fn update_slot(
    State(state): State<AppState>,
    Path(slot_id): Path<Uuid>,
    Json(update): Json<SlotUpdate>,
) -> Result<Json<Value>, AppError> {
    let service = SlotAdminService::new(state.store.clone());
    let slot = service.update(slot_id, update).await?;
    Ok(Json(json!(slot)))
}

#[axum::debug_handler]
pub async fn delete_slot(
    State(state): State<AppState>,
    Path(slot_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let service = SlotAdminService::new(state.store.clone());
    service.delete(slot_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn block_slots(
    State(state): State<AppState>,
    Json(request): Json<BlockSlotsRequest>,
) -> Result<Json<Value>, AppError> {
    if request.slot_ids.is_empty() {
        return Err(AppError::BadRequest("slotIds must not be empty".to_string()));
    }

    let service = SlotAdminService::new(state.store.clone());
    let blocked = service.block(&request.slot_ids).await?;
    Ok(Json(json!({
        "message": format!("{} slots blocked", blocked),
        "blockedCount": blocked
    })))
}

#[axum::debug_handler]
pub async fn bulk_week(
    State(state): State<AppState>,
    Json(request): Json<BulkWeekRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = SlotAdminService::new(state.store.clone());
    let slots = service.bulk_week(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": format!("{} slots created", slots.len()),
            "slots": slots
        })),
    ))
}
