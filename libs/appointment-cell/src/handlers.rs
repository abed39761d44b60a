use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;
use shared_storage::{AppointmentUpdate, AppState};

use crate::models::{AppointmentQueryParams, BookingError, BookingRequest};
use crate::services::booking::BookingService;
use crate::services::notification::confirmation_sender;
use crate::services::stats::StatsService;

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::NotFound => AppError::NotFound("Appointment not found".to_string()),
            BookingError::SlotUnavailable => {
                AppError::Conflict("Slot is no longer available".to_string())
            }
            BookingError::Validation(msg) => AppError::BadRequest(msg),
            BookingError::Store(msg) => AppError::Database(msg),
        }
    }
}

fn booking_service(state: &AppState) -> BookingService {
    BookingService::new(state.store.clone(), confirmation_sender(&state.config))
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<AppState>,
    Query(query): Query<AppointmentQueryParams>,
) -> Result<Json<Value>, AppError> {
    let appointments = booking_service(&state).list(&query).await?;
    Ok(Json(json!(appointments)))
}

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<AppState>,
    Json(request): Json<BookingRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let appointment = booking_service(&state).create_booking(request).await?;
    Ok((StatusCode::CREATED, Json(json!(appointment))))
}

#[axum::debug_handler]
pub async fn update_appointment(
    State(state): State<AppState>,
    Path(appointment_id): Path<Uuid>,
    Json(update): Json<AppointmentUpdate>,
) -> Result<Json<Value>, AppError> {
    let appointment = booking_service(&state)
        .update(appointment_id, update)
        .await?;
    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<AppState>,
    Path(appointment_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    booking_service(&state).cancel_booking(appointment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn find_appointment_by_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<Value>, AppError> {
    let appointment = booking_service(&state).find_by_code(&code).await?;
    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let stats = StatsService::new(state.store.clone()).dashboard().await?;
    Ok(Json(json!(stats)))
}
