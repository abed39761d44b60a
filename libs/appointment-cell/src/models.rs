use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shared_models::scheduling::{AppointmentStatus, ServiceKind};

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

/// The booking form as submitted by a client: the targeted slot coordinates
/// plus contact details. The slot is re-resolved at commit time; the caller's
/// earlier availability observation carries no weight.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub data_hora: DateTime<Utc>,
    pub servico: ServiceKind,
    pub nome_cliente: String,
    pub email_cliente: String,
    #[serde(default)]
    pub telefone_cliente: Option<String>,
    #[serde(default)]
    pub empresa_cliente: Option<String>,
    #[serde(default)]
    pub observacoes: Option<String>,
    #[serde(default)]
    pub status: Option<AppointmentStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentQueryParams {
    pub email: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// Recomputed-on-read dashboard aggregates; nothing here is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub today_appointments: usize,
    pub week_appointments: usize,
    pub total_carregamentos: usize,
    pub total_descarregamentos: usize,
    pub available_slots: usize,
    pub occupied_slots: usize,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum BookingError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Slot is no longer available")]
    SlotUnavailable,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Store(String),
}
