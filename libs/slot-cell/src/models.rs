use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::scheduling::ServiceKind;

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSlotRequest {
    pub data_hora: DateTime<Utc>,
    pub servico: ServiceKind,
    #[serde(default = "default_disponivel")]
    pub disponivel: bool,
}

fn default_disponivel() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockSlotsRequest {
    pub slot_ids: Vec<Uuid>,
}

/// One publication rule for the bulk-week operation: a time of day
/// ("HH:MM" or "HH:MM:SS") and the service kind published at that time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekTimeSlot {
    pub time: String,
    pub service: ServiceKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkWeekRequest {
    pub start_date: NaiveDate,
    pub time_slots: Vec<WeekTimeSlot>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum SlotError {
    #[error("Slot not found")]
    NotFound,

    #[error("Slot is referenced by a live appointment")]
    Referenced,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Store(String),
}
