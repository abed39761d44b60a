use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use shared_models::scheduling::{
    Appointment, AppointmentRecord, AppointmentStatus, ServiceKind, Slot,
};

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Insert command for a slot. The store stamps id and creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSlot {
    pub data_hora: DateTime<Utc>,
    pub servico: ServiceKind,
    #[serde(default = "default_disponivel")]
    pub disponivel: bool,
}

fn default_disponivel() -> bool {
    true
}

/// Partial update for a slot, enumerating exactly the mutable fields.
/// Unknown fields are rejected at the boundary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SlotUpdate {
    #[serde(default)]
    pub data_hora: Option<DateTime<Utc>>,
    #[serde(default)]
    pub servico: Option<ServiceKind>,
    #[serde(default)]
    pub disponivel: Option<bool>,
}

impl SlotUpdate {
    pub fn is_empty(&self) -> bool {
        self.data_hora.is_none() && self.servico.is_none() && self.disponivel.is_none()
    }
}

/// Insert command for an appointment. The store stamps id and creation time;
/// the confirmation code is generated by the booking coordinator.
#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub slot_id: Uuid,
    pub nome_cliente: String,
    pub email_cliente: String,
    pub telefone_cliente: Option<String>,
    pub empresa_cliente: Option<String>,
    pub observacoes: Option<String>,
    pub status: AppointmentStatus,
    pub codigo_confirmacao: String,
}

/// Partial update for an appointment: only status and notes are mutable
/// post-creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppointmentUpdate {
    #[serde(default)]
    pub status: Option<AppointmentStatus>,
    #[serde(default)]
    pub observacoes: Option<String>,
}

impl AppointmentUpdate {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.observacoes.is_none()
    }
}

/// Outcome of a slot deletion attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotDeletion {
    Deleted,
    NotFound,
    /// A live appointment still references the slot; it must be cancelled
    /// before the slot can be removed.
    Referenced,
}

#[async_trait]
pub trait SlotStore: Send + Sync {
    /// All slots ordered by timestamp ascending.
    async fn list_slots(&self) -> Result<Vec<Slot>, StoreError>;

    /// Slots whose timestamp falls within the given calendar day
    /// ([00:00:00.000, 23:59:59.999] UTC), ordered ascending.
    async fn list_slots_by_date(&self, date: NaiveDate) -> Result<Vec<Slot>, StoreError>;

    async fn create_slot(&self, new: NewSlot) -> Result<Slot, StoreError>;

    async fn update_slot(&self, id: Uuid, update: SlotUpdate)
        -> Result<Option<Slot>, StoreError>;

    /// Idempotent availability flip; `None` when the id does not resolve.
    async fn set_slot_availability(
        &self,
        id: Uuid,
        disponivel: bool,
    ) -> Result<Option<Slot>, StoreError>;

    async fn delete_slot(&self, id: Uuid) -> Result<SlotDeletion, StoreError>;

    /// Atomically resolve an available slot matching (timestamp, service kind)
    /// and flip it to unavailable. This is the linearization point for
    /// booking: under concurrent claims for the same slot, exactly one call
    /// observes `disponivel == true` and wins. When duplicate slots exist for
    /// the pair, the earliest-created one is claimed.
    async fn claim_slot(
        &self,
        data_hora: DateTime<Utc>,
        servico: ServiceKind,
    ) -> Result<Option<Slot>, StoreError>;

    /// Flip a slot back to available. Returns whether the id resolved.
    async fn release_slot(&self, id: Uuid) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait AppointmentStore: Send + Sync {
    /// All appointments joined with their slot, ordered by slot timestamp
    /// ascending.
    async fn list_appointments(&self) -> Result<Vec<Appointment>, StoreError>;

    /// Exact-match email filter, same join and ordering as `list_appointments`.
    async fn list_appointments_by_email(&self, email: &str)
        -> Result<Vec<Appointment>, StoreError>;

    /// Slot timestamp within [start, end] inclusive.
    async fn list_appointments_by_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, StoreError>;

    async fn find_appointment_by_code(&self, code: &str)
        -> Result<Option<Appointment>, StoreError>;

    async fn create_appointment(&self, new: NewAppointment) -> Result<Appointment, StoreError>;

    async fn update_appointment(
        &self,
        id: Uuid,
        update: AppointmentUpdate,
    ) -> Result<Option<Appointment>, StoreError>;

    /// Remove the appointment row, returning the persisted record so the
    /// caller can release the referenced slot.
    async fn remove_appointment(&self, id: Uuid)
        -> Result<Option<AppointmentRecord>, StoreError>;
}

/// The injected persistence handle carried in router state and handed to
/// services. Only the booking coordinator performs compound mutations
/// spanning both halves.
pub trait SchedulingStore: SlotStore + AppointmentStore {}

impl<T: SlotStore + AppointmentStore> SchedulingStore for T {}
