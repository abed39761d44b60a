use std::sync::{Arc, OnceLock};

use rand::Rng;
use regex::Regex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_models::scheduling::Appointment;
use shared_storage::{AppointmentUpdate, NewAppointment, SchedulingStore, StoreError};

use crate::models::{AppointmentQueryParams, BookingError, BookingRequest};
use crate::services::notification::ConfirmationSender;

const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const CODE_LENGTH: usize = 6;
const CODE_ATTEMPTS: usize = 8;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap())
}

/// The booking coordinator: the only component that mutates slots and
/// appointments together. The claim of the slot is the linearization point,
/// so two concurrent bookings for the same slot can never both succeed.
pub struct BookingService {
    store: Arc<dyn SchedulingStore>,
    notifier: Arc<dyn ConfirmationSender>,
}

impl BookingService {
    pub fn new(store: Arc<dyn SchedulingStore>, notifier: Arc<dyn ConfirmationSender>) -> Self {
        Self { store, notifier }
    }

    /// Book the slot matching the requested (timestamp, service kind).
    ///
    /// Availability is re-checked at commit time regardless of what the
    /// caller observed earlier; the claim and the availability flip are one
    /// atomic store operation. The confirmation notification is dispatched
    /// fire-and-forget once the booking is durable.
    pub async fn create_booking(
        &self,
        request: BookingRequest,
    ) -> Result<Appointment, BookingError> {
        validate_booking_request(&request)?;

        debug!(
            "Booking attempt for {} ({}) by {}",
            request.data_hora, request.servico, request.email_cliente
        );

        let Some(slot) = self
            .store
            .claim_slot(request.data_hora, request.servico)
            .await?
        else {
            warn!(
                "No available slot for {} ({})",
                request.data_hora, request.servico
            );
            return Err(BookingError::SlotUnavailable);
        };

        let codigo_confirmacao = match self.generate_confirmation_code().await {
            Ok(code) => code,
            Err(err) => {
                self.release_claimed(slot.id).await;
                return Err(err);
            }
        };

        let insert = NewAppointment {
            slot_id: slot.id,
            nome_cliente: request.nome_cliente.trim().to_string(),
            email_cliente: request.email_cliente,
            telefone_cliente: request.telefone_cliente,
            empresa_cliente: request.empresa_cliente,
            observacoes: request.observacoes,
            status: request.status.unwrap_or_default(),
            codigo_confirmacao,
        };

        let appointment = match self.store.create_appointment(insert).await {
            Ok(appointment) => appointment,
            Err(err) => {
                self.release_claimed(slot.id).await;
                return Err(err.into());
            }
        };

        info!(
            "Appointment {} booked against slot {} with code {}",
            appointment.id, slot.id, appointment.codigo_confirmacao
        );

        self.dispatch_confirmation(&appointment);
        Ok(appointment)
    }

    /// Cancel a booking: the appointment row is deleted (never soft-cancelled)
    /// and its slot returns to the bookable pool.
    pub async fn cancel_booking(&self, appointment_id: Uuid) -> Result<(), BookingError> {
        let Some(record) = self.store.remove_appointment(appointment_id).await? else {
            return Err(BookingError::NotFound);
        };

        if !self.store.release_slot(record.slot_id).await? {
            warn!(
                "Cancelled appointment {} referenced missing slot {}",
                appointment_id, record.slot_id
            );
        }

        info!(
            "Appointment {} cancelled, slot {} released",
            appointment_id, record.slot_id
        );
        Ok(())
    }

    /// List appointments, optionally filtered by exact email or by an
    /// inclusive slot-timestamp range. Email takes precedence when both
    /// filters are supplied.
    pub async fn list(
        &self,
        query: &AppointmentQueryParams,
    ) -> Result<Vec<Appointment>, BookingError> {
        if let Some(email) = &query.email {
            return Ok(self.store.list_appointments_by_email(email).await?);
        }
        if let (Some(start), Some(end)) = (query.start_date, query.end_date) {
            return Ok(self.store.list_appointments_by_range(start, end).await?);
        }
        Ok(self.store.list_appointments().await?)
    }

    pub async fn find_by_code(&self, code: &str) -> Result<Appointment, BookingError> {
        self.store
            .find_appointment_by_code(code)
            .await?
            .ok_or(BookingError::NotFound)
    }

    /// Partial update of the mutable fields (status, notes) only.
    pub async fn update(
        &self,
        appointment_id: Uuid,
        update: AppointmentUpdate,
    ) -> Result<Appointment, BookingError> {
        if update.is_empty() {
            return Err(BookingError::Validation(
                "no updatable fields provided".into(),
            ));
        }
        self.store
            .update_appointment(appointment_id, update)
            .await?
            .ok_or(BookingError::NotFound)
    }

    async fn generate_confirmation_code(&self) -> Result<String, BookingError> {
        for _ in 0..CODE_ATTEMPTS {
            let code = random_code();
            if self.store.find_appointment_by_code(&code).await?.is_none() {
                return Ok(code);
            }
            debug!("Confirmation code collision, regenerating");
        }
        Err(BookingError::Store(
            "could not allocate a unique confirmation code".into(),
        ))
    }

    async fn release_claimed(&self, slot_id: Uuid) {
        if let Err(err) = self.store.release_slot(slot_id).await {
            warn!("Failed to release claimed slot {}: {}", slot_id, err);
        }
    }

    fn dispatch_confirmation(&self, appointment: &Appointment) {
        let notifier = Arc::clone(&self.notifier);
        let appointment = appointment.clone();
        tokio::spawn(async move {
            if let Err(err) = notifier.send_confirmation(&appointment).await {
                warn!(
                    "Confirmation notification for appointment {} failed: {}",
                    appointment.id, err
                );
            }
        });
    }
}

fn validate_booking_request(request: &BookingRequest) -> Result<(), BookingError> {
    if request.nome_cliente.trim().chars().count() < 2 {
        return Err(BookingError::Validation(
            "nomeCliente must have at least 2 characters".into(),
        ));
    }
    if !email_regex().is_match(&request.email_cliente) {
        return Err(BookingError::Validation(
            "emailCliente is not a valid email address".into(),
        ));
    }
    Ok(())
}

fn random_code() -> String {
    let mut rng = rand::thread_rng();
    (0..CODE_LENGTH)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

impl From<StoreError> for BookingError {
    fn from(err: StoreError) -> Self {
        BookingError::Store(err.to_string())
    }
}
