use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveTime};
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_models::scheduling::Slot;
use shared_storage::{NewSlot, SchedulingStore, SlotDeletion, SlotUpdate, StoreError};

use crate::models::{BulkWeekRequest, CreateSlotRequest, SlotError};

/// Administrative slot management: publishing, adjusting and withdrawing the
/// bookable pool. Compound booking mutations live in the appointment cell;
/// everything here touches slots only.
pub struct SlotAdminService {
    store: Arc<dyn SchedulingStore>,
}

impl SlotAdminService {
    pub fn new(store: Arc<dyn SchedulingStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<Slot>, SlotError> {
        Ok(self.store.list_slots().await?)
    }

    pub async fn list_by_date(&self, date: NaiveDate) -> Result<Vec<Slot>, SlotError> {
        Ok(self.store.list_slots_by_date(date).await?)
    }

    /// Publish a single slot. No uniqueness check is performed against
    /// existing slots: duplicates for the same (timestamp, service) pair may
    /// coexist, and exclusivity is carried entirely by the availability flag.
    pub async fn create(&self, request: CreateSlotRequest) -> Result<Slot, SlotError> {
        let slot = self
            .store
            .create_slot(NewSlot {
                data_hora: request.data_hora,
                servico: request.servico,
                disponivel: request.disponivel,
            })
            .await?;
        info!("Slot {} published for {} ({})", slot.id, slot.data_hora, slot.servico);
        Ok(slot)
    }

    pub async fn update(&self, id: Uuid, update: SlotUpdate) -> Result<Slot, SlotError> {
        if update.is_empty() {
            return Err(SlotError::Validation("no updatable fields provided".into()));
        }
        self.store
            .update_slot(id, update)
            .await?
            .ok_or(SlotError::NotFound)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), SlotError> {
        match self.store.delete_slot(id).await? {
            SlotDeletion::Deleted => Ok(()),
            SlotDeletion::NotFound => Err(SlotError::NotFound),
            SlotDeletion::Referenced => {
                warn!("Refusing to delete slot {} still referenced by an appointment", id);
                Err(SlotError::Referenced)
            }
        }
    }

    /// Withdraw a batch of slots from the bookable pool. Ids that do not
    /// resolve are skipped silently; the count reflects the slots actually
    /// flipped. Re-blocking an already blocked slot counts as an update.
    pub async fn block(&self, slot_ids: &[Uuid]) -> Result<usize, SlotError> {
        let mut blocked = 0;
        for &id in slot_ids {
            if self.store.set_slot_availability(id, false).await?.is_some() {
                blocked += 1;
            }
        }
        debug!("Blocked {}/{} slots", blocked, slot_ids.len());
        Ok(blocked)
    }

    /// Publish one slot per {time, service} pair for each of the 7 days
    /// starting at `start_date`. Times are validated up front; creation is
    /// not transactional across the batch.
    pub async fn bulk_week(&self, request: BulkWeekRequest) -> Result<Vec<Slot>, SlotError> {
        let mut pairs = Vec::with_capacity(request.time_slots.len());
        for entry in &request.time_slots {
            let time = parse_time_of_day(&entry.time)?;
            pairs.push((time, entry.service));
        }

        let mut created = Vec::with_capacity(pairs.len() * 7);
        for day in 0..7 {
            let date = request.start_date + Duration::days(day);
            for &(time, servico) in &pairs {
                let slot = self
                    .store
                    .create_slot(NewSlot {
                        data_hora: date.and_time(time).and_utc(),
                        servico,
                        disponivel: true,
                    })
                    .await?;
                created.push(slot);
            }
        }
        info!(
            "Bulk-published {} slots for the week starting {}",
            created.len(),
            request.start_date
        );
        Ok(created)
    }
}

fn parse_time_of_day(value: &str) -> Result<NaiveTime, SlotError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| SlotError::Validation(format!("invalid time of day: {value}")))
}

impl From<StoreError> for SlotError {
    fn from(err: StoreError) -> Self {
        SlotError::Store(err.to_string())
    }
}
