use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use shared_models::scheduling::{
    Appointment, AppointmentRecord, ServiceKind, Slot,
};

use crate::store::{
    AppointmentStore, AppointmentUpdate, NewAppointment, NewSlot, SlotDeletion, SlotStore,
    SlotUpdate, StoreError,
};

#[derive(Debug, Default)]
struct Tables {
    slots: HashMap<Uuid, Slot>,
    appointments: HashMap<Uuid, AppointmentRecord>,
}

/// In-memory scheduling store. Both tables live behind a single lock, so
/// every compound primitive (`claim_slot`, the list joins) is atomic with
/// respect to concurrent requests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn day_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = date.and_hms_milli_opt(0, 0, 0, 0).unwrap().and_utc();
    let end = date.and_hms_milli_opt(23, 59, 59, 999).unwrap().and_utc();
    (start, end)
}

fn sorted_slots(mut slots: Vec<Slot>) -> Vec<Slot> {
    slots.sort_by_key(|slot| (slot.data_hora, slot.criado_em));
    slots
}

impl Tables {
    fn joined_appointments<F>(&self, mut keep: F) -> Vec<Appointment>
    where
        F: FnMut(&AppointmentRecord, &Slot) -> bool,
    {
        let mut appointments: Vec<Appointment> = self
            .appointments
            .values()
            .filter_map(|record| {
                let slot = self.slots.get(&record.slot_id)?;
                keep(record, slot).then(|| Appointment::from_parts(record, slot))
            })
            .collect();
        appointments.sort_by_key(|appointment| (appointment.data_hora, appointment.criado_em));
        appointments
    }
}

#[async_trait]
impl SlotStore for MemoryStore {
    async fn list_slots(&self) -> Result<Vec<Slot>, StoreError> {
        let tables = self.tables.read().unwrap();
        Ok(sorted_slots(tables.slots.values().cloned().collect()))
    }

    async fn list_slots_by_date(&self, date: NaiveDate) -> Result<Vec<Slot>, StoreError> {
        let (start, end) = day_bounds(date);
        let tables = self.tables.read().unwrap();
        Ok(sorted_slots(
            tables
                .slots
                .values()
                .filter(|slot| slot.data_hora >= start && slot.data_hora <= end)
                .cloned()
                .collect(),
        ))
    }

    async fn create_slot(&self, new: NewSlot) -> Result<Slot, StoreError> {
        let slot = Slot {
            id: Uuid::new_v4(),
            data_hora: new.data_hora,
            servico: new.servico,
            disponivel: new.disponivel,
            criado_em: Utc::now(),
        };
        let mut tables = self.tables.write().unwrap();
        tables.slots.insert(slot.id, slot.clone());
        Ok(slot)
    }

    async fn update_slot(
        &self,
        id: Uuid,
        update: SlotUpdate,
    ) -> Result<Option<Slot>, StoreError> {
        let mut tables = self.tables.write().unwrap();
        let Some(slot) = tables.slots.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(data_hora) = update.data_hora {
            slot.data_hora = data_hora;
        }
        if let Some(servico) = update.servico {
            slot.servico = servico;
        }
        if let Some(disponivel) = update.disponivel {
            slot.disponivel = disponivel;
        }
        Ok(Some(slot.clone()))
    }

    async fn set_slot_availability(
        &self,
        id: Uuid,
        disponivel: bool,
    ) -> Result<Option<Slot>, StoreError> {
        let mut tables = self.tables.write().unwrap();
        let Some(slot) = tables.slots.get_mut(&id) else {
            return Ok(None);
        };
        slot.disponivel = disponivel;
        Ok(Some(slot.clone()))
    }

    async fn delete_slot(&self, id: Uuid) -> Result<SlotDeletion, StoreError> {
        let mut tables = self.tables.write().unwrap();
        if tables
            .appointments
            .values()
            .any(|record| record.slot_id == id)
        {
            return Ok(SlotDeletion::Referenced);
        }
        Ok(match tables.slots.remove(&id) {
            Some(_) => SlotDeletion::Deleted,
            None => SlotDeletion::NotFound,
        })
    }

    async fn claim_slot(
        &self,
        data_hora: DateTime<Utc>,
        servico: ServiceKind,
    ) -> Result<Option<Slot>, StoreError> {
        let mut tables = self.tables.write().unwrap();
        let candidate = tables
            .slots
            .values()
            .filter(|slot| {
                slot.disponivel && slot.data_hora == data_hora && slot.servico == servico
            })
            .min_by_key(|slot| (slot.criado_em, slot.id))
            .map(|slot| slot.id);
        let Some(id) = candidate else {
            return Ok(None);
        };
        let slot = tables.slots.get_mut(&id).unwrap();
        slot.disponivel = false;
        Ok(Some(slot.clone()))
    }

    async fn release_slot(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().unwrap();
        let Some(slot) = tables.slots.get_mut(&id) else {
            return Ok(false);
        };
        slot.disponivel = true;
        Ok(true)
    }
}

#[async_trait]
impl AppointmentStore for MemoryStore {
    async fn list_appointments(&self) -> Result<Vec<Appointment>, StoreError> {
        let tables = self.tables.read().unwrap();
        Ok(tables.joined_appointments(|_, _| true))
    }

    async fn list_appointments_by_email(
        &self,
        email: &str,
    ) -> Result<Vec<Appointment>, StoreError> {
        let tables = self.tables.read().unwrap();
        Ok(tables.joined_appointments(|record, _| record.email_cliente == email))
    }

    async fn list_appointments_by_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, StoreError> {
        let tables = self.tables.read().unwrap();
        Ok(tables.joined_appointments(|_, slot| slot.data_hora >= start && slot.data_hora <= end))
    }

    async fn find_appointment_by_code(
        &self,
        code: &str,
    ) -> Result<Option<Appointment>, StoreError> {
        let tables = self.tables.read().unwrap();
        Ok(tables
            .joined_appointments(|record, _| record.codigo_confirmacao == code)
            .into_iter()
            .next())
    }

    async fn create_appointment(&self, new: NewAppointment) -> Result<Appointment, StoreError> {
        let record = AppointmentRecord {
            id: Uuid::new_v4(),
            slot_id: new.slot_id,
            nome_cliente: new.nome_cliente,
            email_cliente: new.email_cliente,
            telefone_cliente: new.telefone_cliente,
            empresa_cliente: new.empresa_cliente,
            observacoes: new.observacoes,
            status: new.status,
            codigo_confirmacao: new.codigo_confirmacao,
            criado_em: Utc::now(),
        };
        let mut tables = self.tables.write().unwrap();
        let Some(slot) = tables.slots.get(&record.slot_id) else {
            return Err(StoreError::Backend(format!(
                "appointment references unknown slot {}",
                record.slot_id
            )));
        };
        let appointment = Appointment::from_parts(&record, slot);
        tables.appointments.insert(record.id, record);
        Ok(appointment)
    }

    async fn update_appointment(
        &self,
        id: Uuid,
        update: AppointmentUpdate,
    ) -> Result<Option<Appointment>, StoreError> {
        let mut tables = self.tables.write().unwrap();
        let Some(record) = tables.appointments.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(status) = update.status {
            record.status = status;
        }
        if let Some(observacoes) = update.observacoes {
            record.observacoes = Some(observacoes);
        }
        let record = record.clone();
        let slot = tables.slots.get(&record.slot_id).ok_or_else(|| {
            StoreError::Backend(format!("appointment references unknown slot {}", record.slot_id))
        })?;
        Ok(Some(Appointment::from_parts(&record, slot)))
    }

    async fn remove_appointment(
        &self,
        id: Uuid,
    ) -> Result<Option<AppointmentRecord>, StoreError> {
        let mut tables = self.tables.write().unwrap();
        Ok(tables.appointments.remove(&id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use shared_models::scheduling::AppointmentStatus;

    fn slot_at(hour: u32) -> NewSlot {
        NewSlot {
            data_hora: Utc.with_ymd_and_hms(2024, 6, 10, hour, 0, 0).unwrap(),
            servico: ServiceKind::Carregamento,
            disponivel: true,
        }
    }

    fn booking_for(slot_id: Uuid) -> NewAppointment {
        NewAppointment {
            slot_id,
            nome_cliente: "Ana Silva".into(),
            email_cliente: "ana@x.com".into(),
            telefone_cliente: None,
            empresa_cliente: None,
            observacoes: None,
            status: AppointmentStatus::Confirmado,
            codigo_confirmacao: "A1B2C3".into(),
        }
    }

    #[tokio::test]
    async fn claim_flips_availability_and_second_claim_misses() {
        let store = MemoryStore::new();
        let slot = store.create_slot(slot_at(8)).await.unwrap();

        let claimed = store
            .claim_slot(slot.data_hora, slot.servico)
            .await
            .unwrap()
            .expect("slot should be claimable");
        assert_eq!(claimed.id, slot.id);
        assert!(!claimed.disponivel);

        let second = store.claim_slot(slot.data_hora, slot.servico).await.unwrap();
        assert!(second.is_none());

        assert!(store.release_slot(slot.id).await.unwrap());
        assert!(store
            .claim_slot(slot.data_hora, slot.servico)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn list_by_date_uses_inclusive_day_bounds() {
        let store = MemoryStore::new();
        let date = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let last_ms = date.and_hms_milli_opt(23, 59, 59, 999).unwrap().and_utc();
        let next_midnight = NaiveDate::from_ymd_opt(2024, 6, 11)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            .and_utc();

        let inside = store
            .create_slot(NewSlot {
                data_hora: last_ms,
                servico: ServiceKind::Descarregamento,
                disponivel: true,
            })
            .await
            .unwrap();
        store
            .create_slot(NewSlot {
                data_hora: next_midnight,
                servico: ServiceKind::Descarregamento,
                disponivel: true,
            })
            .await
            .unwrap();

        let listed = store.list_slots_by_date(date).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, inside.id);
    }

    #[tokio::test]
    async fn appointments_join_slot_fields_and_order_by_slot_time() {
        let store = MemoryStore::new();
        let late = store.create_slot(slot_at(14)).await.unwrap();
        let early = store.create_slot(slot_at(8)).await.unwrap();

        store.create_appointment(booking_for(late.id)).await.unwrap();
        let mut second = booking_for(early.id);
        second.codigo_confirmacao = "D4E5F6".into();
        store.create_appointment(second).await.unwrap();

        let listed = store.list_appointments().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].data_hora, early.data_hora);
        assert_eq!(listed[0].servico, ServiceKind::Carregamento);
        assert_eq!(listed[1].data_hora, late.data_hora);
    }

    #[tokio::test]
    async fn referenced_slot_cannot_be_deleted() {
        let store = MemoryStore::new();
        let slot = store.create_slot(slot_at(8)).await.unwrap();
        let appointment = store.create_appointment(booking_for(slot.id)).await.unwrap();

        assert_eq!(
            store.delete_slot(slot.id).await.unwrap(),
            SlotDeletion::Referenced
        );

        store.remove_appointment(appointment.id).await.unwrap();
        assert_eq!(
            store.delete_slot(slot.id).await.unwrap(),
            SlotDeletion::Deleted
        );
        assert_eq!(
            store.delete_slot(slot.id).await.unwrap(),
            SlotDeletion::NotFound
        );
    }

    #[tokio::test]
    async fn update_appointment_touches_only_mutable_fields() {
        let store = MemoryStore::new();
        let slot = store.create_slot(slot_at(8)).await.unwrap();
        let created = store.create_appointment(booking_for(slot.id)).await.unwrap();

        let updated = store
            .update_appointment(
                created.id,
                AppointmentUpdate {
                    status: Some(AppointmentStatus::Pendente),
                    observacoes: Some("chegada pelo portão 3".into()),
                },
            )
            .await
            .unwrap()
            .expect("appointment should exist");

        assert_eq!(updated.status, AppointmentStatus::Pendente);
        assert_eq!(updated.observacoes.as_deref(), Some("chegada pelo portão 3"));
        assert_eq!(updated.nome_cliente, created.nome_cliente);
        assert_eq!(updated.codigo_confirmacao, created.codigo_confirmacao);

        let missing = store
            .update_appointment(Uuid::new_v4(), AppointmentUpdate::default())
            .await
            .unwrap();
        assert!(missing.is_none());
    }
}
