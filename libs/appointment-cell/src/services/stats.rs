use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate, Utc};
use tracing::debug;

use shared_models::scheduling::ServiceKind;
use shared_storage::SchedulingStore;

use crate::models::{BookingError, DashboardStats};

/// Derives the dashboard aggregates by scanning current store snapshots.
/// Nothing is persisted; every call recomputes from scratch.
pub struct StatsService {
    store: Arc<dyn SchedulingStore>,
}

impl StatsService {
    pub fn new(store: Arc<dyn SchedulingStore>) -> Self {
        Self { store }
    }

    pub async fn dashboard(&self) -> Result<DashboardStats, BookingError> {
        let appointments = self.store.list_appointments().await?;
        let slots = self.store.list_slots().await?;

        // One observation of "now" feeds every window bound, so the day and
        // week filters always agree on which day it is.
        let now = Utc::now();
        let today = now.date_naive();
        let (day_start, day_end) = day_window(today);

        let week_first = today - Duration::days(now.weekday().num_days_from_sunday() as i64);
        let (week_start, _) = day_window(week_first);
        let (_, week_end) = day_window(week_first + Duration::days(6));

        let today_appointments = appointments
            .iter()
            .filter(|a| a.data_hora >= day_start && a.data_hora <= day_end)
            .count();
        let week_appointments = appointments
            .iter()
            .filter(|a| a.data_hora >= week_start && a.data_hora <= week_end)
            .count();
        let total_carregamentos = appointments
            .iter()
            .filter(|a| a.servico == ServiceKind::Carregamento)
            .count();
        let total_descarregamentos = appointments
            .iter()
            .filter(|a| a.servico == ServiceKind::Descarregamento)
            .count();
        let available_slots = slots.iter().filter(|s| s.disponivel).count();
        let occupied_slots = slots.iter().filter(|s| !s.disponivel).count();

        debug!(
            "Dashboard recomputed: {} appointments, {} slots",
            appointments.len(),
            slots.len()
        );

        Ok(DashboardStats {
            today_appointments,
            week_appointments,
            total_carregamentos,
            total_descarregamentos,
            available_slots,
            occupied_slots,
        })
    }
}

fn day_window(date: NaiveDate) -> (chrono::DateTime<Utc>, chrono::DateTime<Utc>) {
    let start = date.and_hms_milli_opt(0, 0, 0, 0).unwrap().and_utc();
    let end = date.and_hms_milli_opt(23, 59, 59, 999).unwrap().and_utc();
    (start, end)
}
