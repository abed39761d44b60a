use std::sync::Arc;

use shared_config::AppConfig;

use crate::store::SchedulingStore;

/// Shared router state: configuration plus the injected store handle.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<dyn SchedulingStore>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn SchedulingStore>) -> Self {
        Self { config, store }
    }
}
