//! Application state shared across handlers.

use std::sync::Arc;

use relay_debounce::{Coordinator, EntityRegistry};

use crate::config::ApiConfig;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// API configuration.
    pub config: Arc<ApiConfig>,
    /// The trigger coordinator.
    pub coordinator: Arc<Coordinator>,
    /// The tracked-entity registry (for the status page).
    pub registry: Arc<dyn EntityRegistry>,
}

impl AppState {
    /// Creates a new AppState.
    pub fn new(
        config: ApiConfig,
        coordinator: Arc<Coordinator>,
        registry: Arc<dyn EntityRegistry>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            coordinator,
            registry,
        }
    }
}
