use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::explain::NarrationTables;
use crate::ml::ModelArtifacts;

/// Shared application state for API handlers.
///
/// Everything here is read-only after startup; prediction handlers never
/// write shared state.
#[derive(Clone)]
pub struct AppState {
    /// Classifier, scaler and held-out accuracy, loaded or trained once.
    pub artifacts: Arc<ModelArtifacts>,

    /// Narration lookup tables.
    pub tables: Arc<NarrationTables>,

    /// Application start time
    pub start_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(artifacts: ModelArtifacts, tables: NarrationTables) -> Self {
        Self {
            artifacts: Arc::new(artifacts),
            tables: Arc::new(tables),
            start_time: Utc::now(),
        }
    }

    /// Get system uptime in seconds
    pub fn uptime_seconds(&self) -> i64 {
        (Utc::now() - self.start_time).num_seconds()
    }
}
