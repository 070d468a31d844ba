use std::sync::Arc;

use crate::models::Dataset;
use crate::services::Recommender;

/// Shared application state
///
/// The dataset is read-only after startup, so no lock is needed; the engine's
/// feature caches handle their own synchronization.
#[derive(Clone)]
pub struct AppState {
    pub recommender: Arc<Recommender>,
}

impl AppState {
    pub fn new(recommender: Recommender) -> Self {
        Self {
            recommender: Arc::new(recommender),
        }
    }

    pub fn dataset(&self) -> &Dataset {
        self.recommender.dataset()
    }
}
