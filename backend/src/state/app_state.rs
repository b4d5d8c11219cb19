// Application state shared by all request handlers
// Holds the recommendation service and the loaded configuration

use crate::config::Config;
use crate::recommendations::RecommendationStore;
use crate::services::RecommendationService;
use std::sync::Arc;

/// Main application state
///
/// Cloned into every handler by axum; all fields are reference counted.
#[derive(Clone)]
pub struct AppState {
    /// Recommendation business rules over the configured store
    pub recommendations: Arc<RecommendationService>,
    /// Loaded configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Build state around an opened store
    pub fn new(store: Arc<dyn RecommendationStore>, config: Config) -> Self {
        Self {
            recommendations: Arc::new(RecommendationService::new(store)),
            config: Arc::new(config),
        }
    }
}
