use std::sync::Arc;

use crate::services::providers::ImageUrls;
use crate::services::{CatalogProvider, Identity, LatestRecommendations, PreferenceTracker};

/// Shared application state
///
/// The tracker is the single writer of history/watchlist state; the catalog
/// and identity collaborators sit behind traits so tests can stub them.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogProvider>,
    pub identity: Arc<dyn Identity>,
    pub tracker: Arc<PreferenceTracker>,
    pub images: ImageUrls,
    pub recommendations: Arc<LatestRecommendations>,
}

impl AppState {
    pub fn new(
        catalog: Arc<dyn CatalogProvider>,
        identity: Arc<dyn Identity>,
        tracker: Arc<PreferenceTracker>,
        images: ImageUrls,
    ) -> Self {
        Self {
            catalog,
            identity,
            tracker,
            images,
            recommendations: Arc::new(LatestRecommendations::new()),
        }
    }
}
