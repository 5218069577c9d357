use std::sync::Arc;

use wealthlist_db::MillionaireStore;

use crate::config::AppConfig;
use crate::mail::Mailer;
use crate::services::{FeedbackService, HomepageService, MillionaireService, PhotoService};
use crate::storage::PhotoStorage;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; every service holds its dependencies behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub millionaires: MillionaireService,
    pub photos: PhotoService,
    pub feedback: FeedbackService,
    pub homepage: HomepageService,
}

impl AppState {
    /// Wire the services to their capabilities.
    pub fn new(
        config: AppConfig,
        store: Arc<dyn MillionaireStore>,
        storage: Arc<dyn PhotoStorage>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        let photos = PhotoService::new(Arc::clone(&store), storage, config.photos.dir.clone());
        Self {
            millionaires: MillionaireService::new(Arc::clone(&store)),
            homepage: HomepageService::new(store),
            feedback: FeedbackService::new(mailer),
            photos,
            config: Arc::new(config),
        }
    }
}
