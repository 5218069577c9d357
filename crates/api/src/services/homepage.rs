//! Landing page aggregation.
//!
//! The "top" records are the richest ones: net worth descending, unknown
//! net worth last, ties broken by id.

use std::sync::Arc;

use serde::Serialize;
use wealthlist_core::photo::file_name_of;
use wealthlist_db::models::millionaire::Millionaire;
use wealthlist_db::MillionaireStore;

/// How many records the landing page shows.
pub const HOMEPAGE_TOP_LIMIT: i64 = 10;

/// A record plus the absolute URL of its photo, if it has one.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomepageEntry {
    #[serde(flatten)]
    pub millionaire: Millionaire,
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomepageData {
    pub top_millionaires: Vec<HomepageEntry>,
}

#[derive(Clone)]
pub struct HomepageService {
    store: Arc<dyn MillionaireStore>,
}

impl HomepageService {
    pub fn new(store: Arc<dyn MillionaireStore>) -> Self {
        Self { store }
    }

    /// `base_url` is the scheme and authority the client used, without a
    /// trailing slash, e.g. `http://localhost:8080`.
    pub async fn get_homepage_data(&self, base_url: &str) -> Result<HomepageData, sqlx::Error> {
        tracing::debug!(op = "homepage.get", base_url, "Loading homepage");

        let top = self
            .store
            .top_by_net_worth(HOMEPAGE_TOP_LIMIT)
            .await
            .inspect_err(|e| {
                tracing::error!(op = "homepage.get", error = %e, "Failed to load top millionaires");
            })?;

        let base_url = base_url.trim_end_matches('/');
        let top_millionaires = top
            .into_iter()
            .map(|millionaire| HomepageEntry {
                photo_url: photo_url(base_url, millionaire.path_to_photo.as_deref()),
                millionaire,
            })
            .collect();

        Ok(HomepageData { top_millionaires })
    }
}

fn photo_url(base_url: &str, stored: Option<&str>) -> Option<String> {
    let name = file_name_of(stored?.trim());
    (!name.is_empty()).then(|| format!("{base_url}/photo/{name}"))
}
