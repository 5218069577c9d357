use std::sync::Arc;

use wealthlist_core::pagination::{PageRequest, Paginated};
use wealthlist_core::search::MillionaireFilter;
use wealthlist_core::types::DbId;
use wealthlist_db::models::millionaire::{Millionaire, MillionaireInput};
use wealthlist_db::MillionaireStore;

/// Record operations. Storage errors are returned unchanged.
#[derive(Clone)]
pub struct MillionaireService {
    store: Arc<dyn MillionaireStore>,
}

impl MillionaireService {
    pub fn new(store: Arc<dyn MillionaireStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, input: MillionaireInput) -> Result<Millionaire, sqlx::Error> {
        let input = input.normalized();
        tracing::info!(op = "millionaire.create", last_name = %input.last_name, "Creating millionaire");

        match self.store.create(&input).await {
            Ok(created) => {
                tracing::info!(op = "millionaire.create", id = created.id, "Millionaire created");
                Ok(created)
            }
            Err(e) => {
                tracing::error!(op = "millionaire.create", error = %e, "Failed to create millionaire");
                Err(e)
            }
        }
    }

    pub async fn get_by_id(&self, id: DbId) -> Result<Option<Millionaire>, sqlx::Error> {
        tracing::debug!(op = "millionaire.get", id, "Fetching millionaire");
        self.store.find_by_id(id).await.inspect_err(|e| {
            tracing::error!(op = "millionaire.get", id, error = %e, "Failed to fetch millionaire");
        })
    }

    /// `None` when no record has this id.
    pub async fn update(
        &self,
        id: DbId,
        input: MillionaireInput,
    ) -> Result<Option<Millionaire>, sqlx::Error> {
        let input = input.normalized();
        tracing::info!(op = "millionaire.update", id, "Updating millionaire");

        let updated = self.store.update(id, &input).await.inspect_err(|e| {
            tracing::error!(op = "millionaire.update", id, error = %e, "Failed to update millionaire");
        })?;

        match &updated {
            Some(_) => tracing::info!(op = "millionaire.update", id, "Millionaire updated"),
            None => tracing::info!(op = "millionaire.update", id, "No millionaire to update"),
        }
        Ok(updated)
    }

    /// `false` when no record has this id. A stored photo file is left in place.
    pub async fn delete(&self, id: DbId) -> Result<bool, sqlx::Error> {
        tracing::info!(op = "millionaire.delete", id, "Deleting millionaire");

        let deleted = self.store.delete(id).await.inspect_err(|e| {
            tracing::error!(op = "millionaire.delete", id, error = %e, "Failed to delete millionaire");
        })?;

        tracing::info!(op = "millionaire.delete", id, deleted, "Delete finished");
        Ok(deleted)
    }

    pub async fn list(&self, page: PageRequest) -> Result<Paginated<Millionaire>, sqlx::Error> {
        self.search(&MillionaireFilter::default(), page).await
    }

    /// Page through records matching `filter`. Out-of-range paging values
    /// are normalised before reaching the store.
    pub async fn search(
        &self,
        filter: &MillionaireFilter,
        page: PageRequest,
    ) -> Result<Paginated<Millionaire>, sqlx::Error> {
        let page = page.normalized();
        tracing::debug!(
            op = "millionaire.search",
            last_name = %filter.last_name,
            first_name = %filter.first_name,
            middle_name = %filter.middle_name,
            country = %filter.country,
            page = page.page,
            page_size = page.page_size,
            "Searching millionaires"
        );

        match self.store.search(filter, page).await {
            Ok(result) => {
                tracing::debug!(
                    op = "millionaire.search",
                    returned = result.items.len(),
                    total = result.total,
                    "Search finished"
                );
                Ok(result)
            }
            Err(e) => {
                tracing::error!(
                    op = "millionaire.search",
                    ?filter,
                    page = page.page,
                    page_size = page.page_size,
                    error = %e,
                    "Search failed"
                );
                Err(e)
            }
        }
    }

    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        self.store.health_check().await
    }
}
