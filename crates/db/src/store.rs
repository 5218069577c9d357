//! The record storage capability used by the service layer.
//!
//! [`MillionaireStore`] is implemented for the Postgres pool by delegating
//! to [`MillionaireRepo`]. Tests substitute in-memory implementations.

use async_trait::async_trait;
use wealthlist_core::pagination::{PageRequest, Paginated};
use wealthlist_core::search::MillionaireFilter;
use wealthlist_core::types::DbId;

use crate::models::millionaire::{Millionaire, MillionaireInput};
use crate::repositories::MillionaireRepo;
use crate::DbPool;

#[async_trait]
pub trait MillionaireStore: Send + Sync {
    async fn create(&self, input: &MillionaireInput) -> Result<Millionaire, sqlx::Error>;

    async fn find_by_id(&self, id: DbId) -> Result<Option<Millionaire>, sqlx::Error>;

    /// `None` when no row has this id.
    async fn update(
        &self,
        id: DbId,
        input: &MillionaireInput,
    ) -> Result<Option<Millionaire>, sqlx::Error>;

    /// `false` when no row has this id.
    async fn delete(&self, id: DbId) -> Result<bool, sqlx::Error>;

    async fn search(
        &self,
        filter: &MillionaireFilter,
        page: PageRequest,
    ) -> Result<Paginated<Millionaire>, sqlx::Error>;

    async fn top_by_net_worth(&self, limit: i64) -> Result<Vec<Millionaire>, sqlx::Error>;

    async fn photo_path(&self, id: DbId) -> Result<Option<String>, sqlx::Error>;

    async fn set_photo_path(&self, id: DbId, path: Option<&str>) -> Result<bool, sqlx::Error>;

    /// All-or-nothing; see [`MillionaireRepo::batch_set_photo_paths`].
    async fn batch_set_photo_paths(&self, paths: &[(DbId, String)]) -> Result<u64, sqlx::Error>;

    async fn health_check(&self) -> Result<(), sqlx::Error>;
}

#[async_trait]
impl MillionaireStore for DbPool {
    async fn create(&self, input: &MillionaireInput) -> Result<Millionaire, sqlx::Error> {
        MillionaireRepo::create(self, input).await
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Millionaire>, sqlx::Error> {
        MillionaireRepo::find_by_id(self, id).await
    }

    async fn update(
        &self,
        id: DbId,
        input: &MillionaireInput,
    ) -> Result<Option<Millionaire>, sqlx::Error> {
        MillionaireRepo::update(self, id, input).await
    }

    async fn delete(&self, id: DbId) -> Result<bool, sqlx::Error> {
        MillionaireRepo::delete(self, id).await
    }

    async fn search(
        &self,
        filter: &MillionaireFilter,
        page: PageRequest,
    ) -> Result<Paginated<Millionaire>, sqlx::Error> {
        MillionaireRepo::search(self, filter, page).await
    }

    async fn top_by_net_worth(&self, limit: i64) -> Result<Vec<Millionaire>, sqlx::Error> {
        MillionaireRepo::top_by_net_worth(self, limit).await
    }

    async fn photo_path(&self, id: DbId) -> Result<Option<String>, sqlx::Error> {
        MillionaireRepo::photo_path(self, id).await
    }

    async fn set_photo_path(&self, id: DbId, path: Option<&str>) -> Result<bool, sqlx::Error> {
        MillionaireRepo::set_photo_path(self, id, path).await
    }

    async fn batch_set_photo_paths(&self, paths: &[(DbId, String)]) -> Result<u64, sqlx::Error> {
        MillionaireRepo::batch_set_photo_paths(self, paths).await
    }

    async fn health_check(&self) -> Result<(), sqlx::Error> {
        crate::health_check(self).await
    }
}
