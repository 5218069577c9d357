//! Photo upload, replacement, removal and lookup.
//!
//! Files live in one flat directory behind [`PhotoStorage`]; the record's
//! `path_to_photo` column holds `{photo_dir}/{file_name}`. Deleting a photo
//! is two steps (remove file, clear column) and is not atomic: a failure
//! between them leaves a record pointing at a missing file.

use std::sync::Arc;

use tokio::io::AsyncRead;
use wealthlist_core::error::CoreError;
use wealthlist_core::photo::{
    file_name_of, generate_file_name, stored_path, validate_file_name,
};
use wealthlist_core::types::DbId;
use wealthlist_db::MillionaireStore;

use crate::error::AppResult;
use crate::storage::{PhotoFile, PhotoStorage};

#[derive(Clone)]
pub struct PhotoService {
    store: Arc<dyn MillionaireStore>,
    storage: Arc<dyn PhotoStorage>,
    photo_dir: String,
}

impl PhotoService {
    pub fn new(
        store: Arc<dyn MillionaireStore>,
        storage: Arc<dyn PhotoStorage>,
        photo_dir: impl Into<String>,
    ) -> Self {
        Self {
            store,
            storage,
            photo_dir: photo_dir.into(),
        }
    }

    /// Write a new uniquely named file and return its stored path.
    /// Does not touch the record.
    pub async fn upload(
        &self,
        owner_id: DbId,
        reader: &mut (dyn AsyncRead + Send + Unpin),
        original_filename: &str,
    ) -> AppResult<String> {
        let file_name = generate_file_name(owner_id, original_filename)?;
        tracing::info!(op = "photo.upload", owner_id, %file_name, "Storing photo");

        let bytes = self.storage.save(&file_name, reader).await.inspect_err(|e| {
            tracing::error!(op = "photo.upload", owner_id, %file_name, error = %e, "Failed to store photo");
        })?;

        tracing::info!(op = "photo.upload", owner_id, %file_name, bytes, "Photo stored");
        Ok(stored_path(&self.photo_dir, &file_name))
    }

    pub async fn attach_to_record(&self, owner_id: DbId, path: &str) -> AppResult<()> {
        tracing::info!(op = "photo.attach", owner_id, path, "Attaching photo");
        if !self.store.set_photo_path(owner_id, Some(path)).await? {
            return Err(not_found(owner_id));
        }
        Ok(())
    }

    pub async fn get_path(&self, owner_id: DbId) -> AppResult<Option<String>> {
        Ok(self.store.photo_path(owner_id).await?)
    }

    pub async fn clear_path(&self, owner_id: DbId) -> AppResult<()> {
        tracing::info!(op = "photo.clear", owner_id, "Clearing photo path");
        if !self.store.set_photo_path(owner_id, None).await? {
            return Err(not_found(owner_id));
        }
        Ok(())
    }

    /// Upload for an existing record and point the record at the new file.
    ///
    /// The record is checked first so no file is written for a missing id.
    /// If attaching fails, the new file is removed again.
    pub async fn upload_and_attach(
        &self,
        owner_id: DbId,
        reader: &mut (dyn AsyncRead + Send + Unpin),
        original_filename: &str,
    ) -> AppResult<String> {
        if self.store.find_by_id(owner_id).await?.is_none() {
            return Err(not_found(owner_id));
        }

        let path = self.upload(owner_id, reader, original_filename).await?;
        if let Err(e) = self.attach_to_record(owner_id, &path).await {
            self.discard(file_name_of(&path)).await;
            return Err(e);
        }
        Ok(path)
    }

    /// Upload and attach a new photo, then remove the one it replaces.
    ///
    /// A previous file that is already gone, or cannot be removed, does not
    /// fail the replacement.
    pub async fn replace(
        &self,
        owner_id: DbId,
        reader: &mut (dyn AsyncRead + Send + Unpin),
        original_filename: &str,
    ) -> AppResult<String> {
        let previous = self.get_path(owner_id).await?;
        let path = self
            .upload_and_attach(owner_id, reader, original_filename)
            .await?;

        if let Some(previous) = previous.filter(|p| *p != path) {
            self.discard(file_name_of(&previous)).await;
        }
        tracing::info!(op = "photo.replace", owner_id, %path, "Photo replaced");
        Ok(path)
    }

    /// Remove the record's photo file and clear its path.
    ///
    /// A record without a stored path is `NotFound` and storage is not
    /// touched. A file that is already absent counts as removed.
    pub async fn delete(&self, owner_id: DbId) -> AppResult<()> {
        let Some(path) = self.get_path(owner_id).await? else {
            tracing::info!(op = "photo.delete", owner_id, "No photo to delete");
            return Err(CoreError::NotFound {
                entity: "Photo",
                id: owner_id,
            }
            .into());
        };

        let file_name = file_name_of(&path);
        tracing::info!(op = "photo.delete", owner_id, file_name, "Deleting photo");

        let removed = self.storage.remove(file_name).await.inspect_err(|e| {
            tracing::error!(op = "photo.delete", owner_id, file_name, error = %e, "Failed to remove photo file");
        })?;
        if !removed {
            tracing::warn!(op = "photo.delete", owner_id, file_name, "Photo file was already absent");
        }

        self.clear_path(owner_id).await?;
        tracing::info!(op = "photo.delete", owner_id, "Photo deleted");
        Ok(())
    }

    /// Open a photo by bare file name for streaming.
    pub async fn open(&self, file_name: &str) -> AppResult<PhotoFile> {
        let file_name = validate_file_name(file_name)?;
        match self.storage.open(file_name).await? {
            Some(file) => Ok(file),
            None => {
                tracing::debug!(op = "photo.serve", file_name, "Photo not found");
                Err(CoreError::FileNotFound(file_name.to_string()).into())
            }
        }
    }

    /// Point several records at existing photo files in one transaction.
    ///
    /// Every name must be a bare file name; an unknown id rolls the whole
    /// batch back.
    pub async fn reassign_paths(&self, assignments: &[(DbId, String)]) -> AppResult<u64> {
        let mut paths = Vec::with_capacity(assignments.len());
        for (id, file_name) in assignments {
            let file_name = validate_file_name(file_name.trim())?;
            paths.push((*id, stored_path(&self.photo_dir, file_name)));
        }

        tracing::info!(op = "photo.batch", count = paths.len(), "Reassigning photo paths");
        let updated = self
            .store
            .batch_set_photo_paths(&paths)
            .await
            .inspect_err(|e| {
                tracing::error!(op = "photo.batch", count = paths.len(), error = %e, "Batch update rolled back");
            })?;
        Ok(updated)
    }

    async fn discard(&self, file_name: &str) {
        if let Err(e) = self.storage.remove(file_name).await {
            tracing::warn!(op = "photo.discard", file_name, error = %e, "Failed to remove photo file");
        }
    }
}

fn not_found(owner_id: DbId) -> crate::error::AppError {
    CoreError::NotFound {
        entity: "Millionaire",
        id: owner_id,
    }
    .into()
}
