//! Handlers for `/photo`.
//!
//! `GET /photo/{fileName}` serves a stored file; the other methods take a
//! record id in the same position.

use std::collections::BTreeMap;
use std::io;

use axum::body::Body;
use axum::extract::{Multipart, Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures::TryStreamExt;
use serde::Deserialize;
use tokio_util::io::{ReaderStream, StreamReader};
use validator::Validate;
use wealthlist_core::photo::content_type_for;
use wealthlist_core::types::DbId;

use crate::error::{AppError, AppResult};
use crate::extract::{RecordId, ValidatedJson};
use crate::response::{BatchUpdated, MessageResponse, PhotoStored};
use crate::state::AppState;

/// Multipart field that carries the image.
pub const PHOTO_FIELD: &str = "photo";

/// Whether an upload creates the first photo or replaces an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UploadMode {
    Attach,
    Replace,
}

/// Body of `PUT /photo/paths`: record id to bare file name.
#[derive(Debug, Deserialize, Validate)]
pub struct PhotoPathsRequest {
    pub paths: BTreeMap<DbId, String>,
}

/// GET /photo/{fileName}
pub async fn serve(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
) -> AppResult<Response> {
    let photo = state.photos.open(&file_name).await?;

    let headers = [
        (header::CONTENT_TYPE, content_type_for(&file_name).to_string()),
        (header::CONTENT_LENGTH, photo.len.to_string()),
    ];
    Ok((headers, Body::from_stream(ReaderStream::new(photo.reader))).into_response())
}

/// GET /photo/
pub async fn missing_name() -> AppError {
    AppError::BadRequest("Photo file name is required".to_string())
}

/// POST /photo/{recordId}
///
/// Multipart form with the image in the `photo` field.
pub async fn upload(
    State(state): State<AppState>,
    RecordId(id): RecordId,
    multipart: Multipart,
) -> AppResult<Json<PhotoStored>> {
    let photo_path = store_upload(&state, id, multipart, UploadMode::Attach).await?;
    Ok(Json(PhotoStored {
        message: "Photo uploaded".to_string(),
        photo_path,
    }))
}

/// PUT /photo/{recordId}
///
/// Like upload, then removes the file it replaces.
pub async fn replace(
    State(state): State<AppState>,
    RecordId(id): RecordId,
    multipart: Multipart,
) -> AppResult<Json<PhotoStored>> {
    let photo_path = store_upload(&state, id, multipart, UploadMode::Replace).await?;
    Ok(Json(PhotoStored {
        message: "Photo replaced".to_string(),
        photo_path,
    }))
}

/// DELETE /photo/{recordId}
pub async fn delete(
    State(state): State<AppState>,
    RecordId(id): RecordId,
) -> AppResult<Json<MessageResponse>> {
    state.photos.delete(id).await?;
    Ok(Json(MessageResponse::new("Photo deleted")))
}

/// PUT /photo/paths
pub async fn reassign(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<PhotoPathsRequest>,
) -> AppResult<Json<BatchUpdated>> {
    if body.paths.is_empty() {
        return Err(AppError::BadRequest("No photo paths supplied".to_string()));
    }
    let assignments: Vec<(DbId, String)> = body.paths.into_iter().collect();
    let updated = state.photos.reassign_paths(&assignments).await?;
    Ok(Json(BatchUpdated { updated }))
}

/// Stream the `photo` field straight to storage without buffering it.
async fn store_upload(
    state: &AppState,
    id: DbId,
    mut multipart: Multipart,
    mode: UploadMode,
) -> AppResult<String> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        if field.name() != Some(PHOTO_FIELD) {
            continue;
        }

        let original = field.file_name().unwrap_or_default().to_string();
        let reader = StreamReader::new(
            field.map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e)),
        );
        tokio::pin!(reader);

        return match mode {
            UploadMode::Attach => {
                state
                    .photos
                    .upload_and_attach(id, &mut reader, &original)
                    .await
            }
            UploadMode::Replace => state.photos.replace(id, &mut reader, &original).await,
        };
    }

    Err(AppError::BadRequest(format!(
        "Missing required '{PHOTO_FIELD}' field"
    )))
}
