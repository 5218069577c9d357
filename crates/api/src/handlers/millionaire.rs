//! Handlers for the `/records` resource.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use wealthlist_core::error::CoreError;
use wealthlist_core::pagination::Paginated;
use wealthlist_core::types::DbId;
use wealthlist_db::models::millionaire::{Millionaire, MillionaireInput};

use crate::error::{AppError, AppResult};
use crate::extract::{RecordId, ValidatedJson};
use crate::query::{PageParams, SearchParams};
use crate::response::MessageResponse;
use crate::state::AppState;

/// GET /records
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<Paginated<Millionaire>>> {
    let page = state.millionaires.list(params.page_request()).await?;
    Ok(Json(page))
}

/// GET /records/search
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Paginated<Millionaire>>> {
    let page = state
        .millionaires
        .search(&params.filter(), params.page_request())
        .await?;
    Ok(Json(page))
}

/// GET /records/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RecordId(id): RecordId,
) -> AppResult<Json<Millionaire>> {
    state
        .millionaires
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

/// POST /records
pub async fn create(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<MillionaireInput>,
) -> AppResult<(StatusCode, Json<Millionaire>)> {
    let millionaire = state.millionaires.create(input).await?;
    Ok((StatusCode::CREATED, Json(millionaire)))
}

/// PUT /records/{id}
///
/// Replaces every field except the photo path.
pub async fn update(
    State(state): State<AppState>,
    RecordId(id): RecordId,
    ValidatedJson(input): ValidatedJson<MillionaireInput>,
) -> AppResult<Json<Millionaire>> {
    state
        .millionaires
        .update(id, input)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

/// DELETE /records/{id}
pub async fn delete(
    State(state): State<AppState>,
    RecordId(id): RecordId,
) -> AppResult<Json<MessageResponse>> {
    if !state.millionaires.delete(id).await? {
        return Err(not_found(id));
    }
    Ok(Json(MessageResponse::new(format!("Millionaire {id} deleted"))))
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Millionaire",
        id,
    })
}
