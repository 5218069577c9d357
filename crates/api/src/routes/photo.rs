//! Route definitions for photo storage.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, put};
use axum::Router;

use crate::handlers::photo;
use crate::state::AppState;

/// Photo routes, merged at the root so `/photo/` can answer 400 itself.
///
/// ```text
/// GET    /photo, /photo/      -> missing_name (400)
/// PUT    /photo/paths         -> reassign
/// GET    /photo/{fileName}    -> serve
/// POST   /photo/{recordId}    -> upload
/// PUT    /photo/{recordId}    -> replace
/// DELETE /photo/{recordId}    -> delete
/// ```
///
/// Request bodies are capped at `max_upload_bytes`.
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/photo", get(photo::missing_name))
        .route("/photo/", get(photo::missing_name))
        .route("/photo/paths", put(photo::reassign))
        .route(
            "/photo/{key}",
            get(photo::serve)
                .post(photo::upload)
                .put(photo::replace)
                .delete(photo::delete),
        )
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}
