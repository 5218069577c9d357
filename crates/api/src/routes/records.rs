//! Route definitions for the `/records` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::millionaire;
use crate::state::AppState;

/// Routes mounted at `/records`.
///
/// ```text
/// GET    /            -> list
/// POST   /            -> create
/// GET    /search      -> search
/// GET    /{id}        -> get_by_id
/// PUT    /{id}        -> update
/// DELETE /{id}        -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(millionaire::list).post(millionaire::create))
        .route("/search", get(millionaire::search))
        .route(
            "/{id}",
            get(millionaire::get_by_id)
                .put(millionaire::update)
                .delete(millionaire::delete),
        )
}
