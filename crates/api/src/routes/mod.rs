pub mod health;
pub mod photo;
pub mod records;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{feedback, home};
use crate::state::AppState;

/// Build the API route tree.
///
/// ```text
/// /records                  records::router
/// /photo/...                photo::router
/// GET  /home                home::get_homepage
/// POST /feedback            feedback::submit
/// ```
pub fn api_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .nest("/records", records::router())
        .merge(photo::router(max_upload_bytes))
        .route("/home", get(home::get_homepage))
        .route("/feedback", post(feedback::submit))
}
