//! Handler for the feedback form.

use axum::extract::State;
use axum::Json;
use wealthlist_core::feedback::FeedbackSubmission;

use crate::error::AppResult;
use crate::extract::ValidatedJson;
use crate::response::MessageResponse;
use crate::state::AppState;

/// POST /feedback
///
/// `name`, `email` and `message` are validated here, so an invalid
/// submission never reaches the mailer.
pub async fn submit(
    State(state): State<AppState>,
    ValidatedJson(submission): ValidatedJson<FeedbackSubmission>,
) -> AppResult<Json<MessageResponse>> {
    state.feedback.send(&submission).await?;
    Ok(Json(MessageResponse::new("Feedback sent")))
}
