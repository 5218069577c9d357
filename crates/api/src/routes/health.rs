use axum::routing::get;
use axum::Router;

use crate::handlers::health;
use crate::state::AppState;

/// Mount the health check at `/health`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health::health_check))
}
