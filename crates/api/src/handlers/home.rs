//! Handler for the landing page payload.

use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::Json;

use crate::error::AppResult;
use crate::services::homepage::HomepageData;
use crate::state::AppState;

const FORWARDED_PROTO: &str = "x-forwarded-proto";
const FORWARDED_HOST: &str = "x-forwarded-host";

/// GET /home
pub async fn get_homepage(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<HomepageData>> {
    let fallback_host = format!("{}:{}", state.config.server.host, state.config.server.port);
    let base_url = base_url(&headers, &fallback_host);
    let data = state.homepage.get_homepage_data(&base_url).await?;
    Ok(Json(data))
}

/// Scheme and authority the client used to reach us, honouring a proxy's
/// forwarded headers.
fn base_url(headers: &HeaderMap, fallback_host: &str) -> String {
    let value = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    let scheme = value(FORWARDED_PROTO).unwrap_or("http");
    let host = value(FORWARDED_HOST)
        .or_else(|| value(header::HOST.as_str()))
        .unwrap_or(fallback_host);
    format!("{scheme}://{host}")
}
