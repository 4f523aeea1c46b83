//! Captive-portal access routes: status, logon, logoff and the RFC 8908 API.
//!
//! Every handler answers 200 with a status payload. Failed logons included.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Json, Response};
use dtos::ClientStatusResponse;

use crate::services::portal;
use crate::services::session::SessionKey;
use crate::state::AppState;

const DEFAULT_IP: &str = "127.0.0.1";
const CAPTIVE_JSON: &str = "application/captive+json";

/// First hop of `X-Forwarded-For`, or loopback.
pub(crate) fn client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .unwrap_or(DEFAULT_IP)
        .to_owned()
}

fn session_key(zone: Option<&str>, headers: &HeaderMap) -> SessionKey {
    SessionKey::new(zone.map_or(0, portal::parse_zone_id), client_ip(headers))
}

// =============================================================================
// STATUS
// =============================================================================

/// `GET|POST /api/captiveportal/access/status[/]`
pub async fn status_default(State(state): State<AppState>, headers: HeaderMap) -> Json<ClientStatusResponse> {
    status(&state, None, &headers).await
}

/// `GET|POST /api/captiveportal/access/status/{zoneid}`
pub async fn status_zone(
    State(state): State<AppState>,
    Path(zoneid): Path<String>,
    headers: HeaderMap,
) -> Json<ClientStatusResponse> {
    status(&state, Some(&zoneid), &headers).await
}

async fn status(state: &AppState, zone: Option<&str>, headers: &HeaderMap) -> Json<ClientStatusResponse> {
    let key = session_key(zone, headers);
    tracing::debug!(zone = key.zone_id, ip = %key.ip, "status");
    Json(portal::status(state, &key).await)
}

// =============================================================================
// LOGON
// =============================================================================

/// `POST /api/captiveportal/access/logon[/]`
pub async fn logon_default(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Json<ClientStatusResponse> {
    logon(&state, None, &headers, &body).await
}

/// `POST /api/captiveportal/access/logon/{zoneid}`
pub async fn logon_zone(
    State(state): State<AppState>,
    Path(zoneid): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Json<ClientStatusResponse> {
    logon(&state, Some(&zoneid), &headers, &body).await
}

async fn logon(state: &AppState, zone: Option<&str>, headers: &HeaderMap, body: &[u8]) -> Json<ClientStatusResponse> {
    let key = session_key(zone, headers);
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let credentials = portal::parse_logon_body(content_type, body);
    Json(portal::logon(state, &key, &credentials).await)
}

// =============================================================================
// LOGOFF
// =============================================================================

/// `POST /api/captiveportal/access/logoff[/]`
pub async fn logoff_default(State(state): State<AppState>, headers: HeaderMap) -> Json<ClientStatusResponse> {
    let key = session_key(None, &headers);
    Json(portal::logoff(&state, &key).await)
}

/// `POST /api/captiveportal/access/logoff/{zoneid}`
pub async fn logoff_zone(
    State(state): State<AppState>,
    Path(zoneid): Path<String>,
    headers: HeaderMap,
) -> Json<ClientStatusResponse> {
    let key = session_key(Some(&zoneid), &headers);
    Json(portal::logoff(&state, &key).await)
}

// =============================================================================
// RFC 8908
// =============================================================================

/// `GET /api/captiveportal/access/api/`. The zone comes from the `zoneid`
/// header since the path carries none.
pub async fn captive_api(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let zone = headers
        .get("zoneid")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let key = session_key(zone.as_deref(), &headers);
    let body = portal::captive_status(&state, &key).await;
    ([(CONTENT_TYPE, HeaderValue::from_static(CAPTIVE_JSON))], Json(body)).into_response()
}

#[cfg(test)]
#[path = "access_test.rs"]
mod tests;
