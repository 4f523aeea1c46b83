//! Captive-portal access semantics: status, logon, logoff.
//!
//! DESIGN
//! ======
//! Mirrors how a real appliance behaves at the HTTP level: every call answers
//! with the client's resulting status, and a rejected logon is not an error,
//! just a `NOT_AUTHORIZED` answer. Route handlers only translate HTTP into
//! these calls.

use dtos::{
    AuthType, AuthorizedClientStatus, CaptivePortalStatus, ClientStatusResponse, LogonRequest,
    UnauthorizedClientStatus,
};
use serde::Deserialize;

use super::session::{Session, SessionKey, fake_mac_from_ip};
use crate::config::PortalConfig;
use crate::state::AppState;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const JSON_CONTENT_TYPE: &str = "application/json";

// =============================================================================
// RESPONSES
// =============================================================================

/// Status answer for a client given its (possibly absent) session.
#[must_use]
pub fn build_response(config: &PortalConfig, session: Option<&Session>, ip: &str) -> ClientStatusResponse {
    match session {
        Some(session) if session.authorized => ClientStatusResponse::Authorized(AuthorizedClientStatus {
            ip_address: ip.to_owned(),
            mac_address: session.mac.clone(),
            user_name: session.user.clone(),
            session_id: session.session_id.clone(),
            start_time: session.start_time,
        }),
        _ => ClientStatusResponse::NotAuthorized(UnauthorizedClientStatus {
            ip_address: ip.to_owned(),
            mac_address: Some(fake_mac_from_ip(ip)),
            auth_type: Some(config.auth_type),
        }),
    }
}

// =============================================================================
// OPERATIONS
// =============================================================================

pub async fn status(state: &AppState, key: &SessionKey) -> ClientStatusResponse {
    let sessions = state.sessions.read().await;
    build_response(&state.config, sessions.get(key), &key.ip)
}

/// Authenticate and, on success, create or overwrite the session for `key`.
/// A rejected attempt leaves the table untouched.
pub async fn logon(state: &AppState, key: &SessionKey, credentials: &LogonRequest) -> ClientStatusResponse {
    let accepted = authenticate(&state.config, credentials);

    let mut sessions = state.sessions.write().await;
    match accepted {
        Some(user) => {
            tracing::info!(%key, %user, "logon accepted");
            sessions.insert(key.clone(), Session::start(user, &key.ip));
        }
        None => {
            tracing::info!(%key, user = %credentials.user, "logon rejected");
        }
    }
    build_response(&state.config, sessions.get(key), &key.ip)
}

/// Drop the session for `key`. Idempotent.
pub async fn logoff(state: &AppState, key: &SessionKey) -> ClientStatusResponse {
    let mut sessions = state.sessions.write().await;
    if let Some(session) = sessions.remove(key) {
        tracing::info!(%key, user = %session.user, "logoff");
    }
    build_response(&state.config, sessions.get(key), &key.ip)
}

/// RFC 8908 view of the same session table.
pub async fn captive_status(state: &AppState, key: &SessionKey) -> CaptivePortalStatus {
    let authorized = state.sessions.get(key).await.is_some_and(|s| s.authorized);
    CaptivePortalStatus {
        captive: !authorized,
        user_portal_url: state.config.user_portal_url.clone(),
        seconds_remaining: None,
    }
}

// =============================================================================
// AUTH POLICY
// =============================================================================

/// Returns the username to record on success, `None` on rejection.
#[must_use]
pub fn authenticate(config: &PortalConfig, credentials: &LogonRequest) -> Option<String> {
    match config.auth_type {
        AuthType::None => {
            if credentials.user.is_empty() {
                Some(config.anonymous_user.clone())
            } else {
                Some(credentials.user.clone())
            }
        }
        AuthType::Normal => config
            .users
            .get(&credentials.user)
            .filter(|expected| !expected.is_empty() && **expected == credentials.password)
            .map(|_| credentials.user.clone()),
    }
}

// =============================================================================
// REQUEST PARSING
// =============================================================================

#[derive(Deserialize)]
struct JsonCredentials {
    user: Option<String>,
    password: Option<String>,
}

/// Extract credentials from a logon body. Unknown content types and
/// unparsable bodies yield empty credentials.
#[must_use]
pub fn parse_logon_body(content_type: &str, body: &[u8]) -> LogonRequest {
    if content_type.contains(FORM_CONTENT_TYPE) {
        let mut user = None;
        let mut password = None;
        for (name, value) in url::form_urlencoded::parse(body) {
            match name.as_ref() {
                "user" if user.is_none() => user = Some(value.into_owned()),
                "password" if password.is_none() => password = Some(value.into_owned()),
                _ => {}
            }
        }
        return LogonRequest::new(user.unwrap_or_default(), password.unwrap_or_default());
    }

    if content_type.contains(JSON_CONTENT_TYPE) {
        return match serde_json::from_slice::<JsonCredentials>(body) {
            Ok(creds) => LogonRequest::new(creds.user.unwrap_or_default(), creds.password.unwrap_or_default()),
            Err(e) => {
                tracing::warn!(error = %e, "failed to parse logon body");
                LogonRequest::default()
            }
        };
    }

    LogonRequest::default()
}

/// Zone path segment parsed like an integer prefix; anything without leading
/// digits, or too large for a `u32`, is zone 0. Such zones are not kept apart:
/// they read and write the default zone's sessions.
#[must_use]
pub fn parse_zone_id(raw: &str) -> u32 {
    let digits: String = raw.trim_start().chars().take_while(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

#[cfg(test)]
#[path = "portal_test.rs"]
mod tests;
