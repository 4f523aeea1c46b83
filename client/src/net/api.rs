//! Captive-portal access API client.
//!
//! Thin HTTP wrapper for the `status`, `logon` and `logoff` endpoints plus the
//! RFC 8908 captive-portal API. Every call carries a `zoneid` header.
//!
//! ERROR HANDLING
//! ==============
//! HTTP error statuses come back as `ApiResponse { ok: false, .. }`. Only
//! network failures and 2xx bodies that are JSON of the wrong shape become
//! `ApiError`s. Empty and syntactically broken bodies yield `data: None`;
//! appliances and proxies regularly answer with HTML or nothing at all.

use std::time::Duration;

use dtos::{CaptivePortalStatus, ClientStatusResponse, LogoffResponse, LogonRequest, LogonResponse};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::header::{ACCEPT, CONTENT_LENGTH, CONTENT_TYPE};
use serde::de::DeserializeOwned;

use super::types::{ApiError, ApiResponse};

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

const ACCESS_PREFIX: &str = "/api/captiveportal/access";
const RFC_STATUS_PATH: &str = "/api/captiveportal/access/api/";
const ZONE_HEADER: &str = "zoneid";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const CAPTIVE_JSON: &str = "application/captive+json";

/// Characters `encodeURIComponent` leaves alone.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

// =============================================================================
// CONFIG
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientConfig {
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Timeouts from `PORTAL_REQUEST_TIMEOUT_SECS` / `PORTAL_CONNECT_TIMEOUT_SECS`.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            request_timeout: Duration::from_secs(env_parse_u64(
                "PORTAL_REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )),
            connect_timeout: Duration::from_secs(env_parse_u64(
                "PORTAL_CONNECT_TIMEOUT_SECS",
                DEFAULT_CONNECT_TIMEOUT_SECS,
            )),
        }
    }
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

// =============================================================================
// TRAIT
// =============================================================================

/// The three access calls the login controller depends on. Enables test
/// doubles.
#[async_trait::async_trait]
pub trait PortalApi: Send + Sync {
    async fn get_client_status(&self, zone_id: &str) -> Result<ApiResponse<ClientStatusResponse>, ApiError>;

    async fn logon(&self, zone_id: &str, credentials: &LogonRequest) -> Result<ApiResponse<LogonResponse>, ApiError>;

    async fn logoff(&self, zone_id: &str) -> Result<ApiResponse<LogoffResponse>, ApiError>;
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct PortalClient {
    http: reqwest::Client,
    base_url: String,
}

impl PortalClient {
    /// Build a client for the portal at `base_url` (scheme + host, optional
    /// path prefix).
    pub fn new(base_url: &str, config: ClientConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Self::from_reqwest(base_url, http)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, ApiError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        url::Url::parse(trimmed).map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;
        Ok(Self { http, base_url: trimmed.to_owned() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /api/captiveportal/access/status/{zone}`
    pub async fn get_client_status(&self, zone_id: &str) -> Result<ApiResponse<ClientStatusResponse>, ApiError> {
        let url = self.url(&access_endpoint("status", zone_id));
        self.send(self.http.get(url).header(ZONE_HEADER, zone_id)).await
    }

    /// RFC 8908 `GET /api/captiveportal/access/api/`
    pub async fn get_rfc_status(&self, zone_id: &str) -> Result<ApiResponse<CaptivePortalStatus>, ApiError> {
        let url = self.url(RFC_STATUS_PATH);
        let req = self
            .http
            .get(url)
            .header(ZONE_HEADER, zone_id)
            .header(ACCEPT, CAPTIVE_JSON);
        self.send(req).await
    }

    /// `POST /api/captiveportal/access/logon/{zone}` with a form body.
    pub async fn logon(&self, zone_id: &str, credentials: &LogonRequest) -> Result<ApiResponse<LogonResponse>, ApiError> {
        let url = self.url(&access_endpoint("logon", zone_id));
        let req = self
            .http
            .post(url)
            .header(ZONE_HEADER, zone_id)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(form_body(credentials));
        self.send(req).await
    }

    /// `POST /api/captiveportal/access/logoff/{zone}`
    pub async fn logoff(&self, zone_id: &str) -> Result<ApiResponse<LogoffResponse>, ApiError> {
        let url = self.url(&access_endpoint("logoff", zone_id));
        self.send(self.http.post(url).header(ZONE_HEADER, zone_id)).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send<T: DeserializeOwned>(&self, req: reqwest::RequestBuilder) -> Result<ApiResponse<T>, ApiError> {
        let response = req.send().await.map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let content_length = header_str(&response, CONTENT_LENGTH);
        let content_type = header_str(&response, CONTENT_TYPE).unwrap_or_default();
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let data = parse_body(status, content_length.as_deref(), &content_type, &body)?;
        Ok(ApiResponse::new(status, data))
    }
}

#[async_trait::async_trait]
impl PortalApi for PortalClient {
    async fn get_client_status(&self, zone_id: &str) -> Result<ApiResponse<ClientStatusResponse>, ApiError> {
        PortalClient::get_client_status(self, zone_id).await
    }

    async fn logon(&self, zone_id: &str, credentials: &LogonRequest) -> Result<ApiResponse<LogonResponse>, ApiError> {
        PortalClient::logon(self, zone_id, credentials).await
    }

    async fn logoff(&self, zone_id: &str) -> Result<ApiResponse<LogoffResponse>, ApiError> {
        PortalClient::logoff(self, zone_id).await
    }
}

fn header_str(response: &reqwest::Response, name: reqwest::header::HeaderName) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

// =============================================================================
// PURE HELPERS
// =============================================================================

/// Path for an access action, zone id encoded as one path segment. An empty
/// zone id leaves a trailing slash.
pub(crate) fn access_endpoint(action: &str, zone_id: &str) -> String {
    format!("{ACCESS_PREFIX}/{action}/{}", utf8_percent_encode(zone_id, COMPONENT))
}

/// Form-encode credentials, leaving out empty fields.
pub(crate) fn form_body(credentials: &LogonRequest) -> String {
    let mut form = url::form_urlencoded::Serializer::new(String::new());
    if !credentials.user.is_empty() {
        form.append_pair("user", &credentials.user);
    }
    if !credentials.password.is_empty() {
        form.append_pair("password", &credentials.password);
    }
    form.finish()
}

fn is_json_content_type(content_type: &str) -> bool {
    content_type.contains("application/json") || content_type.contains(CAPTIVE_JSON)
}

/// Decode a response body.
///
/// `Content-Length: 0` and empty bodies are `None`. Syntax errors are `None`
/// as well. Well-formed JSON of the wrong shape is an error on a 2xx answer
/// and `None` on anything else: appliances put their own error objects in
/// 404 and 5xx bodies.
pub(crate) fn parse_body<T: DeserializeOwned>(
    status: u16,
    content_length: Option<&str>,
    content_type: &str,
    body: &[u8],
) -> Result<Option<T>, ApiError> {
    if content_length.map(str::trim) == Some("0") || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    match serde_json::from_slice::<T>(body) {
        Ok(data) => Ok(Some(data)),
        Err(e) if e.is_syntax() || e.is_eof() => {
            if is_json_content_type(content_type) {
                tracing::warn!(error = %e, content_type, "discarding malformed JSON body");
            } else {
                tracing::debug!(content_type, "discarding non-JSON body");
            }
            Ok(None)
        }
        Err(e) if (200..300).contains(&status) => Err(ApiError::Decode(e.to_string())),
        Err(e) => {
            tracing::debug!(status, error = %e, "discarding error body of unexpected shape");
            Ok(None)
        }
    }
}

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;
