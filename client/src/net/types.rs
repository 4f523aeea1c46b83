//! Normalized response and error shapes for the access API.

/// Outcome of one HTTP call. Ordinary HTTP error statuses are not errors:
/// they come back with `ok == false` and whatever body could be parsed.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub status: u16,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    #[must_use]
    pub fn new(status: u16, data: Option<T>) -> Self {
        Self { ok: (200..300).contains(&status), status, data }
    }

    /// `data` when the call succeeded and a body was parsed.
    #[must_use]
    pub fn into_ok_data(self) -> Option<T> {
        if self.ok { self.data } else { None }
    }
}

/// Failures that prevent an `ApiResponse` from being produced at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The configured base URL is not an absolute URL.
    #[error("invalid portal URL: {0}")]
    InvalidUrl(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// Network failure, timeout, or an unreadable response stream.
    #[error("request failed: {0}")]
    Transport(String),

    /// The body was JSON but not the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(String),

    /// No request could be attempted.
    #[error("server unavailable")]
    Unavailable,
}
