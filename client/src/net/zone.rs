//! Configured-zone -> default-zone fallback.
//!
//! A page may be served with a zone id the appliance does not route (404).
//! Every call is then retried once against the default (empty) zone. Nothing
//! else is retried.

use std::future::Future;

use super::types::{ApiError, ApiResponse};

const NOT_FOUND: u16 = 404;

/// Zones to try, in order: the configured one (if any), then the default.
#[must_use]
pub fn zone_candidates(zone_id: &str) -> Vec<String> {
    if zone_id.is_empty() { vec![String::new()] } else { vec![zone_id.to_owned(), String::new()] }
}

/// Run `exec` against each zone candidate.
///
/// A 404 or a transport error on a non-final candidate moves on to the next
/// one. Any other response, and whatever the final candidate produces, is
/// returned as is.
pub async fn with_zone<T, F, Fut>(zone_id: &str, mut exec: F) -> Result<ApiResponse<T>, ApiError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<ApiResponse<T>, ApiError>>,
{
    let candidates = zone_candidates(zone_id);
    let last = candidates.len().saturating_sub(1);

    for (i, zone) in candidates.into_iter().enumerate() {
        match exec(zone.clone()).await {
            Ok(res) if res.status == NOT_FOUND && i < last => {
                tracing::debug!(%zone, "zone not routed; falling back to default zone");
            }
            Err(e) if i < last => {
                tracing::debug!(%zone, error = %e, "request failed; falling back to default zone");
            }
            result => return result,
        }
    }

    Err(ApiError::Unavailable)
}

#[cfg(test)]
#[path = "zone_test.rs"]
mod zone_test;
