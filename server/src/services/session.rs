//! Captive-portal session table.
//!
//! ARCHITECTURE
//! ============
//! Sessions are keyed by `(zone, client ip)`, not by any client-supplied
//! token: every request from the same address in the same zone is the same
//! principal. Clients sharing an address (NAT) therefore share one session.
//! Zone segments that do not parse as a `u32` (`guest`, overflowing numbers)
//! are zone 0, so they share sessions with the default zone as well.
//!
//! TRADE-OFFS
//! ==========
//! Nothing expires. A session lives until `logoff` or process restart.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// OUI prefix of the derived MAC (locally administered).
const FAKE_MAC_PREFIX: &str = "02:00:00:00:00";

/// Composite session key, rendered as `zone:ip`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub zone_id: u32,
    pub ip: String,
}

impl SessionKey {
    #[must_use]
    pub fn new(zone_id: u32, ip: impl Into<String>) -> Self {
        Self { zone_id, ip: ip.into() }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.zone_id, self.ip)
    }
}

/// An authenticated client.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user: String,
    pub authorized: bool,
    pub session_id: String,
    /// Creation instant, seconds since the Unix epoch.
    pub start_time: f64,
    pub mac: String,
}

impl Session {
    /// Start a fresh authorized session for `user` connecting from `ip`.
    #[must_use]
    pub fn start(user: impl Into<String>, ip: &str) -> Self {
        Self {
            user: user.into(),
            authorized: true,
            session_id: generate_session_id(),
            start_time: unix_now_secs(),
            mac: fake_mac_from_ip(ip),
        }
    }
}

pub type SessionTable = HashMap<SessionKey, Session>;

/// Process-wide session table, constructed at service start and shared
/// through `AppState`.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<SessionTable>>,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, SessionTable> {
        self.inner.read().await
    }

    /// Exclusive access. Hold the guard across a whole lookup-then-modify so
    /// logon and logoff stay atomic per key.
    pub async fn write(&self) -> RwLockWriteGuard<'_, SessionTable> {
        self.inner.write().await
    }

    pub async fn get(&self, key: &SessionKey) -> Option<Session> {
        self.inner.read().await.get(key).cloned()
    }
}

/// Opaque, unique session identifier.
#[must_use]
pub fn generate_session_id() -> String {
    Uuid::new_v4().to_string()
}

/// Derive a stable fake MAC from an IPv4 address: the octet sum modulo 255,
/// hex-formatted behind a fixed prefix. Same IP always gives the same MAC;
/// collisions between different IPs are expected.
///
/// Segments without leading digits count as zero, so IPv6 or garbage input
/// still yields a well-formed address.
#[must_use]
pub fn fake_mac_from_ip(ip: &str) -> String {
    let sum: u64 = ip.split('.').map(leading_number).fold(0, u64::saturating_add);
    format!("{FAKE_MAC_PREFIX}:{:02x}", sum % 255)
}

fn leading_number(part: &str) -> u64 {
    let digits: String = part.trim_start().chars().take_while(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

#[allow(clippy::cast_precision_loss)]
fn unix_now_secs() -> f64 {
    let nanos = time::OffsetDateTime::now_utc().unix_timestamp_nanos();
    nanos as f64 / 1_000_000_000.0
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
