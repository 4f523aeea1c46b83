//! Shared captive-portal wire model.
//!
//! This crate owns the JSON shapes exchanged with the captive-portal access
//! API. Both the mock `server` and the `client` controller depend on it so the
//! two sides can never disagree about a field name.
//!
//! DESIGN
//! ======
//! The appliance answers every status/logon/logoff call with one object whose
//! `clientState` field decides which other fields exist. That is modelled as an
//! internally tagged enum so every consumer has to match all three states.

use serde::{Deserialize, Serialize};

// =============================================================================
// CLIENT STATE
// =============================================================================

/// Session state of a client device inside the portal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientState {
    Authorized,
    NotAuthorized,
    Unknown,
}

/// How an unauthorized client is expected to log in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthType {
    /// Username + password against the portal's user table.
    #[default]
    Normal,
    /// Terms-of-use only; any logon attempt is accepted.
    None,
}

impl AuthType {
    /// Wire name (`"normal"` / `"none"`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::None => "none",
        }
    }
}

impl std::str::FromStr for AuthType {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "none" => Ok(Self::None),
            other => Err(format!("unknown auth type: {other}")),
        }
    }
}

// =============================================================================
// STATUS RESPONSES
// =============================================================================

/// Payload of an `AUTHORIZED` status.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizedClientStatus {
    pub ip_address: String,
    pub mac_address: String,
    pub user_name: String,
    pub session_id: String,
    /// Session start, seconds since the Unix epoch. Appliances report
    /// fractional seconds.
    pub start_time: f64,
}

/// Payload of a `NOT_AUTHORIZED` status.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnauthorizedClientStatus {
    pub ip_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_type: Option<AuthType>,
}

/// Payload of an `UNKNOWN` status.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnknownClientStatus {
    pub ip_address: String,
}

/// Answer of the `status`, `logon` and `logoff` endpoints, tagged on
/// `clientState`.
///
/// Decoding is lenient where appliances differ: an unrecognised
/// `clientState` value reads as `Unknown`, and an unrecognised `authType`
/// reads as absent. A missing `clientState`, or an `AUTHORIZED` answer without
/// its session fields, is still an error.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "clientState", try_from = "WireClientStatus")]
pub enum ClientStatusResponse {
    #[serde(rename = "AUTHORIZED")]
    Authorized(AuthorizedClientStatus),
    #[serde(rename = "NOT_AUTHORIZED")]
    NotAuthorized(UnauthorizedClientStatus),
    #[serde(rename = "UNKNOWN")]
    Unknown(UnknownClientStatus),
}

/// Flat view of a status object as it arrives on the wire.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireClientStatus {
    client_state: String,
    #[serde(default)]
    ip_address: String,
    mac_address: Option<String>,
    user_name: Option<String>,
    session_id: Option<String>,
    start_time: Option<f64>,
    auth_type: Option<String>,
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, String> {
    value.ok_or_else(|| format!("AUTHORIZED status without `{field}`"))
}

impl TryFrom<WireClientStatus> for ClientStatusResponse {
    type Error = String;

    fn try_from(wire: WireClientStatus) -> Result<Self, Self::Error> {
        match wire.client_state.as_str() {
            "AUTHORIZED" => Ok(Self::Authorized(AuthorizedClientStatus {
                ip_address: wire.ip_address,
                mac_address: required(wire.mac_address, "macAddress")?,
                user_name: required(wire.user_name, "userName")?,
                session_id: required(wire.session_id, "sessionId")?,
                start_time: required(wire.start_time, "startTime")?,
            })),
            "NOT_AUTHORIZED" => Ok(Self::NotAuthorized(UnauthorizedClientStatus {
                ip_address: wire.ip_address,
                mac_address: wire.mac_address,
                auth_type: wire.auth_type.and_then(|raw| raw.parse().ok()),
            })),
            _ => Ok(Self::Unknown(UnknownClientStatus { ip_address: wire.ip_address })),
        }
    }
}

/// `logon` answers with the resulting client status.
pub type LogonResponse = ClientStatusResponse;

/// `logoff` answers with the resulting client status.
pub type LogoffResponse = ClientStatusResponse;

impl ClientStatusResponse {
    #[must_use]
    pub fn client_state(&self) -> ClientState {
        match self {
            Self::Authorized(_) => ClientState::Authorized,
            Self::NotAuthorized(_) => ClientState::NotAuthorized,
            Self::Unknown(_) => ClientState::Unknown,
        }
    }

    #[must_use]
    pub fn ip_address(&self) -> &str {
        match self {
            Self::Authorized(s) => &s.ip_address,
            Self::NotAuthorized(s) => &s.ip_address,
            Self::Unknown(s) => &s.ip_address,
        }
    }

    /// The advertised login method. Only `NOT_AUTHORIZED` carries one.
    #[must_use]
    pub fn auth_type(&self) -> Option<AuthType> {
        match self {
            Self::NotAuthorized(s) => s.auth_type,
            Self::Authorized(_) | Self::Unknown(_) => None,
        }
    }

    #[must_use]
    pub fn is_authorized(&self) -> bool {
        matches!(self, Self::Authorized(_))
    }

    #[must_use]
    pub fn as_authorized(&self) -> Option<&AuthorizedClientStatus> {
        match self {
            Self::Authorized(s) => Some(s),
            Self::NotAuthorized(_) | Self::Unknown(_) => None,
        }
    }
}

// =============================================================================
// REQUESTS
// =============================================================================

/// Credentials sent to `logon`. Both fields are empty for anonymous logons.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogonRequest {
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub password: String,
}

impl LogonRequest {
    #[must_use]
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self { user: user.into(), password: password.into() }
    }

    /// Empty credentials, used for terms-only access.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }
}

// =============================================================================
// RFC 8908
// =============================================================================

/// Captive-portal API status object (RFC 8908, `application/captive+json`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptivePortalStatus {
    pub captive: bool,
    #[serde(rename = "user-portal-url", default, skip_serializing_if = "Option::is_none")]
    pub user_portal_url: Option<String>,
    #[serde(rename = "seconds-remaining", default, skip_serializing_if = "Option::is_none")]
    pub seconds_remaining: Option<u64>,
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
