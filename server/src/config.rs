//! Mock portal configuration parsed from environment variables.
//!
//! Read once at startup. Every variable is optional; the defaults describe a
//! production process where the mock endpoints are switched off.

use std::collections::HashMap;

use dtos::AuthType;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_ANONYMOUS_USER: &str = "anonymous";
pub const DEFAULT_USERS: &str = "maker:secret,ats-demo:ats-demo123";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid PORTAL_AUTH_TYPE: {0}")]
    InvalidAuthType(String),
    #[error("invalid PORTAL_USERS entry (expected user:password): {0}")]
    InvalidUserEntry(String),
    #[error("invalid PORT: {0}")]
    InvalidPort(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalConfig {
    /// Mock endpoints answer only in development mode; 404 otherwise.
    pub dev_mode: bool,
    pub auth_type: AuthType,
    /// Plain-text credential table. Acceptable only because this is a mock.
    pub users: HashMap<String, String>,
    pub anonymous_user: String,
    pub user_portal_url: Option<String>,
    pub port: u16,
}

impl PortalConfig {
    /// Build config from the process environment.
    ///
    /// - `APP_ENV`: `development` enables the mock endpoints
    /// - `PORTAL_DEV_MODE`: boolean override of the above
    /// - `PORTAL_AUTH_TYPE`: `normal` (default) or `none`
    /// - `PORTAL_USERS`: `user:password` pairs separated by commas
    /// - `PORTAL_ANONYMOUS_USER`: default `anonymous`
    /// - `PORTAL_USER_URL`: reported by the RFC 8908 endpoint
    /// - `PORT`: default 3000
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup. Lets tests avoid touching
    /// process-global environment variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let app_env_dev = lookup("APP_ENV").is_some_and(|v| v.trim().eq_ignore_ascii_case("development"));
        let dev_mode = lookup("PORTAL_DEV_MODE")
            .as_deref()
            .and_then(parse_bool)
            .unwrap_or(app_env_dev);

        let auth_type = match lookup("PORTAL_AUTH_TYPE") {
            Some(raw) if !raw.trim().is_empty() => raw.parse().map_err(|_| ConfigError::InvalidAuthType(raw))?,
            _ => AuthType::Normal,
        };

        let users = parse_users(lookup("PORTAL_USERS").as_deref().unwrap_or(DEFAULT_USERS))?;

        let anonymous_user = lookup("PORTAL_ANONYMOUS_USER")
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_ANONYMOUS_USER.to_owned());

        let user_portal_url = lookup("PORTAL_USER_URL")
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty());

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        Ok(Self { dev_mode, auth_type, users, anonymous_user, user_portal_url, port })
    }

    /// Development-mode config with the default credential table.
    #[must_use]
    pub fn development(auth_type: AuthType) -> Self {
        Self {
            dev_mode: true,
            auth_type,
            users: parse_users(DEFAULT_USERS).unwrap_or_default(),
            anonymous_user: DEFAULT_ANONYMOUS_USER.to_owned(),
            user_portal_url: None,
            port: DEFAULT_PORT,
        }
    }
}

pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_users(raw: &str) -> Result<HashMap<String, String>, ConfigError> {
    let mut users = HashMap::new();
    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let Some((user, password)) = entry.split_once(':') else {
            return Err(ConfigError::InvalidUserEntry(entry.to_owned()));
        };
        let user = user.trim();
        if user.is_empty() {
            return Err(ConfigError::InvalidUserEntry(entry.to_owned()));
        }
        users.insert(user.to_owned(), password.to_owned());
    }
    Ok(users)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
