//! Networking modules for the captive-portal access API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` performs the HTTP calls, `types` defines the normalized response and
//! error shapes, and `zone` implements the configured-zone -> default-zone
//! fallback shared by every controller action.

pub mod api;
pub mod types;
pub mod zone;
