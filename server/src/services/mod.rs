//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own the portal semantics and the session table so route
//! handlers can stay focused on protocol translation.

pub mod portal;
pub mod session;
