//! Utility helpers shared across client modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate URL handling from page orchestration to improve
//! reuse and testability.

pub mod redirect;
