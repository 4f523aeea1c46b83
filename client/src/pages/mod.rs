//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration and exposes state plus actions
//! to whatever renders it.

pub mod login;
