//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the startup configuration and the session table; nothing here is a
//! static global, so tests can build as many independent portals as they need.

use std::sync::Arc;

use crate::config::PortalConfig;
use crate::services::session::SessionStore;

/// Clone is required by Axum; inner fields are Arc-backed.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<PortalConfig>,
    pub sessions: SessionStore,
}

impl AppState {
    #[must_use]
    pub fn new(config: PortalConfig) -> Self {
        Self { config: Arc::new(config), sessions: SessionStore::new() }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
