//! What the login controller needs from the page hosting it.
//!
//! SYSTEM CONTEXT
//! ==============
//! In a browser this is `window`: the injected zone id global, the location's
//! query string, navigation and a toast area. The CLI provides a terminal
//! version; tests provide a recording one.

/// Transient, auto-dismissing error message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
}

impl Notification {
    #[must_use]
    pub fn error(title: impl Into<String>) -> Self {
        Self { title: title.into() }
    }
}

pub trait PortalHost: Send + Sync {
    /// Zone id injected by the appliance into the page, if any.
    fn zone_id(&self) -> Option<String>;

    /// Value of a query parameter on the hosting page.
    fn query_param(&self, name: &str) -> Option<String>;

    /// Full navigation away from the portal.
    fn navigate(&self, url: &str);

    /// Reload the portal page, discarding all client-side state.
    fn reload(&self);

    fn notify(&self, notification: Notification);
}
