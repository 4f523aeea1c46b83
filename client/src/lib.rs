//! Captive-portal login client.
//!
//! SYSTEM CONTEXT
//! ==============
//! `net` talks to the appliance's access API, `pages::login` orchestrates the
//! status -> logon/logoff -> redirect protocol, and `state` holds what a login
//! screen renders. Presentation lives elsewhere; it consumes `LoginState` and
//! calls the controller's actions.

pub mod host;
pub mod i18n;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;
