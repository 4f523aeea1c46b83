//! Captive-portal login page controller.
//!
//! SYSTEM CONTEXT
//! ==============
//! Drives the page from `checking` to one of `password`, `anonymous` or
//! `authorized`, and performs the login, anonymous login and logout actions.
//! Rendering is left to whoever holds the controller; it reads
//! `LoginController::state()` snapshots and wires buttons to the actions.
//!
//! DESIGN
//! ======
//! - Every network call goes through `net::zone::with_zone`.
//! - Each action catches its own failures and turns them into a host
//!   notification; nothing propagates out of an action.
//! - A successful logon leaves the page (navigate or reload). Logout always
//!   reloads so the next `checking` pass re-derives everything from the
//!   server.
//!
//! TRADE-OFFS
//! ==========
//! The busy flag drops triggers that arrive while an action is in flight
//! instead of queueing them. That is enough for a single-user page whose
//! buttons are disabled while busy.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use dtos::{ClientStatusResponse, LogonRequest};

use crate::host::{Notification, PortalHost};
use crate::i18n::Translate;
use crate::net::api::PortalApi;
use crate::net::types::{ApiError, ApiResponse};
use crate::net::zone::with_zone;
use crate::state::login::{FormErrors, HeaderContent, LoginPhase, LoginState, phase_for_status};
use crate::util::redirect::{REDIRECT_PARAM, redirect_url};

const SERVER_UNAVAILABLE_KEY: &str = "errors.serverUnavailable";
const SERVER_UNAVAILABLE: &str = "Server unavailable.";

// =============================================================================
// TYPES
// =============================================================================

/// Raw values from the password form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub terms: bool,
}

impl LoginForm {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>, terms: bool) -> Self {
        Self { username: username.into(), password: password.into(), terms }
    }
}

/// What an action ended up doing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Another action was in flight, or `start` already ran.
    Ignored,
    /// Status check finished and the page moved to this phase.
    Checked(LoginPhase),
    /// Local validation failed; no request was sent.
    Invalid,
    /// Navigated to the post-login target.
    Redirected(String),
    /// Reloaded the portal page.
    Reloaded,
    /// The server answered but did not authorize the client.
    Rejected,
    /// Transport or server failure, reported through a notification.
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortalError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Non-2xx answer, or a 2xx answer without a usable body.
    #[error("{0}")]
    ServerUnavailable(String),
}

/// Values read from the hosting page exactly once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct PageContext {
    zone_id: String,
    redirurl: Option<String>,
}

// =============================================================================
// BUSY GUARD
// =============================================================================

/// Holds the busy flag for the lifetime of one action.
struct BusyGuard {
    state: Arc<Mutex<LoginState>>,
}

impl BusyGuard {
    fn acquire(state: &Arc<Mutex<LoginState>>) -> Option<Self> {
        let mut guard = lock(state);
        if guard.busy {
            return None;
        }
        guard.busy = true;
        Some(Self { state: Arc::clone(state) })
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        lock(&self.state).busy = false;
    }
}

fn lock(state: &Mutex<LoginState>) -> MutexGuard<'_, LoginState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// CONTROLLER
// =============================================================================

#[derive(Clone)]
pub struct LoginController {
    api: Arc<dyn PortalApi>,
    host: Arc<dyn PortalHost>,
    translate: Arc<dyn Translate>,
    state: Arc<Mutex<LoginState>>,
    page: Arc<OnceLock<PageContext>>,
    started: Arc<AtomicBool>,
}

impl LoginController {
    #[must_use]
    pub fn new(api: Arc<dyn PortalApi>, host: Arc<dyn PortalHost>, translate: Arc<dyn Translate>) -> Self {
        Self {
            api,
            host,
            translate,
            state: Arc::new(Mutex::new(LoginState::default())),
            page: Arc::new(OnceLock::new()),
            started: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Current state snapshot.
    #[must_use]
    pub fn state(&self) -> LoginState {
        lock(&self.state).clone()
    }

    #[must_use]
    pub fn translate(&self, key: &str, fallback: &str) -> String {
        self.translate.translate(key, fallback)
    }

    /// Header title and description for the current phase.
    #[must_use]
    pub fn header_content(&self) -> HeaderContent {
        lock(&self.state).header_content(self.translate.as_ref())
    }

    /// Zone id captured from the host (empty for the default zone).
    #[must_use]
    pub fn zone_id(&self) -> &str {
        &self.page().zone_id
    }

    /// Capture the zone id and `redirurl`, then check status. Runs once per
    /// controller.
    pub async fn start(&self) -> ActionOutcome {
        if self.started.swap(true, Ordering::SeqCst) {
            return ActionOutcome::Ignored;
        }
        let page = self.page();
        tracing::debug!(zone = %page.zone_id, redirurl = ?page.redirurl, "login page started");
        self.check_status().await
    }

    pub async fn check_status(&self) -> ActionOutcome {
        let Some(_busy) = BusyGuard::acquire(&self.state) else {
            return ActionOutcome::Ignored;
        };
        self.update(|s| s.phase = LoginPhase::Checking);

        match self.fetch_status().await {
            Ok(status) => {
                let phase = phase_for_status(&status);
                tracing::debug!(?phase, "client status checked");
                self.update(|s| {
                    s.phase = phase;
                    s.client_status = Some(status);
                });
                ActionOutcome::Checked(phase)
            }
            Err(e) => {
                self.notify_error(&e);
                self.update(|s| {
                    s.phase = LoginPhase::Password;
                    s.client_status = None;
                });
                ActionOutcome::Failed
            }
        }
    }

    /// Password login. Validates locally first; a rejected logon marks the
    /// password field, success leaves the page with https preferred.
    pub async fn login(&self, form: &LoginForm) -> ActionOutcome {
        let Some(_busy) = BusyGuard::acquire(&self.state) else {
            return ActionOutcome::Ignored;
        };

        let username = form.username.trim();
        let password = form.password.trim();
        let errors = self.validate(username, password, form.terms);
        if !errors.is_empty() {
            self.update(|s| s.errors = errors);
            return ActionOutcome::Invalid;
        }
        self.update(|s| s.errors = FormErrors::default());

        let credentials = LogonRequest::new(username, password);
        match self.logon(&credentials).await {
            Ok(status) if status.is_authorized() => {
                self.record_authorized(status);
                self.redirect(true)
            }
            Ok(status) => {
                tracing::debug!(user = %username, "logon rejected");
                let password_error = self.translate("errors.authenticationFailed", "Authentication failed.");
                let root_error =
                    self.translate("errors.authenticationInline", "Please check your credentials and try again.");
                self.update(|s| {
                    s.client_status = Some(status);
                    s.errors.password = Some(password_error);
                    s.errors.root = Some(root_error);
                });
                ActionOutcome::Rejected
            }
            Err(e) => {
                self.notify_error(&e);
                ActionOutcome::Failed
            }
        }
    }

    /// Logon with empty credentials. Success redirects without forcing
    /// https.
    pub async fn login_anonymous(&self) -> ActionOutcome {
        let Some(_busy) = BusyGuard::acquire(&self.state) else {
            return ActionOutcome::Ignored;
        };

        match self.logon(&LogonRequest::anonymous()).await {
            Ok(status) if status.is_authorized() => {
                self.record_authorized(status);
                self.redirect(false)
            }
            Ok(status) => {
                self.update(|s| s.client_status = Some(status));
                let title = self.translate("errors.anonymousFailed", "Anonymous login failed.");
                self.host.notify(Notification::error(title));
                ActionOutcome::Rejected
            }
            Err(e) => {
                self.notify_error(&e);
                ActionOutcome::Failed
            }
        }
    }

    /// Logoff, then reload the page.
    pub async fn logout(&self) -> ActionOutcome {
        let Some(_busy) = BusyGuard::acquire(&self.state) else {
            return ActionOutcome::Ignored;
        };

        let zone_id = self.page().zone_id.clone();
        let api = &self.api;
        let result = with_zone(&zone_id, |zone| async move { api.logoff(&zone).await }).await;

        match result {
            Ok(res) if res.ok => {
                self.update(|s| {
                    s.phase = LoginPhase::Checking;
                    s.client_status = None;
                });
                self.host.reload();
                ActionOutcome::Reloaded
            }
            Ok(res) => {
                tracing::debug!(status = res.status, "logoff answered with an error status");
                self.notify_error(&self.server_unavailable());
                ActionOutcome::Failed
            }
            Err(e) => {
                self.notify_error(&PortalError::Api(e));
                ActionOutcome::Failed
            }
        }
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    fn page(&self) -> &PageContext {
        self.page.get_or_init(|| PageContext {
            zone_id: self.host.zone_id().unwrap_or_default(),
            redirurl: self.host.query_param(REDIRECT_PARAM),
        })
    }

    fn update(&self, f: impl FnOnce(&mut LoginState)) {
        f(&mut lock(&self.state));
    }

    fn validate(&self, username: &str, password: &str, terms: bool) -> FormErrors {
        FormErrors {
            username: username
                .is_empty()
                .then(|| self.translate("errors.usernameRequired", "Username is required.")),
            password: password
                .is_empty()
                .then(|| self.translate("errors.passwordRequired", "Password is required.")),
            terms: (!terms).then(|| {
                self.translate("errors.termsAcceptanceRequired", "You must accept the terms of use before continuing.")
            }),
            root: None,
        }
    }

    async fn fetch_status(&self) -> Result<ClientStatusResponse, PortalError> {
        let zone_id = self.page().zone_id.clone();
        let api = &self.api;
        let res = with_zone(&zone_id, |zone| async move { api.get_client_status(&zone).await }).await?;
        self.require_data(res)
    }

    async fn logon(&self, credentials: &LogonRequest) -> Result<ClientStatusResponse, PortalError> {
        let zone_id = self.page().zone_id.clone();
        let api = &self.api;
        let res = with_zone(&zone_id, |zone| async move { api.logon(&zone, credentials).await }).await?;
        self.require_data(res)
    }

    fn require_data(&self, res: ApiResponse<ClientStatusResponse>) -> Result<ClientStatusResponse, PortalError> {
        let status = res.status;
        res.into_ok_data().ok_or_else(|| {
            tracing::debug!(status, "status response unusable");
            self.server_unavailable()
        })
    }

    fn record_authorized(&self, status: ClientStatusResponse) {
        self.update(|s| {
            s.phase = LoginPhase::Authorized;
            s.client_status = Some(status);
        });
    }

    fn redirect(&self, prefer_https: bool) -> ActionOutcome {
        match redirect_url(self.page().redirurl.as_deref(), prefer_https) {
            Some(target) => {
                let target = String::from(target);
                tracing::debug!(%target, "redirecting after logon");
                self.host.navigate(&target);
                ActionOutcome::Redirected(target)
            }
            None => {
                self.host.reload();
                ActionOutcome::Reloaded
            }
        }
    }

    fn server_unavailable(&self) -> PortalError {
        PortalError::ServerUnavailable(self.translate(SERVER_UNAVAILABLE_KEY, SERVER_UNAVAILABLE))
    }

    fn notification_text(&self, error: &PortalError) -> String {
        let message = error.to_string();
        if message.trim().is_empty() { self.translate(SERVER_UNAVAILABLE_KEY, SERVER_UNAVAILABLE) } else { message }
    }

    fn notify_error(&self, error: &PortalError) {
        tracing::warn!(error = %error, "portal action failed");
        self.host.notify(Notification::error(self.notification_text(error)));
    }
}
