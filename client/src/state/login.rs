//! Login page state and its derived view model.
//!
//! SYSTEM CONTEXT
//! ==============
//! Owned by `pages::login::LoginController`, which mutates it around every
//! network call. Renderers (the CLI, a web front end) read snapshots and use
//! the `show_*` helpers and `header_content` instead of re-deriving visibility
//! from the phase themselves.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use dtos::{AuthType, AuthorizedClientStatus, ClientStatusResponse};

use crate::i18n::Translate;

/// Which part of the login page is active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoginPhase {
    #[default]
    Checking,
    Password,
    Anonymous,
    Authorized,
}

/// Field-level validation and authentication messages.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormErrors {
    pub username: Option<String>,
    pub password: Option<String>,
    pub terms: Option<String>,
    /// General inline message shown above the form.
    pub root: Option<String>,
}

impl FormErrors {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.password.is_none() && self.terms.is_none() && self.root.is_none()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderContent {
    pub title: String,
    pub description: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoginState {
    pub phase: LoginPhase,
    pub busy: bool,
    pub client_status: Option<ClientStatusResponse>,
    pub errors: FormErrors,
}

impl LoginState {
    #[must_use]
    pub fn show_password(&self) -> bool {
        self.phase == LoginPhase::Password
    }

    #[must_use]
    pub fn show_anonymous(&self) -> bool {
        self.phase == LoginPhase::Anonymous
    }

    #[must_use]
    pub fn show_logout(&self) -> bool {
        self.phase == LoginPhase::Authorized
    }

    /// Session details, only while the phase is `Authorized`.
    #[must_use]
    pub fn authorized_status(&self) -> Option<&AuthorizedClientStatus> {
        if self.phase != LoginPhase::Authorized {
            return None;
        }
        self.client_status.as_ref().and_then(ClientStatusResponse::as_authorized)
    }

    #[must_use]
    pub fn header_content(&self, t: &dyn Translate) -> HeaderContent {
        let (title, title_fb, desc, desc_fb) = match self.phase {
            LoginPhase::Checking => (
                "headerTitleChecking",
                "Checking your connection...",
                "headerDescriptionChecking",
                "Please wait while we verify the current network status of this device.",
            ),
            LoginPhase::Anonymous => (
                "headerTitleAnonymous",
                "Guest access available",
                "headerDescriptionAnonymous",
                "You can continue with temporary access or sign in with your personal credentials below.",
            ),
            LoginPhase::Authorized => (
                "headerTitleAuthorized",
                "You are connected to the ATS Network",
                "headerDescriptionAuthorized",
                "This device already has internet access. You can close this window or sign out below if you are finished.",
            ),
            LoginPhase::Password => (
                "headerTitle",
                "Welcome to the ATS Network",
                "headerDescription",
                "By using this network you agree to comply with the following terms of use. If you do not agree, you may not use the network.",
            ),
        };
        HeaderContent { title: t.translate(title, title_fb), description: t.translate(desc, desc_fb) }
    }
}

/// Phase implied by a status response.
#[must_use]
pub fn phase_for_status(status: &ClientStatusResponse) -> LoginPhase {
    match status {
        ClientStatusResponse::Authorized(_) => LoginPhase::Authorized,
        ClientStatusResponse::NotAuthorized(s) if s.auth_type == Some(AuthType::None) => LoginPhase::Anonymous,
        ClientStatusResponse::NotAuthorized(_) | ClientStatusResponse::Unknown(_) => LoginPhase::Password,
    }
}
