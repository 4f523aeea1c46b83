//! Translation lookup for user-facing controller messages.
//!
//! The controller only needs `translate(key, fallback)`. `Translations` is a
//! small built-in dictionary for the keys the login flow uses; a host with its
//! own i18n layer can pass any `Fn(&str, &str) -> String` instead.

use std::str::FromStr;

use serde_json::{Value, json};

pub trait Translate: Send + Sync {
    /// Translated string for a dotted `key`, or `fallback` if there is none.
    fn translate(&self, key: &str, fallback: &str) -> String;
}

impl<F> Translate for F
where
    F: Fn(&str, &str) -> String + Send + Sync,
{
    fn translate(&self, key: &str, fallback: &str) -> String {
        self(key, fallback)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    En,
    De,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let lang = raw.trim().to_ascii_lowercase();
        match lang.split(['-', '_']).next().unwrap_or_default() {
            "en" => Ok(Self::En),
            "de" => Ok(Self::De),
            _ => Err(format!("unsupported language: {raw}")),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Translations {
    dictionary: Value,
}

impl Translations {
    #[must_use]
    pub fn new(locale: Locale) -> Self {
        let dictionary = match locale {
            Locale::En => english(),
            Locale::De => german(),
        };
        Self { dictionary }
    }

    /// String value at a dotted path. Non-string leaves are treated as
    /// missing.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<&str> {
        key.split('.')
            .try_fold(&self.dictionary, |node, part| node.get(part))
            .and_then(Value::as_str)
    }
}

impl Default for Translations {
    fn default() -> Self {
        Self::new(Locale::default())
    }
}

impl Translate for Translations {
    fn translate(&self, key: &str, fallback: &str) -> String {
        self.lookup(key).unwrap_or(fallback).to_owned()
    }
}

fn english() -> Value {
    json!({
        "pageTitle": "WiFi Login",
        "metaDescription": "Sign in to the ATS WiFi portal for secure internet access.",
        "headerTitle": "Welcome to the ATS Network",
        "headerDescription": "By using this network you agree to comply with the following terms of use. If you do not agree, you may not use the network.",
        "headerTitleChecking": "Checking your connection...",
        "headerDescriptionChecking": "Please wait while we verify the current network status of this device.",
        "headerTitleAnonymous": "Guest access available",
        "headerDescriptionAnonymous": "You can continue with temporary access or sign in with your personal credentials below.",
        "headerTitleAuthorized": "You are connected to the ATS Network",
        "headerDescriptionAuthorized": "This device already has internet access. You can close this window or sign out below if you are finished.",
        "loginFormTitle": "Sign in to the ATS Network",
        "loginFormDescription": "Enter your username and password to sign in:",
        "errors": {
            "zoneConfigMissing": "The zone configuration is not available.",
            "serverUnavailable": "Unable to connect to the authentication server.",
            "usernameRequired": "Username is required.",
            "passwordRequired": "Password is required.",
            "termsAcceptanceRequired": "You must accept the terms of use before continuing.",
            "authenticationFailed": "Authentication failed.",
            "authenticationInline": "Please check your credentials and try again.",
            "anonymousFailed": "Login failed."
        }
    })
}

fn german() -> Value {
    json!({
        "pageTitle": "WiFi-Login",
        "metaDescription": "Melden Sie sich beim ATS WLAN-Portal an, um sicheren Internetzugang zu erhalten.",
        "headerTitle": "Willkommen im ATS-Netzwerk",
        "headerDescription": "Indem Sie das Netzwerk nutzen, erklären Sie sich damit einverstanden, die folgenden Nutzungsbedingungen einzuhalten. Wenn Sie nicht einverstanden sind, dürfen Sie das Netzwerk nicht nutzen.",
        "headerTitleChecking": "Verbindung wird überprüft...",
        "headerDescriptionChecking": "Bitte warten Sie, während wir den aktuellen Netzwerkstatus dieses Geräts prüfen.",
        "headerTitleAnonymous": "Gastzugang verfügbar",
        "headerDescriptionAnonymous": "Sie können mit einem temporären Zugang fortfahren oder sich unten mit Ihren persönlichen Zugangsdaten anmelden.",
        "headerTitleAuthorized": "Sie sind mit dem ATS-Netzwerk verbunden",
        "headerDescriptionAuthorized": "Dieses Gerät hat bereits Internetzugang. Sie können dieses Fenster schließen oder sich unten abmelden, wenn Sie fertig sind.",
        "loginFormTitle": "Anmeldung im ATS-Netzwerk",
        "loginFormDescription": "Geben Sie Ihren Benutzernamen und Ihr Passwort ein, um sich anzumelden:",
        "errors": {
            "zoneConfigMissing": "Die Zonenkonfiguration ist nicht verfügbar.",
            "serverUnavailable": "Verbindung zum Authentifizierungsserver nicht möglich.",
            "usernameRequired": "Benutzername ist erforderlich.",
            "passwordRequired": "Passwort ist erforderlich.",
            "termsAcceptanceRequired": "Sie müssen die Nutzungsbedingungen akzeptieren, bevor Sie fortfahren.",
            "authenticationFailed": "Authentifizierung fehlgeschlagen.",
            "authenticationInline": "Bitte überprüfen Sie Ihre Zugangsdaten und versuchen Sie es erneut.",
            "anonymousFailed": "Anmeldung fehlgeschlagen."
        }
    })
}

#[cfg(test)]
#[path = "i18n_test.rs"]
mod i18n_test;
