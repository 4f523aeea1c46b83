use std::sync::{Arc, Mutex};

use clap::{Parser, Subcommand};
use client::host::{Notification, PortalHost};
use client::i18n::{Locale, Translations};
use client::net::api::{ClientConfig, PortalClient};
use client::net::types::ApiError;
use client::pages::login::{ActionOutcome, LoginController, LoginForm};
use client::state::login::{FormErrors, LoginPhase, LoginState};
use client::util::redirect::REDIRECT_PARAM;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("portal request failed: {0}")]
    Api(#[from] ApiError),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("health check failed: HTTP {0}")]
    Health(u16),
    #[error("{0}")]
    Language(String),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("login rejected: {0}")]
    Rejected(String),
    #[error("{0}")]
    ActionFailed(String),
    #[error("HTTP {0} without a usable body")]
    NoBody(u16),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "portal-cli", about = "Captive-portal login from the terminal")]
struct Cli {
    #[arg(long, env = "PORTAL_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    /// Zone id the appliance assigned to this portal page.
    #[arg(long, env = "PORTAL_ZONE_ID")]
    zone_id: Option<String>,

    /// Where to continue after a successful login.
    #[arg(long, env = "PORTAL_REDIRURL")]
    redirurl: Option<String>,

    #[arg(long, env = "PORTAL_LANG", default_value = "en")]
    lang: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the portal process is up.
    Ping,
    /// Show the login page state for this client.
    Status,
    /// Show the RFC 8908 captive-portal API view.
    RfcStatus,
    /// Sign in with a username and password.
    Login {
        #[arg(long)]
        user: String,
        #[arg(long, env = "PORTAL_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long, default_value_t = false)]
        accept_terms: bool,
    },
    /// Continue with guest access.
    Anonymous,
    /// Sign out this client.
    Logout,
}

// =============================================================================
// HOST
// =============================================================================

/// Page host for a terminal: navigation and reloads are reported, not
/// performed.
struct TerminalHost {
    zone_id: Option<String>,
    redirurl: Option<String>,
    last_error: Mutex<Option<String>>,
}

impl TerminalHost {
    fn take_error(&self) -> Option<String> {
        self.last_error.lock().ok().and_then(|mut e| e.take())
    }
}

impl PortalHost for TerminalHost {
    fn zone_id(&self) -> Option<String> {
        self.zone_id.clone()
    }

    fn query_param(&self, name: &str) -> Option<String> {
        if name == REDIRECT_PARAM { self.redirurl.clone() } else { None }
    }

    fn navigate(&self, url: &str) {
        println!("continue at {url}");
    }

    fn reload(&self) {
        tracing::debug!("page reload requested");
    }

    fn notify(&self, notification: Notification) {
        if let Ok(mut last) = self.last_error.lock() {
            *last = Some(notification.title);
        }
    }
}

// =============================================================================
// MAIN
// =============================================================================

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let locale: Locale = cli.lang.parse().map_err(CliError::Language)?;
    let api = Arc::new(PortalClient::new(&cli.base_url, ClientConfig::from_env())?);
    let host = Arc::new(TerminalHost {
        zone_id: cli.zone_id.clone(),
        redirurl: cli.redirurl.clone(),
        last_error: Mutex::new(None),
    });
    let ctrl = LoginController::new(api.clone(), host.clone(), Arc::new(Translations::new(locale)));

    match cli.command {
        Command::Ping => run_ping(&cli.base_url).await,
        Command::Status => run_status(&ctrl, &host).await,
        Command::RfcStatus => run_rfc_status(&api, cli.zone_id.as_deref().unwrap_or_default()).await,
        Command::Login { user, password, accept_terms } => {
            run_login(&ctrl, &host, &LoginForm::new(user, password, accept_terms)).await
        }
        Command::Anonymous => run_anonymous(&ctrl, &host).await,
        Command::Logout => run_logout(&ctrl, &host).await,
    }
}

async fn run_ping(base_url: &str) -> Result<(), CliError> {
    let url = format!("{}/healthz", base_url.trim_end_matches('/'));
    let status = reqwest::get(url).await?.status();
    if !status.is_success() {
        return Err(CliError::Health(status.as_u16()));
    }
    println!("ok");
    Ok(())
}

async fn run_status(ctrl: &LoginController, host: &TerminalHost) -> Result<(), CliError> {
    check(ctrl, host).await?;
    print_state(ctrl, &ctrl.state())
}

async fn run_rfc_status(api: &PortalClient, zone_id: &str) -> Result<(), CliError> {
    let res = api.get_rfc_status(zone_id).await?;
    let status = res.status;
    let body = res.into_ok_data().ok_or(CliError::NoBody(status))?;
    print_json(&body)
}

async fn run_login(ctrl: &LoginController, host: &TerminalHost, form: &LoginForm) -> Result<(), CliError> {
    if check(ctrl, host).await? == LoginPhase::Authorized {
        println!("already connected");
        return Ok(());
    }
    let outcome = ctrl.login(form).await;
    finish(outcome, &ctrl.state(), host)
}

async fn run_anonymous(ctrl: &LoginController, host: &TerminalHost) -> Result<(), CliError> {
    match check(ctrl, host).await? {
        LoginPhase::Authorized => {
            println!("already connected");
            Ok(())
        }
        LoginPhase::Anonymous => {
            let outcome = ctrl.login_anonymous().await;
            finish(outcome, &ctrl.state(), host)
        }
        phase => Err(CliError::Invalid(format!("guest access is not offered here ({phase:?})"))),
    }
}

async fn run_logout(ctrl: &LoginController, host: &TerminalHost) -> Result<(), CliError> {
    if check(ctrl, host).await? != LoginPhase::Authorized {
        println!("not connected");
        return Ok(());
    }
    let outcome = ctrl.logout().await;
    finish(outcome, &ctrl.state(), host)?;
    println!("signed out");
    Ok(())
}

/// Run the startup status check; a failed check is fatal for the CLI.
async fn check(ctrl: &LoginController, host: &TerminalHost) -> Result<LoginPhase, CliError> {
    match ctrl.start().await {
        ActionOutcome::Checked(phase) => Ok(phase),
        _ => Err(failure(host)),
    }
}

fn finish(outcome: ActionOutcome, state: &LoginState, host: &TerminalHost) -> Result<(), CliError> {
    match outcome {
        ActionOutcome::Redirected(_) | ActionOutcome::Checked(_) => Ok(()),
        ActionOutcome::Reloaded => {
            if state.phase == LoginPhase::Authorized {
                println!("connected");
            }
            Ok(())
        }
        ActionOutcome::Invalid => Err(CliError::Invalid(describe_errors(&state.errors))),
        ActionOutcome::Rejected => {
            let reason = host
                .take_error()
                .or_else(|| state.errors.password.clone())
                .unwrap_or_default();
            Err(CliError::Rejected(reason))
        }
        ActionOutcome::Failed | ActionOutcome::Ignored => Err(failure(host)),
    }
}

fn failure(host: &TerminalHost) -> CliError {
    CliError::ActionFailed(host.take_error().unwrap_or_else(|| "portal action failed".to_owned()))
}

fn describe_errors(errors: &FormErrors) -> String {
    [&errors.username, &errors.password, &errors.terms, &errors.root]
        .into_iter()
        .flatten()
        .cloned()
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Serialize)]
struct StatusView<'a> {
    title: String,
    description: String,
    phase: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<&'a dtos::ClientStatusResponse>,
}

fn print_state(ctrl: &LoginController, state: &LoginState) -> Result<(), CliError> {
    let header = ctrl.header_content();
    let view = StatusView {
        title: header.title,
        description: header.description,
        phase: format!("{:?}", state.phase).to_lowercase(),
        status: state.client_status.as_ref(),
    };
    print_json(&view)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
