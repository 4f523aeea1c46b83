//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the captive-portal access endpoints under a single Axum router. The
//! access routes exist with and without a zone segment because appliances
//! are addressed both ways. Outside development mode they all answer 404.

pub mod access;

use axum::Router;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

const ACCESS_PREFIX: &str = "/api/captiveportal/access";

/// Captive-portal access routes, gated on development mode.
fn access_routes(state: AppState) -> Router<AppState> {
    let status = || get(access::status_default).post(access::status_default);
    let logon = || post(access::logon_default);
    let logoff = || post(access::logoff_default);

    Router::new()
        .route(&format!("{ACCESS_PREFIX}/status"), status())
        .route(&format!("{ACCESS_PREFIX}/status/"), status())
        .route(
            &format!("{ACCESS_PREFIX}/status/{{zoneid}}"),
            get(access::status_zone).post(access::status_zone),
        )
        .route(&format!("{ACCESS_PREFIX}/logon"), logon())
        .route(&format!("{ACCESS_PREFIX}/logon/"), logon())
        .route(&format!("{ACCESS_PREFIX}/logon/{{zoneid}}"), post(access::logon_zone))
        .route(&format!("{ACCESS_PREFIX}/logoff"), logoff())
        .route(&format!("{ACCESS_PREFIX}/logoff/"), logoff())
        .route(&format!("{ACCESS_PREFIX}/logoff/{{zoneid}}"), post(access::logoff_zone))
        .route(&format!("{ACCESS_PREFIX}/api"), get(access::captive_api))
        .route(&format!("{ACCESS_PREFIX}/api/"), get(access::captive_api))
        .layer(middleware::from_fn_with_state(state, require_dev_mode))
}

/// Full application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(access_routes(state.clone()))
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Mock endpoints only exist in development mode. Everything else sees 404
/// whatever the method or body.
async fn require_dev_mode(State(state): State<AppState>, req: Request, next: Next) -> Response {
    if !state.config.dev_mode {
        return (StatusCode::NOT_FOUND, "Not found").into_response();
    }
    next.run(req).await
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
