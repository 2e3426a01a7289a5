//! Health check endpoints
//!
//! - /health, /healthz - liveness probe
//! - /version - build information for deployment verification
//!
//! Liveness always returns 200 while the service is running; the body
//! carries the active backend and auth mode for operators.

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use serde::Serialize;
use std::sync::Arc;

use crate::config::Backend;
use crate::routes::json_response;
use crate::server::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub healthy: bool,
    pub version: &'static str,
    /// Active storage backend: "notion" or "local"
    pub backend: &'static str,
    /// Whether an access key gates the API
    pub auth_required: bool,
    pub timestamp: String,
}

pub fn health_check(state: Arc<AppState>) -> Response<Full<Bytes>> {
    let response = HealthResponse {
        healthy: true,
        version: env!("CARGO_PKG_VERSION"),
        backend: match state.args.effective_backend() {
            Backend::Notion => "notion",
            Backend::Local => "local",
        },
        auth_required: state.args.auth_configured(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    };
    json_response(StatusCode::OK, &response)
}

#[derive(Serialize)]
pub struct VersionResponse {
    pub version: &'static str,
    pub service: &'static str,
}

pub fn version_info() -> Response<Full<Bytes>> {
    json_response(
        StatusCode::OK,
        &VersionResponse {
            version: env!("CARGO_PKG_VERSION"),
            service: "signpost",
        },
    )
}
