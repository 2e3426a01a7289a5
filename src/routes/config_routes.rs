//! Configuration probe
//!
//! `GET /api/notion/config` tells clients whether the upstream
//! workspace databases are fully configured, so they can fall back to
//! local storage without probing the data routes.

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use serde::Serialize;
use std::sync::Arc;

use crate::routes::json_response;
use crate::server::AppState;

#[derive(Serialize)]
struct ConfigResponse {
    configured: bool,
}

pub fn handle_config_request(state: Arc<AppState>) -> Response<Full<Bytes>> {
    json_response(
        StatusCode::OK,
        &ConfigResponse {
            configured: state.args.notion_configured(),
        },
    )
}
