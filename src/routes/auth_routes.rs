//! Session authentication routes
//!
//! - `POST /api/auth/login` - exchange the shared key for an HTTP-only
//!   session cookie
//! - `POST /api/auth/logout` - clear the session cookie
//! - `GET  /api/auth/status` - whether this request is authenticated and
//!   whether auth is required at all

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Method, Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::auth::{login_cookie, logout_cookie, presented_key};
use crate::routes::{error_response, json_response, read_json_body};
use crate::server::AppState;
use crate::types::SignpostError;

#[derive(Deserialize)]
struct LoginRequest {
    key: String,
}

#[derive(Serialize)]
struct LoginResponse {
    success: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusResponse {
    authenticated: bool,
    auth_required: bool,
}

pub async fn handle_auth_request(
    state: Arc<AppState>,
    req: Request<hyper::body::Incoming>,
) -> Response<Full<Bytes>> {
    let path = req.uri().path().to_string();
    match (req.method().clone(), path.as_str()) {
        (Method::POST, "/api/auth/login") => handle_login(state, req).await,
        (Method::POST, "/api/auth/logout") => handle_logout(),
        (Method::GET, "/api/auth/status") => handle_status(state, &req),
        (_, "/api/auth/login") | (_, "/api/auth/logout") | (_, "/api/auth/status") => {
            error_response(&SignpostError::MethodNotAllowed)
        }
        _ => error_response(&SignpostError::NotFound(path)),
    }
}

async fn handle_login(
    state: Arc<AppState>,
    req: Request<hyper::body::Incoming>,
) -> Response<Full<Bytes>> {
    let Some(expected) = state.args.api_key.clone() else {
        // Open mode: nothing to log into, report success without a cookie
        return json_response(StatusCode::OK, &LoginResponse { success: true });
    };

    let body: LoginRequest = match read_json_body(req).await {
        Ok(body) => body,
        Err(err) => return error_response(&err),
    };
    if body.key != expected {
        return error_response(&SignpostError::Unauthorized);
    }

    info!("Session established via login");
    with_cookie(
        json_response(StatusCode::OK, &LoginResponse { success: true }),
        &login_cookie(&body.key),
    )
}

fn handle_logout() -> Response<Full<Bytes>> {
    with_cookie(
        json_response(StatusCode::OK, &LoginResponse { success: true }),
        &logout_cookie(),
    )
}

fn handle_status(state: Arc<AppState>, req: &Request<hyper::body::Incoming>) -> Response<Full<Bytes>> {
    let auth_required = state.args.api_key.is_some();
    let authenticated = match state.args.api_key.as_deref() {
        None => true,
        Some(expected) => presented_key(req.headers()).as_deref() == Some(expected),
    };
    json_response(
        StatusCode::OK,
        &StatusResponse {
            authenticated,
            auth_required,
        },
    )
}

fn with_cookie(mut response: Response<Full<Bytes>>, cookie: &str) -> Response<Full<Bytes>> {
    if let Ok(value) = hyper::header::HeaderValue::from_str(cookie) {
        response
            .headers_mut()
            .insert(hyper::header::SET_COOKIE, value);
    }
    response
}
