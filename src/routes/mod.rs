//! HTTP routes for Signpost

pub mod auth_routes;
pub mod config_routes;
pub mod health;
pub mod roadmap;

pub use auth_routes::handle_auth_request;
pub use config_routes::handle_config_request;
pub use health::{health_check, version_info};
pub use roadmap::handle_roadmap_request;

use crate::types::{Result, SignpostError};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{Request, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Build a JSON response with permissive CORS headers
pub fn json_response<T: Serialize>(status: StatusCode, data: &T) -> Response<Full<Bytes>> {
    let body = serde_json::to_vec(data).unwrap_or_default();
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(Full::new(Bytes::from(body)))
        .unwrap()
}

/// Map an error to its wire shape
pub fn error_response(err: &SignpostError) -> Response<Full<Bytes>> {
    json_response(err.status(), &err.body())
}

/// CORS preflight response
pub fn preflight_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "GET, POST, PATCH, DELETE, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type, x-api-key")
        .header("Access-Control-Allow-Credentials", "true")
        .body(Full::new(Bytes::new()))
        .unwrap()
}

/// Collect and deserialize a JSON request body
pub async fn read_json_body<T: DeserializeOwned>(req: Request<hyper::body::Incoming>) -> Result<T> {
    let bytes = req
        .collect()
        .await
        .map_err(|e| SignpostError::BadRequest(format!("Failed to read request body: {}", e)))?
        .to_bytes();
    serde_json::from_slice(&bytes)
        .map_err(|e| SignpostError::BadRequest(format!("Invalid JSON body: {}", e)))
}
