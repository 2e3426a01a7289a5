//! HTTP server for the roadmap gateway
//!
//! Uses hyper http1 with TokioIo for async handling. Routing is a plain
//! `match (method, path)` over the small REST surface; everything under
//! /api/notion/ goes through the shared-key auth gate.

use bytes::Bytes;
use http_body_util::Full;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{body::Incoming, Method, Request, Response};
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use crate::config::Args;
use crate::routes::{
    error_response, handle_auth_request, handle_config_request, handle_roadmap_request,
    health_check, preflight_response, version_info,
};
use crate::store::RoadmapBackend;
use crate::types::{Result, SignpostError};

/// Shared application state
pub struct AppState {
    pub args: Args,
    pub backend: Arc<dyn RoadmapBackend>,
}

impl AppState {
    pub fn new(args: Args, backend: Arc<dyn RoadmapBackend>) -> Self {
        Self { args, backend }
    }
}

pub async fn run(state: Arc<AppState>) -> Result<()> {
    let listener = TcpListener::bind(state.args.listen).await?;

    info!("Signpost listening on {}", state.args.listen);
    if !state.args.auth_configured() {
        info!("No API key configured - running in open mode");
    }

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    let io = TokioIo::new(stream);

                    let service = service_fn(move |req| {
                        let state = Arc::clone(&state);
                        async move { handle_request(state, addr, req).await }
                    });

                    if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                        error!("Error serving connection from {}: {:?}", addr, err);
                    }
                });
            }
            Err(e) => {
                error!("Error accepting connection: {:?}", e);
            }
        }
    }
}

/// Route incoming HTTP requests
async fn handle_request(
    state: Arc<AppState>,
    addr: SocketAddr,
    req: Request<Incoming>,
) -> std::result::Result<Response<Full<Bytes>>, hyper::Error> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    debug!("{} {} from {}", method, path, addr);

    let response = match (method, path.as_str()) {
        (Method::OPTIONS, _) => preflight_response(),

        (Method::GET, "/health") | (Method::GET, "/healthz") => health_check(state),
        (Method::GET, "/version") => version_info(),

        (Method::GET, "/api/notion/config") => handle_config_request(state),

        (_, p) if p.starts_with("/api/auth/") => handle_auth_request(state, req).await,

        (_, p) if p.starts_with("/api/notion/") => handle_roadmap_request(state, req).await,

        _ => error_response(&SignpostError::NotFound(path)),
    };

    Ok(response)
}
