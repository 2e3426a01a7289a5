//! Roadmap CRUD routes
//!
//! ## Routes
//!
//! - `GET  /api/notion/{goals|initiatives|deliverables}` - list
//! - `POST /api/notion/{goals|initiatives|deliverables}` - create (201)
//! - `PATCH  /api/notion/{collection}/{id}` - partial update
//! - `DELETE /api/notion/{collection}/{id}` - archive/remove
//!
//! The gateway is a thin proxy: bodies are validated field-by-field,
//! then handed to the configured backend. Clients that keep a local
//! optimistic view (the sync layer) drive these same operations.

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Method, Request, Response, StatusCode};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::auth::require_auth;
use crate::model::{
    validate_deliverable_draft, validate_deliverable_patch, validate_goal_draft,
    validate_goal_patch, validate_initiative_draft, validate_initiative_patch,
};
use crate::routes::{error_response, json_response, read_json_body};
use crate::server::AppState;
use crate::types::{Result, SignpostError};

/// The three collections under /api/notion/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Goals,
    Initiatives,
    Deliverables,
}

/// Parsed route components
#[derive(Debug)]
struct RoadmapRoute<'a> {
    collection: Collection,
    id: Option<&'a str>,
}

impl<'a> RoadmapRoute<'a> {
    /// Parse a path like "/api/notion/goals" or "/api/notion/goals/{id}"
    fn parse(path: &'a str) -> Option<Self> {
        let stripped = path.strip_prefix("/api/notion/")?;
        let mut parts = stripped.splitn(2, '/');
        let collection = match parts.next()? {
            "goals" => Collection::Goals,
            "initiatives" => Collection::Initiatives,
            "deliverables" => Collection::Deliverables,
            _ => return None,
        };
        Some(Self {
            collection,
            id: parts.next().filter(|s| !s.is_empty()),
        })
    }
}

#[derive(Serialize)]
struct DeleteResponse {
    success: bool,
}

pub async fn handle_roadmap_request(
    state: Arc<AppState>,
    req: Request<hyper::body::Incoming>,
) -> Response<Full<Bytes>> {
    if let Err(err) = require_auth(req.headers(), state.args.api_key.as_deref()) {
        return error_response(&err);
    }

    let path = req.uri().path().to_string();
    let Some(route) = RoadmapRoute::parse(&path) else {
        return error_response(&SignpostError::NotFound(path));
    };
    debug!("{} {:?} id={:?}", req.method(), route.collection, route.id);

    let result = match (req.method().clone(), route.id) {
        (Method::GET, None) => list(&state, route.collection).await,
        (Method::POST, None) => create(&state, route.collection, req).await,
        (Method::PATCH, Some(id)) => {
            let id = id.to_string();
            update(&state, route.collection, &id, req).await
        }
        (Method::DELETE, Some(id)) => {
            let id = id.to_string();
            delete(&state, route.collection, &id).await
        }
        _ => Err(SignpostError::MethodNotAllowed),
    };

    match result {
        Ok(response) => response,
        Err(err) => error_response(&err),
    }
}

async fn list(state: &AppState, collection: Collection) -> Result<Response<Full<Bytes>>> {
    let response = match collection {
        Collection::Goals => json_response(StatusCode::OK, &state.backend.list_goals().await?),
        Collection::Initiatives => {
            json_response(StatusCode::OK, &state.backend.list_initiatives().await?)
        }
        Collection::Deliverables => {
            json_response(StatusCode::OK, &state.backend.list_deliverables().await?)
        }
    };
    Ok(response)
}

async fn create(
    state: &AppState,
    collection: Collection,
    req: Request<hyper::body::Incoming>,
) -> Result<Response<Full<Bytes>>> {
    let response = match collection {
        Collection::Goals => {
            let draft = read_json_body(req).await?;
            validate_goal_draft(&draft)?;
            let goal = state.backend.create_goal(&draft).await?;
            info!("Created goal {}", goal.id);
            json_response(StatusCode::CREATED, &goal)
        }
        Collection::Initiatives => {
            let draft = read_json_body(req).await?;
            validate_initiative_draft(&draft)?;
            let initiative = state.backend.create_initiative(&draft).await?;
            info!("Created initiative {}", initiative.id);
            json_response(StatusCode::CREATED, &initiative)
        }
        Collection::Deliverables => {
            let draft = read_json_body(req).await?;
            validate_deliverable_draft(&draft)?;
            let deliverable = state.backend.create_deliverable(&draft).await?;
            info!("Created deliverable {}", deliverable.id);
            json_response(StatusCode::CREATED, &deliverable)
        }
    };
    Ok(response)
}

async fn update(
    state: &AppState,
    collection: Collection,
    id: &str,
    req: Request<hyper::body::Incoming>,
) -> Result<Response<Full<Bytes>>> {
    let response = match collection {
        Collection::Goals => {
            let patch = read_json_body(req).await?;
            validate_goal_patch(&patch)?;
            json_response(StatusCode::OK, &state.backend.update_goal(id, &patch).await?)
        }
        Collection::Initiatives => {
            let patch = read_json_body(req).await?;
            validate_initiative_patch(&patch)?;
            json_response(
                StatusCode::OK,
                &state.backend.update_initiative(id, &patch).await?,
            )
        }
        Collection::Deliverables => {
            let patch = read_json_body(req).await?;
            validate_deliverable_patch(&patch)?;
            json_response(
                StatusCode::OK,
                &state.backend.update_deliverable(id, &patch).await?,
            )
        }
    };
    Ok(response)
}

async fn delete(
    state: &AppState,
    collection: Collection,
    id: &str,
) -> Result<Response<Full<Bytes>>> {
    match collection {
        Collection::Goals => state.backend.delete_goal(id).await?,
        Collection::Initiatives => state.backend.delete_initiative(id).await?,
        Collection::Deliverables => state.backend.delete_deliverable(id).await?,
    }
    info!("Deleted {:?} entry {}", collection, id);
    Ok(json_response(StatusCode::OK, &DeleteResponse { success: true }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_parsing() {
        let r = RoadmapRoute::parse("/api/notion/goals").unwrap();
        assert_eq!(r.collection, Collection::Goals);
        assert!(r.id.is_none());

        let r = RoadmapRoute::parse("/api/notion/deliverables/abc-123").unwrap();
        assert_eq!(r.collection, Collection::Deliverables);
        assert_eq!(r.id, Some("abc-123"));

        assert!(RoadmapRoute::parse("/api/notion/widgets").is_none());
        assert!(RoadmapRoute::parse("/api/other/goals").is_none());
    }

    #[test]
    fn test_trailing_slash_is_collection_route() {
        let r = RoadmapRoute::parse("/api/notion/goals/").unwrap();
        assert!(r.id.is_none());
    }
}
