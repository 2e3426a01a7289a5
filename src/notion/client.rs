//! Notion REST client
//!
//! Covers the three calls the gateway needs: query a database's pages,
//! create a page, and update a page (field patch or archival). Upstream
//! failures are classified into the 401/404/500 taxonomy, preferring
//! the structured HTTP status and falling back to substring matching on
//! the upstream message for transport-level errors.

use crate::types::{Result, SignpostError};
use hyper::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

/// Notion-Version header value the property mapping is written against
pub const NOTION_VERSION: &str = "2022-06-28";

#[derive(Debug, Clone)]
pub struct NotionConfig {
    pub token: String,
    pub base_url: String,
    pub timeout: Duration,
}

pub struct NotionClient {
    http: reqwest::Client,
    config: NotionConfig,
}

/// Error body the Notion API returns: `{ object: "error", status, code, message }`
#[derive(Debug, Deserialize)]
struct UpstreamErrorBody {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    results: Vec<Value>,
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    next_cursor: Option<String>,
}

impl NotionClient {
    pub fn new(config: NotionConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SignpostError::Http(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { http, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, self.url(path))
            .bearer_auth(&self.config.token)
            .header("Notion-Version", NOTION_VERSION)
    }

    async fn check(response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }
        let message = response
            .json::<UpstreamErrorBody>()
            .await
            .map(|b| b.message)
            .unwrap_or_default();
        warn!("Notion API error {}: {}", status, message);
        Err(classify_upstream_status(status, message))
    }

    /// Query every page of a database, following pagination cursors
    pub async fn query_database(&self, database_id: &str) -> Result<Vec<Value>> {
        let mut pages = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut body = json!({});
            if let Some(c) = &cursor {
                body["start_cursor"] = json!(c);
            }
            let response = self
                .request(reqwest::Method::POST, &format!("databases/{}/query", database_id))
                .json(&body)
                .send()
                .await
                .map_err(transport_error)?;

            let parsed: QueryResponse = serde_json::from_value(Self::check(response).await?)?;
            debug!(
                "Queried database {}: {} page(s), has_more={}",
                database_id,
                parsed.results.len(),
                parsed.has_more
            );
            pages.extend(parsed.results);

            if !parsed.has_more {
                return Ok(pages);
            }
            cursor = parsed.next_cursor;
        }
    }

    /// Create a page in a database, returning the full page object
    pub async fn create_page(&self, database_id: &str, properties: Value) -> Result<Value> {
        let response = self
            .request(reqwest::Method::POST, "pages")
            .json(&json!({
                "parent": { "database_id": database_id },
                "properties": properties,
            }))
            .send()
            .await
            .map_err(transport_error)?;
        Self::check(response).await
    }

    /// Patch a page's properties
    pub async fn update_page(&self, page_id: &str, properties: Value) -> Result<Value> {
        let response = self
            .request(reqwest::Method::PATCH, &format!("pages/{}", page_id))
            .json(&json!({ "properties": properties }))
            .send()
            .await
            .map_err(transport_error)?;
        Self::check(response).await
    }

    /// Archive a page (the DELETE semantics of the REST surface)
    pub async fn archive_page(&self, page_id: &str) -> Result<()> {
        let response = self
            .request(reqwest::Method::PATCH, &format!("pages/{}", page_id))
            .json(&json!({ "archived": true }))
            .send()
            .await
            .map_err(transport_error)?;
        Self::check(response).await?;
        Ok(())
    }
}

fn transport_error(e: reqwest::Error) -> SignpostError {
    classify_upstream_error(&e.to_string())
}

fn classify_upstream_status(status: reqwest::StatusCode, message: String) -> SignpostError {
    let mapped = match status.as_u16() {
        401 | 403 => StatusCode::UNAUTHORIZED,
        404 => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let message = match mapped {
        StatusCode::UNAUTHORIZED => "Invalid Notion token".to_string(),
        StatusCode::NOT_FOUND => "Resource not found".to_string(),
        _ if message.is_empty() => "Upstream service error".to_string(),
        _ => message,
    };
    SignpostError::Upstream {
        status: mapped,
        message,
    }
}

/// Substring-heuristic classification of an upstream error message:
/// "unauthorized"/"token" maps to 401, "not found" to 404, anything
/// else to 500. Fragile for reworded upstream messages; used only when
/// no structured status is available.
pub fn classify_upstream_error(message: &str) -> SignpostError {
    let lower = message.to_lowercase();
    if lower.contains("unauthorized") || lower.contains("token") {
        SignpostError::Upstream {
            status: StatusCode::UNAUTHORIZED,
            message: "Invalid Notion token".to_string(),
        }
    } else if lower.contains("not found") || lower.contains("could not find") {
        SignpostError::Upstream {
            status: StatusCode::NOT_FOUND,
            message: "Resource not found".to_string(),
        }
    } else {
        SignpostError::Upstream {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heuristic_classifies_auth_errors() {
        let err = classify_upstream_error("API token is invalid");
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        let err = classify_upstream_error("request unauthorized");
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_heuristic_classifies_not_found() {
        let err = classify_upstream_error("Could not find database with ID xyz");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_heuristic_defaults_to_500() {
        let err = classify_upstream_error("connection reset by peer");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_status_classification_beats_substrings() {
        let err = classify_upstream_status(reqwest::StatusCode::FORBIDDEN, "whatever".into());
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        let err = classify_upstream_status(reqwest::StatusCode::NOT_FOUND, String::new());
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}
