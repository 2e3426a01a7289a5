//! Configuration for Signpost
//!
//! CLI arguments and environment variable handling using clap.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Signpost - roadmap planning gateway
///
/// Proxies roadmap CRUD (goals, initiatives, deliverables) to the Notion
/// workspace-database API, or to a local JSON store when Notion is not
/// configured.
#[derive(Parser, Debug, Clone)]
#[command(name = "signpost")]
#[command(about = "Roadmap planning gateway over Notion or local storage")]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:3000")]
    pub listen: SocketAddr,

    /// Shared access key gating the API. When unset, all requests are
    /// authorized (no-auth dev mode).
    #[arg(long, env = "API_KEY")]
    pub api_key: Option<String>,

    /// Notion integration token
    #[arg(long, env = "NOTION_TOKEN")]
    pub notion_token: Option<String>,

    /// Notion database id for goals
    #[arg(long, env = "GOALS_DB_ID")]
    pub goals_db_id: Option<String>,

    /// Notion database id for initiatives
    #[arg(long, env = "INITIATIVES_DB_ID")]
    pub initiatives_db_id: Option<String>,

    /// Notion database id for deliverables
    #[arg(long, env = "DELIVERABLES_DB_ID")]
    pub deliverables_db_id: Option<String>,

    /// Notion API base URL (override for testing)
    #[arg(long, env = "NOTION_BASE_URL", default_value = "https://api.notion.com/v1")]
    pub notion_base_url: String,

    /// Backend selection: "notion" or "local".
    /// "auto" picks notion when configured, local otherwise.
    #[arg(long, env = "BACKEND", default_value = "auto")]
    pub backend: String,

    /// Path of the local JSON store (local backend)
    #[arg(long, env = "DATA_FILE", default_value = "signpost-data.json")]
    pub data_file: PathBuf,

    /// Upstream request timeout in milliseconds
    #[arg(long, env = "REQUEST_TIMEOUT_MS", default_value = "30000")]
    pub request_timeout_ms: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Whether the three database ids and the token are all present.
    /// Reported by /api/notion/config; all four are required together.
    pub fn notion_configured(&self) -> bool {
        self.notion_token.is_some()
            && self.goals_db_id.is_some()
            && self.initiatives_db_id.is_some()
            && self.deliverables_db_id.is_some()
    }

    /// Whether an access key gates the API
    pub fn auth_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Effective backend after resolving "auto"
    pub fn effective_backend(&self) -> Backend {
        match self.backend.as_str() {
            "notion" => Backend::Notion,
            "local" => Backend::Local,
            _ => {
                if self.notion_configured() {
                    Backend::Notion
                } else {
                    Backend::Local
                }
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        match self.backend.as_str() {
            "notion" | "local" | "auto" => {}
            other => return Err(format!("Unknown backend '{}', expected notion, local or auto", other)),
        }

        if self.backend == "notion" && !self.notion_configured() {
            return Err(
                "BACKEND=notion requires NOTION_TOKEN, GOALS_DB_ID, INITIATIVES_DB_ID and DELIVERABLES_DB_ID"
                    .to_string(),
            );
        }

        if self.request_timeout_ms == 0 {
            return Err("REQUEST_TIMEOUT_MS must be greater than zero".to_string());
        }

        Ok(())
    }
}

/// Resolved storage backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Notion,
    Local,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_with(backend: &str, token: Option<&str>) -> Args {
        Args {
            listen: "127.0.0.1:3000".parse().unwrap(),
            api_key: None,
            notion_token: token.map(String::from),
            goals_db_id: token.map(|_| "g".to_string()),
            initiatives_db_id: token.map(|_| "i".to_string()),
            deliverables_db_id: token.map(|_| "d".to_string()),
            notion_base_url: "https://api.notion.com/v1".into(),
            backend: backend.into(),
            data_file: "signpost-data.json".into(),
            request_timeout_ms: 30_000,
            log_level: "info".into(),
        }
    }

    #[test]
    fn test_auto_backend_prefers_notion_when_configured() {
        assert_eq!(args_with("auto", Some("tok")).effective_backend(), Backend::Notion);
        assert_eq!(args_with("auto", None).effective_backend(), Backend::Local);
    }

    #[test]
    fn test_notion_backend_requires_full_config() {
        assert!(args_with("notion", None).validate().is_err());
        assert!(args_with("notion", Some("tok")).validate().is_ok());
    }

    #[test]
    fn test_partial_notion_config_is_not_configured() {
        let mut args = args_with("auto", Some("tok"));
        args.deliverables_db_id = None;
        assert!(!args.notion_configured());
    }
}
