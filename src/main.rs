//! Signpost - roadmap planning gateway

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use signpost::{
    config::{Args, Backend},
    notion::NotionConfig,
    server,
    store::{LocalStore, NotionBackend, NotionDatabases, RoadmapBackend},
    AppState,
};
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    // Parse command line arguments
    let args = Args::parse();

    // Initialize tracing/logging
    let log_level = args.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("signpost={},info", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Validate configuration
    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    // Print startup banner
    info!("======================================");
    info!("  Signpost - Roadmap Gateway");
    info!("======================================");
    info!("Listen: {}", args.listen);
    info!(
        "Auth: {}",
        if args.auth_configured() { "API key" } else { "OPEN (no key configured)" }
    );
    info!("Backend: {:?}", args.effective_backend());
    info!("======================================");

    let backend: Arc<dyn RoadmapBackend> = match args.effective_backend() {
        Backend::Notion => {
            // validate() guarantees the credentials are present here
            let config = NotionConfig {
                token: args.notion_token.clone().unwrap_or_default(),
                base_url: args.notion_base_url.clone(),
                timeout: Duration::from_millis(args.request_timeout_ms),
            };
            let databases = NotionDatabases {
                goals: args.goals_db_id.clone().unwrap_or_default(),
                initiatives: args.initiatives_db_id.clone().unwrap_or_default(),
                deliverables: args.deliverables_db_id.clone().unwrap_or_default(),
            };
            Arc::new(NotionBackend::new(config, databases)?)
        }
        Backend::Local => {
            info!("Using local JSON store at {:?}", args.data_file);
            Arc::new(LocalStore::open(&args.data_file))
        }
    };

    let state = Arc::new(AppState::new(args, backend));
    server::run(state).await?;

    Ok(())
}
