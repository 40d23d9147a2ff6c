//! sentishop-api - Product catalog service with review sentiment
//!
//! Serves uploads, product creation (image classification), catalog
//! listing by dominant review emotion and review submission (sentiment
//! scoring).

use anyhow::{Context, Result};
use clap::Parser;
use sentishop_api::services::{HttpImageClassifier, HuggingFaceSentiment};
use sentishop_api::store::RecordStore;
use sentishop_api::uploads::UploadStorage;
use sentishop_api::{build_router, AppState};
use sentishop_common::config::{load_env_file, CliOverrides, Config, TomlConfig, ENV_API_KEY};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "sentishop-api", version, about = "Product catalog with review sentiment")]
struct Args {
    /// TOML config file (defaults to <config_dir>/sentishop/config.toml)
    #[arg(long, env = "SENTISHOP_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(long)]
    port: Option<u16>,

    /// Directory uploaded images are stored in
    #[arg(long)]
    upload_dir: Option<PathBuf>,

    /// JSON fixture of products and reviews to preload
    #[arg(long = "seed")]
    seed_file: Option<PathBuf>,

    /// Log level when RUST_LOG is unset (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            host: self.host.clone(),
            port: self.port,
            upload_dir: self.upload_dir.clone(),
            seed_file: self.seed_file.clone(),
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env must be in the environment before clap reads `env` defaults
    let env_file = load_env_file(None)?;
    let args = Args::parse();

    let file = TomlConfig::load_or_default(args.config.as_deref())?;
    let config = Config::resolve(args.overrides(), file)?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .context("Invalid log level")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Build identification first, before any slow startup work
    info!(
        "Starting sentishop-api v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    if let Some(path) = &env_file {
        info!("Loaded environment from {}", path.display());
    }

    if config.hugging_face_api_key.is_empty() {
        warn!("{} is not set; inference calls will be unauthenticated", ENV_API_KEY);
    }

    let uploads = UploadStorage::new(&config.upload_dir);
    uploads
        .ensure_directory_exists()
        .with_context(|| format!("Failed to create upload directory {}", config.upload_dir.display()))?;
    info!("Upload directory: {}", config.upload_dir.display());

    let store = Arc::new(RecordStore::new());
    if let Some(seed) = &config.seed_file {
        let (products, reviews) = store.seed(seed).await?;
        info!("✓ Seeded {} products and {} reviews", products, reviews);
    }

    let timeout = config.adapter_timeout();
    let classifier = HttpImageClassifier::new(&config.classifier_url, &config.hugging_face_api_key, timeout)?;
    let sentiment = HuggingFaceSentiment::new(&config.sentiment_url, &config.hugging_face_api_key, timeout)?;
    info!("Image classifier: {}", config.classifier_url);
    info!("Sentiment model: {}", config.sentiment_url);

    let state = AppState::new(store, uploads, Arc::new(classifier), Arc::new(sentiment));
    let app = build_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind to {}", address))?;
    info!("sentishop-api listening on http://{}", address);
    info!("Health check: http://{}/health", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("sentishop-api stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Cannot listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
