//! sfpa-sync - Profile permission sync
//!
//! Reads the permission config, logs in to the org, and applies class access and
//! object permissions to every profile not listed in `excludedProfiles`.

use anyhow::{Context, Result};
use clap::Parser;
use sfpa_common::config::{load_config, resolve_config_path};
use sfpa_sync::logging;
use sfpa_sync::models::{Credentials, SyncSession};
use sfpa_sync::{PipelineSettings, ProfileTransformer, SoapMetadataClient, SyncPipeline};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "sfpa-sync")]
#[command(about = "Grant class access and object permissions to org profiles")]
#[command(version)]
struct Args {
    /// Path to the permission config (JSON or TOML)
    #[arg(short, long, env = "SFPA_CONFIG")]
    config: Option<PathBuf>,

    /// Login endpoint, e.g. https://login.salesforce.com
    #[arg(long, env = "LOGIN_URL")]
    login_url: Option<String>,

    #[arg(short, long, env = "USERNAME", default_value = "")]
    username: String,

    #[arg(short, long, env = "PASSWORD", hide_env_values = true, default_value = "")]
    password: String,

    /// Override `sync.maxConcurrentUpdates`
    #[arg(long)]
    max_concurrent_updates: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env must be loaded before clap reads env-backed args
    let dotenv = dotenvy::dotenv().ok();

    let args = Args::parse();

    // Tracing before anything that logs, so config warnings are not lost
    let log_filter = logging::init();

    info!("Starting sfpa-sync v{}", env!("CARGO_PKG_VERSION"));
    if let Some(path) = dotenv {
        info!("Loaded environment from {}", path.display());
    }

    let config_path = resolve_config_path(args.config.as_deref())?;
    let mut config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    log_filter.apply_config_level(&config.logging.level);

    if let Some(limit) = args.max_concurrent_updates {
        config.sync.max_concurrent_updates = limit;
        config.sync.validate()?;
    }

    // CLI / env wins over the config file
    let endpoint_url = args
        .login_url
        .or_else(|| config.sync.login_url.clone())
        .unwrap_or_default();
    let credentials = Credentials::new(endpoint_url, args.username, args.password);

    let settings = PipelineSettings::from(&config.sync);
    let client = SoapMetadataClient::new(settings.api_version.clone(), settings.request_timeout)?;
    let transformer = ProfileTransformer::from_config(&config);
    let pipeline = SyncPipeline::new(Arc::new(client), settings, transformer);

    let mut session = SyncSession::new();
    info!(run_id = %session.run_id, "Sync run started");

    // Failures are logged by the pipeline; anyhow reports the returned error on exit
    let results = pipeline.execute(&credentials, &mut session).await?;

    info!(
        run_id = %session.run_id,
        results = results.len(),
        elapsed_ms = session.elapsed_ms(),
        "Sync run complete"
    );

    Ok(())
}
