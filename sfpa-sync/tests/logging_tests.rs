//! Startup logging: config warnings, configured level, single report of stage failures

mod helpers;

use helpers::{FakeMetadataService, LogCapture};
use sfpa_common::config::load_config;
use sfpa_sync::logging::LogFilter;
use sfpa_sync::models::{Credentials, SyncSession};
use sfpa_sync::{PipelineSettings, ProfileTransformer, SyncError, SyncPipeline};
use std::sync::Arc;
use tempfile::TempDir;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry};

/// Subscriber shaped like the one `main` installs, with capture in place of fmt
fn capture_subscriber(
    filter: EnvFilter,
    from_env: bool,
) -> (impl tracing::Subscriber + Send + Sync, LogFilter, LogCapture) {
    let capture = LogCapture::new();
    let (filter_layer, log_filter) = LogFilter::with_filter(filter, from_env);
    let subscriber = Registry::default().with(filter_layer).with(capture.clone());
    (subscriber, log_filter, capture)
}

// ============================================================================
// Config loading
// ============================================================================

#[test]
fn test_config_warnings_reach_subscriber_installed_first() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{"excludedProfiles": ["Admin", 7], "classAccess": "ClassA", "objectAccess": []}"#,
    )
    .unwrap();

    let (subscriber, log_filter, capture) = capture_subscriber(EnvFilter::new("info"), false);
    let _guard = tracing::subscriber::set_default(subscriber);

    let config = load_config(&path).unwrap();
    log_filter.apply_config_level(&config.logging.level);

    assert!(config.class_access.is_empty());
    capture.assert_contains("Expected a list, treating as empty");
    capture.assert_contains("Ignoring non-string list entry");
    capture.assert_contains("Configuration loaded");
}

// ============================================================================
// Configured level
// ============================================================================

#[test]
fn test_configured_level_replaces_default() {
    let (subscriber, log_filter, capture) = capture_subscriber(EnvFilter::new("info"), false);
    let _guard = tracing::subscriber::set_default(subscriber);

    tracing::info!("before reload");
    log_filter.apply_config_level("warn");
    tracing::info!("after reload");
    tracing::warn!("warning after reload");

    capture.assert_contains("before reload");
    capture.assert_no_match("after reload");
    capture.assert_contains("warning after reload");
}

#[test]
fn test_rust_log_filter_kept_over_configured_level() {
    let (subscriber, log_filter, capture) = capture_subscriber(EnvFilter::new("warn"), true);
    let _guard = tracing::subscriber::set_default(subscriber);

    log_filter.apply_config_level("debug");
    tracing::info!("info under RUST_LOG=warn");

    capture.assert_no_match("info under RUST_LOG=warn");
}

#[test]
fn test_invalid_configured_level_keeps_current_filter() {
    let (subscriber, log_filter, capture) = capture_subscriber(EnvFilter::new("info"), false);
    let _guard = tracing::subscriber::set_default(subscriber);

    log_filter.apply_config_level("sfpa_sync=verbose");
    tracing::info!("still at info");

    capture.assert_contains("Invalid logging.level");
    capture.assert_contains("still at info");
}

// ============================================================================
// Stage failures
// ============================================================================

#[tokio::test]
async fn test_stage_failure_logged_once_and_returned() {
    let (subscriber, _log_filter, capture) = capture_subscriber(EnvFilter::new("info"), false);
    let _guard = tracing::subscriber::set_default(subscriber);

    let service = Arc::new(FakeMetadataService::with_profiles(&["Admin"]));
    let pipeline = SyncPipeline::new(
        service,
        PipelineSettings::default(),
        ProfileTransformer::default(),
    );
    let mut session = SyncSession::new();
    let credentials = Credentials::new("https://login.salesforce.com", "", "secret");

    let err = pipeline
        .execute(&credentials, &mut session)
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::Validation(ref m) if m == "No username provided"));
    assert_eq!(capture.count_at(Level::ERROR, "No username provided"), 1);
}
