//! Error types for sfpa-sync
//!
//! `ServiceError` describes what went wrong at the remote boundary; `SyncError` says
//! which pipeline stage it broke. Nothing is retried: every error ends the run.

use std::time::Duration;
use thiserror::Error;

/// Remote metadata service errors
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("SOAP fault {code}: {message}")]
    Fault { code: String, message: String },

    #[error("HTTP error {0}: {1}")]
    Http(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Pipeline errors
#[derive(Debug, Error)]
pub enum SyncError {
    /// Missing or invalid argument, detected before any I/O
    #[error("Validation error: {0}")]
    Validation(String),

    /// Remote rejected the credentials
    #[error("Authentication failed: {0}")]
    Authentication(#[source] ServiceError),

    /// List or update call failed
    #[error("{operation} failed: {source}")]
    Remote {
        operation: &'static str,
        #[source]
        source: ServiceError,
    },

    /// At least one concurrent batch update failed
    #[error("{failed_batches} of {total_batches} update batches failed, first failure: {source}")]
    Aggregation {
        failed_batches: usize,
        total_batches: usize,
        #[source]
        source: Box<SyncError>,
    },

    #[error(transparent)]
    Config(#[from] sfpa_common::Error),
}

pub type SyncResult<T> = Result<T, SyncError>;
