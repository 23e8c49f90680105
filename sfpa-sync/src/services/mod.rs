//! Pipeline components and the remote service boundary
//!
//! - `connector` / `metadata_lister` / `metadata_updater`: validated remote calls
//! - `profile_transformer`: pure desired-state computation
//! - `soap`: Metadata API client over SOAP

pub mod connector;
pub mod metadata_lister;
pub mod metadata_service;
pub mod metadata_updater;
pub mod profile_transformer;
pub mod soap;

#[cfg(test)]
pub(crate) mod test_support;

pub use connector::connect;
pub use metadata_lister::list_metadata;
pub use metadata_service::{MetadataService, Session};
pub use metadata_updater::update_metadata;
pub use profile_transformer::{
    build_class_accesses, build_update_records, extract_profile_names, ProfileTransformer,
};
pub use soap::SoapMetadataClient;

use crate::error::ServiceError;
use std::future::Future;
use std::time::Duration;

/// Bound a remote call by `timeout`
pub(crate) async fn with_timeout<T, F>(timeout: Duration, call: F) -> Result<T, ServiceError>
where
    F: Future<Output = Result<T, ServiceError>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => Err(ServiceError::Timeout(timeout)),
    }
}

/// Whitespace-only values count as missing
pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
