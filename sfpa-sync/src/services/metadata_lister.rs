//! Metadata listing

use super::{is_blank, with_timeout, MetadataService, Session};
use crate::error::{SyncError, SyncResult};
use crate::models::{ListMetadataQuery, MetadataDescriptor};
use std::time::Duration;
use tracing::info;

/// List descriptors of the queried types
///
/// Order is whatever the remote returns; it is not stable between runs.
pub async fn list_metadata(
    service: &dyn MetadataService,
    session: &Session,
    type_specs: &[ListMetadataQuery],
    api_version: &str,
    timeout: Duration,
) -> SyncResult<Vec<MetadataDescriptor>> {
    if type_specs.is_empty() || type_specs.iter().any(|q| is_blank(&q.metadata_type)) {
        return Err(SyncError::Validation(
            "No types provided to list metadata".to_string(),
        ));
    }
    if is_blank(api_version) {
        return Err(SyncError::Validation(
            "No api version specified to list metadata".to_string(),
        ));
    }

    let types: Vec<&str> = type_specs.iter().map(|q| q.metadata_type.as_str()).collect();
    info!(types = ?types, api_version, "Retrieving metadata");

    let descriptors = with_timeout(timeout, service.list_metadata(session, type_specs, api_version))
        .await
        .map_err(|source| SyncError::Remote {
            operation: "listMetadata",
            source,
        })?;

    info!(count = descriptors.len(), "Successfully retrieved metadata");
    Ok(descriptors)
}
