//! Metadata update submission (one remote call per batch)

use super::{is_blank, with_timeout, MetadataService, Session};
use crate::error::{SyncError, SyncResult};
use crate::models::{ProfileUpdateRecord, UpdateResult};
use std::time::Duration;
use tracing::{debug, warn};

/// Submit one batch of records in a single update call
///
/// Results come back in the order the remote returns them. A transport failure,
/// SOAP fault or timeout fails the whole batch.
pub async fn update_metadata(
    service: &dyn MetadataService,
    session: &Session,
    metadata_type: &str,
    records: &[ProfileUpdateRecord],
    timeout: Duration,
) -> SyncResult<Vec<UpdateResult>> {
    if is_blank(metadata_type) {
        return Err(SyncError::Validation(
            "No metadata type specified".to_string(),
        ));
    }

    debug!(
        metadata_type,
        records = records.len(),
        first = records.first().map(|r| r.full_name.as_str()).unwrap_or(""),
        "Submitting metadata update"
    );

    let results = with_timeout(
        timeout,
        service.update_metadata(session, metadata_type, records),
    )
    .await
    .map_err(|source| SyncError::Remote {
        operation: "updateMetadata",
        source,
    })?;

    if results.len() != records.len() {
        warn!(
            submitted = records.len(),
            returned = results.len(),
            "Remote returned a different number of results than records submitted"
        );
    }

    Ok(results)
}
