//! Session establishment
//!
//! Validates the three credential values before anything touches the network, then
//! performs exactly one login call.

use super::{is_blank, with_timeout, MetadataService, Session};
use crate::error::{SyncError, SyncResult};
use crate::models::Credentials;
use std::time::Duration;
use tracing::info;

/// Authenticate against the login endpoint in `credentials`
///
/// Fails with [`SyncError::Validation`] for an empty url, username or password (checked
/// in that order) and with [`SyncError::Authentication`] when the remote rejects the
/// login. No retry.
pub async fn connect(
    service: &dyn MetadataService,
    credentials: &Credentials,
    timeout: Duration,
) -> SyncResult<Session> {
    if is_blank(&credentials.endpoint_url) {
        return Err(SyncError::Validation("No url provided".to_string()));
    }
    if is_blank(&credentials.username) {
        return Err(SyncError::Validation("No username provided".to_string()));
    }
    if is_blank(&credentials.password) {
        return Err(SyncError::Validation("No password provided".to_string()));
    }

    info!(
        endpoint = %credentials.endpoint_url,
        username = %credentials.username,
        "Connecting to Salesforce"
    );

    let session = with_timeout(timeout, service.authenticate(credentials))
        .await
        .map_err(SyncError::Authentication)?;

    info!(
        user_id = session.user_id.as_deref().unwrap_or("unknown"),
        organization_id = session.organization_id.as_deref().unwrap_or("unknown"),
        "Successfully established Salesforce connection"
    );

    Ok(session)
}
