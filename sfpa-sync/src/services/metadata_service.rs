//! Remote metadata service boundary
//!
//! The pipeline only talks to the platform through [`MetadataService`]; the SOAP client
//! is the production implementation and tests script their own.

use crate::error::ServiceError;
use crate::models::{
    Credentials, ListMetadataQuery, MetadataDescriptor, ProfileUpdateRecord, UpdateResult,
};
use async_trait::async_trait;
use std::fmt;

/// Authenticated session handle
///
/// Created once per run and shared read-only by every later call. Never closed
/// explicitly; the remote session simply expires.
#[derive(Clone)]
pub struct Session {
    pub session_id: String,
    /// Partner API endpoint of the org
    pub server_url: String,
    /// Endpoint for list/update metadata calls
    pub metadata_server_url: String,
    pub user_id: Option<String>,
    pub organization_id: Option<String>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("session_id", &"<redacted>")
            .field("server_url", &self.server_url)
            .field("metadata_server_url", &self.metadata_server_url)
            .field("user_id", &self.user_id)
            .field("organization_id", &self.organization_id)
            .finish()
    }
}

/// Remote metadata operations
///
/// Each call is a single request with one success/failure result; implementations do
/// not retry.
#[async_trait]
pub trait MetadataService: Send + Sync {
    /// Log in and return a session handle
    async fn authenticate(&self, credentials: &Credentials) -> Result<Session, ServiceError>;

    /// List metadata descriptors matching the queries
    async fn list_metadata(
        &self,
        session: &Session,
        queries: &[ListMetadataQuery],
        api_version: &str,
    ) -> Result<Vec<MetadataDescriptor>, ServiceError>;

    /// Update metadata records of one type, returning one result per record
    async fn update_metadata(
        &self,
        session: &Session,
        metadata_type: &str,
        records: &[ProfileUpdateRecord],
    ) -> Result<Vec<UpdateResult>, ServiceError>;
}
