//! Data models for sfpa-sync
//!
//! - Credentials for the login call
//! - Metadata records exchanged with the remote service
//! - Sync run state machine

pub mod credentials;
pub mod metadata;
pub mod sync_session;

pub use credentials::Credentials;
pub use metadata::{
    ClassAccessEntry, ListMetadataQuery, MetadataDescriptor, ProfileUpdateRecord, UpdateError,
    UpdateResult,
};
pub use sync_session::{StateTransition, SyncSession, SyncState};
