//! sfpa-sync library interface
//!
//! Grants Apex class access and object permissions to every org profile that is not
//! excluded, by listing profiles over the Metadata API and pushing updates back in
//! batches of at most [`UPDATE_BATCH_SIZE`].

pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod utils;
pub mod workflow;

pub use crate::error::{ServiceError, SyncError, SyncResult};
pub use crate::services::{MetadataService, ProfileTransformer, Session, SoapMetadataClient};
pub use crate::workflow::{PipelineSettings, SyncPipeline, SyncReport, UPDATE_BATCH_SIZE};
