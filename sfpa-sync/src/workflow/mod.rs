//! Sync workflow: stage orchestration and result aggregation

pub mod aggregator;
pub mod pipeline;

pub use aggregator::{BatchFailure, BatchOutcome, SyncReport};
pub use pipeline::{PipelineSettings, SyncPipeline, UPDATE_BATCH_SIZE};
