//! Sync pipeline orchestration
//!
//! CONNECTING → LISTING → TRANSFORMING → BATCHING → UPDATING → AGGREGATED | FAILED
//!
//! # Architecture
//! - One logical task drives the stages in order; the first failure before UPDATING
//!   ends the run in FAILED.
//! - UPDATING submits batches through `futures::stream::buffered`, so at most
//!   `max_concurrent_updates` update calls are in flight and outcomes come back in
//!   batch-submission order.
//! - Batch failures are isolated: in-flight batches are never cancelled and every
//!   outcome reaches the [`SyncReport`].

use super::aggregator::{BatchOutcome, SyncReport};
use crate::error::SyncResult;
use crate::models::{
    Credentials, ListMetadataQuery, ProfileUpdateRecord, SyncSession, SyncState, UpdateResult,
};
use crate::services::{
    connect, list_metadata, update_metadata, MetadataService, ProfileTransformer, Session,
};
use crate::utils::batch;
use futures::stream::{self, StreamExt};
use sfpa_common::config::SyncSettings;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

/// Records per update call (the platform's limit for `updateMetadata`)
pub const UPDATE_BATCH_SIZE: usize = 10;

/// Pipeline tuning
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub api_version: String,
    pub metadata_type: String,
    pub max_concurrent_updates: usize,
    pub request_timeout: Duration,
}

impl From<&SyncSettings> for PipelineSettings {
    fn from(settings: &SyncSettings) -> Self {
        Self {
            api_version: settings.api_version.clone(),
            metadata_type: settings.metadata_type.clone(),
            max_concurrent_updates: settings.max_concurrent_updates,
            request_timeout: settings.request_timeout(),
        }
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self::from(&SyncSettings::default())
    }
}

/// Authenticate → list → transform → batch → update → aggregate
pub struct SyncPipeline {
    service: Arc<dyn MetadataService>,
    settings: PipelineSettings,
    transformer: ProfileTransformer,
}

impl SyncPipeline {
    pub fn new(
        service: Arc<dyn MetadataService>,
        settings: PipelineSettings,
        transformer: ProfileTransformer,
    ) -> Self {
        Self {
            service,
            settings,
            transformer,
        }
    }

    /// Execute one run, recording state transitions on `session`
    ///
    /// Stage failures before UPDATING are returned as errors. Once updates start the
    /// report is always returned; `session` ends in FAILED if any batch failed.
    pub async fn run(
        &self,
        credentials: &Credentials,
        session: &mut SyncSession,
    ) -> SyncResult<SyncReport> {
        let timeout = self.settings.request_timeout;

        session.transition_to(SyncState::Connecting);
        let remote = fail_on_error(
            session,
            connect(self.service.as_ref(), credentials, timeout).await,
        )?;

        session.transition_to(SyncState::Listing);
        let queries = [ListMetadataQuery::new(self.settings.metadata_type.clone())];
        let descriptors = fail_on_error(
            session,
            list_metadata(
                self.service.as_ref(),
                &remote,
                &queries,
                &self.settings.api_version,
                timeout,
            )
            .await,
        )?;

        session.transition_to(SyncState::Transforming);
        let records = self.transformer.transform(&descriptors);
        info!(
            run_id = %session.run_id,
            listed = descriptors.len(),
            retained = records.len(),
            excluded = descriptors.len().saturating_sub(records.len()),
            "Built desired profile state"
        );

        session.transition_to(SyncState::Batching);
        let batches = batch(records, UPDATE_BATCH_SIZE);

        session.transition_to(SyncState::Updating);
        info!(
            run_id = %session.run_id,
            batches = batches.len(),
            max_concurrent = self.settings.max_concurrent_updates,
            "Updating profiles"
        );
        let outcomes = self.update_batches(&remote, batches).await;
        let report = SyncReport::aggregate(outcomes);

        if report.is_complete() {
            session.transition_to(SyncState::Aggregated);
            info!(
                run_id = %session.run_id,
                elapsed_ms = session.elapsed_ms(),
                "All profile batches updated"
            );
        } else {
            session.transition_to(SyncState::Failed);
            error!(
                run_id = %session.run_id,
                failed_batches = report.failed_batches.len(),
                total_batches = report.total_batches,
                "Some profile batches failed"
            );
        }

        Ok(report)
    }

    /// Run, log the report, and flatten it into per-record results
    ///
    /// Stage failures are logged once by the pipeline and returned unchanged; callers
    /// only need to propagate the error.
    pub async fn execute(
        &self,
        credentials: &Credentials,
        session: &mut SyncSession,
    ) -> SyncResult<Vec<UpdateResult>> {
        let report = self.run(credentials, session).await?;
        report.log();
        report.into_result()
    }

    /// Submit every batch with bounded concurrency, one outcome per batch in order
    async fn update_batches(
        &self,
        remote: &Session,
        batches: Vec<Vec<ProfileUpdateRecord>>,
    ) -> Vec<BatchOutcome> {
        let total = batches.len();
        let service = self.service.as_ref();
        let metadata_type = self.settings.metadata_type.as_str();
        let timeout = self.settings.request_timeout;

        let outcomes: Vec<BatchOutcome> = stream::iter(batches.into_iter().enumerate())
            .map(|(batch_index, records)| async move {
                debug!(
                    batch = batch_index + 1,
                    total,
                    records = records.len(),
                    "Submitting update batch"
                );

                match update_metadata(service, remote, metadata_type, &records, timeout).await {
                    Ok(results) => {
                        info!(
                            batch = batch_index + 1,
                            total,
                            results = results.len(),
                            "Update batch completed"
                        );
                        BatchOutcome::Succeeded {
                            batch_index,
                            results,
                        }
                    }
                    Err(error) => {
                        error!(
                            batch = batch_index + 1,
                            total,
                            error = %error,
                            "Update batch failed"
                        );
                        BatchOutcome::Failed {
                            batch_index,
                            profiles: records.into_iter().map(|r| r.full_name).collect(),
                            error,
                        }
                    }
                }
            })
            .buffered(self.settings.max_concurrent_updates.max(1))
            .collect()
            .await;

        debug!(
            succeeded = outcomes.iter().filter(|o| o.is_success()).count(),
            total,
            "All update batches settled"
        );

        outcomes
    }
}

/// Move `session` to FAILED when a stage returns an error
fn fail_on_error<T>(session: &mut SyncSession, result: SyncResult<T>) -> SyncResult<T> {
    if let Err(e) = &result {
        error!(
            run_id = %session.run_id,
            stage = ?session.state,
            error = %e,
            "Sync stage failed"
        );
        session.transition_to(SyncState::Failed);
    }
    result
}

impl std::fmt::Debug for SyncPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncPipeline")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
