//! Batch result aggregation
//!
//! Each batch's outcome is kept separately so a failing batch never hides the records
//! that other batches already changed on the remote side.

use crate::error::{SyncError, SyncResult};
use crate::models::UpdateResult;
use tracing::{error, info, warn};

/// Outcome of one batch update call
#[derive(Debug)]
pub enum BatchOutcome {
    Succeeded {
        batch_index: usize,
        results: Vec<UpdateResult>,
    },
    Failed {
        batch_index: usize,
        /// Profiles submitted in the failed call
        profiles: Vec<String>,
        error: SyncError,
    },
}

impl BatchOutcome {
    pub fn batch_index(&self) -> usize {
        match self {
            BatchOutcome::Succeeded { batch_index, .. } | BatchOutcome::Failed { batch_index, .. } => {
                *batch_index
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, BatchOutcome::Succeeded { .. })
    }
}

/// A batch whose update call failed as a whole
#[derive(Debug)]
pub struct BatchFailure {
    pub batch_index: usize,
    pub profiles: Vec<String>,
    pub error: SyncError,
}

/// Flattened results of a sync run
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Per-record results of succeeded batches, in batch-submission order
    pub results: Vec<UpdateResult>,
    /// Batches whose update call failed, in batch-submission order
    pub failed_batches: Vec<BatchFailure>,
    pub total_batches: usize,
}

impl SyncReport {
    /// Combine batch outcomes; outcomes are ordered by batch index first
    pub fn aggregate(mut outcomes: Vec<BatchOutcome>) -> Self {
        outcomes.sort_by_key(BatchOutcome::batch_index);

        let mut report = SyncReport {
            total_batches: outcomes.len(),
            ..Default::default()
        };

        for outcome in outcomes {
            match outcome {
                BatchOutcome::Succeeded { results, .. } => report.results.extend(results),
                BatchOutcome::Failed {
                    batch_index,
                    profiles,
                    error,
                } => report.failed_batches.push(BatchFailure {
                    batch_index,
                    profiles,
                    error,
                }),
            }
        }

        report
    }

    /// True when every batch call succeeded (individual records may still have failed)
    pub fn is_complete(&self) -> bool {
        self.failed_batches.is_empty()
    }

    pub fn succeeded_records(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    /// Records rejected individually by the remote
    pub fn rejected_records(&self) -> usize {
        self.results.iter().filter(|r| !r.success).count()
    }

    /// Records never applied because their batch call failed
    pub fn unsubmitted_records(&self) -> usize {
        self.failed_batches.iter().map(|f| f.profiles.len()).sum()
    }

    /// Log every record outcome, every failed batch and a summary line
    pub fn log(&self) {
        for result in &self.results {
            if result.success {
                info!(success = true, full_name = %result.full_name, "Profile updated");
            } else {
                let messages: Vec<String> = result
                    .errors
                    .iter()
                    .map(|e| match &e.status_code {
                        Some(code) => format!("{}: {}", code, e.message),
                        None => e.message.clone(),
                    })
                    .collect();
                warn!(
                    success = false,
                    full_name = %result.full_name,
                    errors = %messages.join("; "),
                    "Profile update rejected"
                );
            }
        }

        for failure in &self.failed_batches {
            error!(
                batch = failure.batch_index + 1,
                profiles = %failure.profiles.join(", "),
                error = %failure.error,
                "Update batch failed"
            );
        }

        info!(
            batches = self.total_batches,
            failed_batches = self.failed_batches.len(),
            updated = self.succeeded_records(),
            rejected = self.rejected_records(),
            not_applied = self.unsubmitted_records(),
            "Profile update summary"
        );
    }

    /// Flattened results, or an aggregation failure carrying the first failed batch's error
    pub fn into_result(self) -> SyncResult<Vec<UpdateResult>> {
        let failed_batches = self.failed_batches.len();
        match self.failed_batches.into_iter().next() {
            None => Ok(self.results),
            Some(first) => Err(SyncError::Aggregation {
                failed_batches,
                total_batches: self.total_batches,
                source: Box::new(first.error),
            }),
        }
    }
}
