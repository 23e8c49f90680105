//! Sync run state machine
//!
//! A run progresses IDLE → CONNECTING → LISTING → TRANSFORMING → BATCHING → UPDATING
//! and ends in AGGREGATED or FAILED. Any non-terminal state may jump to FAILED.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sync run state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SyncState {
    /// Run created, nothing started
    Idle,
    /// Login call in flight
    Connecting,
    /// Listing existing profiles
    Listing,
    /// Building desired profile state
    Transforming,
    /// Splitting records into update batches
    Batching,
    /// Batch update calls in flight
    Updating,
    /// Every batch completed
    Aggregated,
    /// A stage failed
    Failed,
}

impl SyncState {
    /// State that follows this one on the success path
    pub fn next(self) -> Option<SyncState> {
        match self {
            SyncState::Idle => Some(SyncState::Connecting),
            SyncState::Connecting => Some(SyncState::Listing),
            SyncState::Listing => Some(SyncState::Transforming),
            SyncState::Transforming => Some(SyncState::Batching),
            SyncState::Batching => Some(SyncState::Updating),
            SyncState::Updating => Some(SyncState::Aggregated),
            SyncState::Aggregated | SyncState::Failed => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, SyncState::Aggregated | SyncState::Failed)
    }

    pub fn can_transition_to(self, new_state: SyncState) -> bool {
        if self.is_terminal() {
            return false;
        }
        new_state == SyncState::Failed || self.next() == Some(new_state)
    }
}

/// State transition event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateTransition {
    pub run_id: Uuid,
    pub old_state: SyncState,
    pub new_state: SyncState,
    pub transitioned_at: DateTime<Utc>,
}

/// One sync run (in-memory state)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncSession {
    /// Unique run identifier
    pub run_id: Uuid,

    /// Current state
    pub state: SyncState,

    /// Every transition taken so far
    pub transitions: Vec<StateTransition>,

    pub started_at: DateTime<Utc>,

    /// Set once a terminal state is reached
    pub ended_at: Option<DateTime<Utc>>,
}

impl SyncSession {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            state: SyncState::Idle,
            transitions: Vec::new(),
            started_at: Utc::now(),
            ended_at: None,
        }
    }

    /// Transition to new state
    pub fn transition_to(&mut self, new_state: SyncState) -> StateTransition {
        debug_assert!(
            self.state.can_transition_to(new_state),
            "invalid transition {:?} -> {:?}",
            self.state,
            new_state
        );

        let transition = StateTransition {
            run_id: self.run_id,
            old_state: self.state,
            new_state,
            transitioned_at: Utc::now(),
        };
        self.state = new_state;

        if new_state.is_terminal() {
            self.ended_at = Some(transition.transitioned_at);
        }

        tracing::debug!(
            run_id = %self.run_id,
            from = ?transition.old_state,
            to = ?transition.new_state,
            "Sync state transition"
        );

        self.transitions.push(transition.clone());
        transition
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Milliseconds from start to end (or to now while running)
    pub fn elapsed_ms(&self) -> i64 {
        let end = self.ended_at.unwrap_or_else(Utc::now);
        (end - self.started_at).num_milliseconds()
    }
}

impl Default for SyncSession {
    fn default() -> Self {
        Self::new()
    }
}
