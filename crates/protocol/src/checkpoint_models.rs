//! Checkpoint and suspension models.
//!
//! A checkpoint is the persisted record of a session: the last saved
//! state, the step that runs next and, while the run waits for outside
//! input, the suspension describing what it waits for.

use crate::state_models::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Lifecycle status of a session's run.
///
/// The status progresses through these states during normal execution:
/// NotStarted -> Running -> Completed
///
/// A run that hits a suspension point moves to Suspended and back to
/// Running once the resume value is delivered.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    /// No invocation has been made for this session.
    NotStarted,

    /// Steps are executing, or the last invocation stopped between steps.
    Running,

    /// Paused at a suspension point, waiting for a resume value.
    Suspended,

    /// The exit step has run.
    Completed,
}

/// A captured pause point awaiting external input.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Suspension {
    /// Name of the paused step.
    pub step: String,

    /// 1-based ordinal of this suspension point within the step body.
    ///
    /// The first suspension on a fresh entry is occurrence 1; a step that
    /// suspends again after resuming occurrence `k` produces `k + 1`.
    pub occurrence: u32,

    /// Human-readable description of the awaited input.
    pub prompt: String,

    /// Opaque data the step body captured for its own re-entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continuation: Option<Value>,

    /// When the suspension was captured.
    pub suspended_at: DateTime<Utc>,
}

/// Persisted record of a session.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Checkpoint {
    /// Session this checkpoint belongs to.
    pub session_id: String,

    /// State as of the last completed step or captured suspension.
    pub state: State,

    /// Pending suspension. At most one exists per session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suspension: Option<Suspension>,

    /// Step the next invocation continues from.
    ///
    /// `None` when the session never ran or its last run completed, in
    /// which case the next run starts at the entry step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_step: Option<String>,

    pub status: RunStatus,

    /// Number of step executions recorded over the session's lifetime.
    pub steps_executed: u64,

    pub updated_at: DateTime<Utc>,
}

impl Checkpoint {
    /// Create the empty checkpoint of a session that has never run.
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            state: State::new(),
            suspension: None,
            next_step: None,
            status: RunStatus::NotStarted,
            steps_executed: 0,
            updated_at: Utc::now(),
        }
    }

    pub fn is_suspended(&self) -> bool {
        self.suspension.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_checkpoint_is_fresh() {
        let checkpoint = Checkpoint::new("0");
        assert_eq!(checkpoint.session_id, "0");
        assert_eq!(checkpoint.status, RunStatus::NotStarted);
        assert!(checkpoint.state.is_empty());
        assert!(checkpoint.next_step.is_none());
        assert!(!checkpoint.is_suspended());
    }

    #[test]
    fn test_run_status_serialization() {
        let json = serde_json::to_value(RunStatus::NotStarted).unwrap();
        assert_eq!(json, "NOT_STARTED");
    }
}
