//! Invoke protocol between a driver and the executor.
//!
//! A driver sends an [`Input`] for a session and receives a [`RunResult`].
//! While a run progresses the executor may also publish [`Event`]s on a
//! channel so that a UI or log sink can follow along.

use serde::{Deserialize, Serialize};

use crate::checkpoint_models::Suspension;
use crate::message_models::Message;
use crate::state_models::State;

/// Input to a single invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Input {
    /// Messages merged into the state before a fresh or continuing run.
    Messages(Vec<Message>),

    /// The value delivered to the pending suspension point.
    Resume(String),
}

impl Input {
    /// A run input that adds no messages.
    pub fn empty() -> Self {
        Input::Messages(Vec::new())
    }

    pub fn resume(value: impl Into<String>) -> Self {
        Input::Resume(value.into())
    }
}

impl From<Vec<Message>> for Input {
    fn from(messages: Vec<Message>) -> Self {
        Input::Messages(messages)
    }
}

/// Outcome of a single invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum RunResult {
    /// The exit step ran. Carries the final state.
    Completed(State),

    /// A step suspended. Carries the pending suspension and its prompt.
    Paused(Suspension),
}

impl RunResult {
    pub fn is_completed(&self) -> bool {
        matches!(self, RunResult::Completed(_))
    }

    pub fn is_paused(&self) -> bool {
        matches!(self, RunResult::Paused(_))
    }

    /// The prompt of the pending suspension, if the run paused.
    pub fn prompt(&self) -> Option<&str> {
        match self {
            RunResult::Paused(suspension) => Some(suspension.prompt.as_str()),
            RunResult::Completed(_) => None,
        }
    }

    /// The final state, if the run completed.
    pub fn state(&self) -> Option<&State> {
        match self {
            RunResult::Completed(state) => Some(state),
            RunResult::Paused(_) => None,
        }
    }
}

/// Lifecycle events published by the executor.
///
/// Uses tagged enum serialization:
/// ```json
/// {
///   "type": "runSuspended",
///   "payload": {
///     "session_id": "0",
///     "step": "human",
///     "occurrence": 1,
///     "prompt": "Hello Oblobbles!"
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Event {
    /// A fresh or continuing run began.
    RunStarted { session_id: String, graph: String },

    /// A pending suspension received its resume value.
    RunResumed {
        session_id: String,
        step: String,
        occurrence: u32,
    },

    /// A step began executing.
    StepStarted { session_id: String, step: String },

    /// A step finished and its state was checkpointed.
    StepCompleted {
        session_id: String,
        step: String,
        messages: usize,
    },

    /// A dispatch step overrode the static edge.
    Redirected {
        session_id: String,
        from: String,
        to: String,
    },

    /// A step suspended and the run paused.
    RunSuspended {
        session_id: String,
        step: String,
        occurrence: u32,
        prompt: String,
    },

    /// The exit step ran.
    RunCompleted { session_id: String, messages: usize },

    /// The invocation failed. The checkpoint holds the last good state.
    RunFailed { session_id: String, error: String },
}
