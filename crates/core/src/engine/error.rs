//! Errors returned by [`GraphEngine::invoke`](crate::engine::GraphEngine::invoke).

use crate::checkpoint::StoreError;
use crate::graph::error::{GraphError, StepError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InvokeError {
    /// A resume value was sent but nothing is waiting for one.
    #[error("Session '{0}' has no pending suspension to resume")]
    NothingToResume(String),

    /// Messages were sent while a suspension awaits its resume value.
    #[error("Session '{session_id}' is suspended at step '{step}' and expects a resume value")]
    AwaitingResume { session_id: String, step: String },

    /// The graph cannot execute as written.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// A step body or one of its tools failed.
    #[error("Step '{step}' failed: {source}")]
    Step {
        step: String,
        #[source]
        source: StepError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl InvokeError {
    /// The caller sent the wrong kind of input for the session's state.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            InvokeError::NothingToResume(_) | InvokeError::AwaitingResume { .. }
        )
    }

    pub fn is_configuration_error(&self) -> bool {
        matches!(self, InvokeError::Graph(_))
    }

    pub fn is_tool_error(&self) -> bool {
        matches!(
            self,
            InvokeError::Step {
                source: StepError::Tool(_),
                ..
            }
        )
    }

    /// Name of the failing step, for step and tool errors.
    pub fn step(&self) -> Option<&str> {
        match self {
            InvokeError::Step { step, .. } => Some(step),
            _ => None,
        }
    }
}

/// Type alias for Result with InvokeError.
pub type InvokeResult<T> = Result<T, InvokeError>;
