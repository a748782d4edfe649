//! Error types for graph construction and step execution.

use crate::tools::ToolError;
use thiserror::Error;

/// Configuration errors: a graph that references something that does not
/// exist or cannot be executed as written.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// Two steps share a name.
    #[error("Step '{0}' is defined more than once")]
    DuplicateStep(String),

    /// A step has more than one static successor.
    #[error("Step '{0}' has more than one outgoing edge")]
    DuplicateEdge(String),

    /// An edge, entry, exit or redirect names a step that is not defined.
    #[error("Unknown step '{0}'")]
    UnknownStep(String),

    /// No entry step was designated.
    #[error("Graph '{0}' has no entry step")]
    MissingEntry(String),

    /// No exit step was designated.
    #[error("Graph '{0}' has no finish step")]
    MissingFinish(String),

    /// The exit step must not have an outgoing edge.
    #[error("Finish step '{0}' must not have an outgoing edge")]
    FinishHasEdge(String),

    /// A step completed without a redirect and has no static edge.
    #[error("Step '{0}' finished without a redirect and has no outgoing edge")]
    DeadEnd(String),

    /// A plain step has no behavior registered under its name.
    #[error("No behavior registered for step '{0}'")]
    UnknownBehavior(String),

    /// A dispatch step bundles a tool that is not registered.
    #[error("Dispatch step '{step}' references unregistered tool '{tool}'")]
    UnknownTool { step: String, tool: String },

    /// A single invocation executed more steps than allowed.
    #[error("Step limit of {0} reached without finishing the run")]
    StepLimitExceeded(usize),
}

/// Errors raised by a step body.
#[derive(Error, Debug)]
pub enum StepError {
    /// The step was re-entered at an occurrence it does not define.
    #[error("Step '{step}' has no suspension point with occurrence {occurrence}")]
    UnexpectedResume { step: String, occurrence: u32 },

    /// A resume needed the continuation captured at suspension, but none
    /// was stored.
    #[error("Step '{0}' was resumed without its continuation")]
    MissingContinuation(String),

    /// A dispatch step found no AI message with tool calls.
    #[error("No tool calls found in the latest AI message")]
    NoToolCalls,

    /// A tool failed during dispatch.
    #[error(transparent)]
    Tool(#[from] ToolError),

    /// A continuation payload could not be encoded or decoded.
    #[error("Invalid continuation: {0}")]
    Continuation(#[from] serde_json::Error),

    /// Any other failure inside a step body.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Type alias for Result with GraphError.
pub type GraphResult<T> = Result<T, GraphError>;
