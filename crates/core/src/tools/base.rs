//! Base Tool trait and supporting types.

use crate::graph::step::{Entry, Interrupt, Resume};
use async_trait::async_trait;
use gk_protocol::message_models::ToolCall;
use gk_protocol::state_models::State;
use thiserror::Error;

/// Context passed to a tool for a single call.
#[derive(Debug, Clone)]
pub struct ToolContext {
    /// The session the dispatch runs in.
    pub session_id: String,

    /// Id of the call being executed.
    pub call_id: String,

    /// Where the tool body starts: fresh, or at one of its own suspension
    /// points. Occurrences are counted per call, not per dispatch step.
    pub entry: Entry,
}

impl ToolContext {
    pub fn new(session_id: impl Into<String>, call_id: impl Into<String>, entry: Entry) -> Self {
        Self {
            session_id: session_id.into(),
            call_id: call_id.into(),
            entry,
        }
    }

    /// The resume value, if the call was re-entered at a suspension point.
    pub fn resume(&self) -> Option<&Resume> {
        match &self.entry {
            Entry::Fresh => None,
            Entry::Resumed(resume) => Some(resume),
        }
    }
}

/// A control directive overriding the dispatch step's static edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    /// Step to continue at.
    pub goto: String,

    /// Optional Tool-role message recorded alongside the redirect.
    pub content: Option<String>,
}

/// What a tool call produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    /// A plain result, recorded as a Tool-role message.
    Value(String),

    /// A redirect to another step.
    Directive(Directive),

    /// Pause the dispatch step until a resume value arrives.
    Suspend(Interrupt),
}

impl ToolOutcome {
    pub fn value(content: impl Into<String>) -> Self {
        ToolOutcome::Value(content.into())
    }

    /// Redirect without recording a message.
    pub fn goto(step: impl Into<String>) -> Self {
        ToolOutcome::Directive(Directive {
            goto: step.into(),
            content: None,
        })
    }

    /// Redirect and record `content` as the call's result.
    pub fn goto_with(step: impl Into<String>, content: impl Into<String>) -> Self {
        ToolOutcome::Directive(Directive {
            goto: step.into(),
            content: Some(content.into()),
        })
    }

    pub fn suspend(prompt: impl Into<String>) -> Self {
        ToolOutcome::Suspend(Interrupt::new(prompt))
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),
    #[error("Invalid arguments for tool '{tool}': {reason}")]
    InvalidArguments { tool: String, reason: String },
    #[error("Tool '{tool}' failed: {reason}")]
    Execution { tool: String, reason: String },
}

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;

    /// Execute one call.
    ///
    /// `state` is read-only; results reach the state through the returned
    /// [`ToolOutcome`].
    async fn call(
        &self,
        state: &State,
        call: &ToolCall,
        ctx: &ToolContext,
    ) -> Result<ToolOutcome, ToolError>;
}

/// A tool backed by a synchronous closure.
pub struct FnTool<F> {
    name: String,
    description: String,
    f: F,
}

/// Wrap a closure as a [`Tool`].
pub fn tool_fn<F>(name: impl Into<String>, description: impl Into<String>, f: F) -> FnTool<F>
where
    F: Fn(&State, &ToolCall, &ToolContext) -> Result<ToolOutcome, ToolError> + Send + Sync,
{
    FnTool {
        name: name.into(),
        description: description.into(),
        f,
    }
}

#[async_trait]
impl<F> Tool for FnTool<F>
where
    F: Fn(&State, &ToolCall, &ToolContext) -> Result<ToolOutcome, ToolError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    async fn call(
        &self,
        state: &State,
        call: &ToolCall,
        ctx: &ToolContext,
    ) -> Result<ToolOutcome, ToolError> {
        (self.f)(state, call, ctx)
    }
}
