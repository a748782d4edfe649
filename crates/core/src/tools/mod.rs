//! Tools and the dispatch step that runs them.

pub mod base;
pub mod dispatch;

pub use base::{tool_fn, Directive, FnTool, Tool, ToolContext, ToolError, ToolOutcome};
pub use dispatch::DispatchStep;
