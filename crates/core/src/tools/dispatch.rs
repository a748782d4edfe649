//! Dynamic-branch tool dispatch.
//!
//! A [`DispatchStep`] executes every tool call of the most recent AI
//! message in list order. Plain results become Tool-role messages. A
//! [`Directive`](crate::tools::Directive) overrides the step's static
//! edge; when several calls issue one, the last wins.
//!
//! When a tool suspends, the whole dispatch step suspends. The step stores
//! a cursor in the suspension's continuation naming the suspended call, the
//! tool-local occurrence and any redirect issued so far. On resume the
//! calls before the cursor are skipped (their results are already in the
//! state), the suspended call is re-entered at its own suspension point
//! and the remaining calls run fresh.

use crate::graph::error::StepError;
use crate::graph::step::{Entry, Interrupt, Resume, Step, StepContext, Transition};
use crate::tools::base::{Tool, ToolContext, ToolError, ToolOutcome};
use async_trait::async_trait;
use gk_protocol::message_models::{Message, ToolCall};
use gk_protocol::state_models::State;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Position of a suspended dispatch, persisted as the suspension's
/// continuation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct DispatchCursor {
    call_id: String,
    occurrence: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    continuation: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    redirect: Option<String>,
}

/// A step that executes the tool calls requested by the latest AI message.
pub struct DispatchStep {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl DispatchStep {
    pub fn new(tools: Vec<Arc<dyn Tool>>) -> Self {
        let tools = tools
            .into_iter()
            .map(|tool| (tool.name().to_string(), tool))
            .collect();
        Self { tools }
    }

    /// Names of the tools this step can execute.
    pub fn tool_names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(String::as_str)
    }

    /// Work out where to start from the step's entry.
    ///
    /// # Returns
    ///
    /// The index of the first call to execute, the entry for that call and
    /// the redirect carried over from before the suspension.
    fn position(
        &self,
        calls: &[ToolCall],
        ctx: &StepContext,
    ) -> Result<(usize, Entry, Option<String>), StepError> {
        let resume = match ctx.entry() {
            Entry::Fresh => return Ok((0, Entry::Fresh, None)),
            Entry::Resumed(resume) => resume,
        };

        let cursor: DispatchCursor = resume
            .continuation()?
            .ok_or_else(|| StepError::MissingContinuation(ctx.step().to_string()))?;

        let index = calls
            .iter()
            .position(|call| call.id == cursor.call_id)
            .ok_or_else(|| StepError::MissingContinuation(ctx.step().to_string()))?;

        let entry = Entry::Resumed(Resume {
            occurrence: cursor.occurrence,
            value: resume.value.clone(),
            continuation: cursor.continuation,
        });

        Ok((index, entry, cursor.redirect))
    }
}

#[async_trait]
impl Step for DispatchStep {
    async fn run(&self, state: &mut State, ctx: &StepContext) -> Result<Transition, StepError> {
        let calls = state
            .last_ai_message()
            .filter(|message| message.has_tool_calls())
            .map(|message| message.tool_calls.clone())
            .ok_or(StepError::NoToolCalls)?;

        let (start, first_entry, mut redirect) = self.position(&calls, ctx)?;
        let mut first_entry = Some(first_entry);

        for call in calls.iter().skip(start) {
            let tool = self
                .tools
                .get(&call.name)
                .ok_or_else(|| ToolError::NotFound(call.name.clone()))?;

            let entry = first_entry.take().unwrap_or(Entry::Fresh);
            let tool_ctx = ToolContext::new(ctx.session_id(), &call.id, entry);

            tracing::debug!(
                session = %ctx.session_id(),
                step = %ctx.step(),
                tool = %call.name,
                call_id = %call.id,
                "Executing tool call"
            );

            match tool.call(state, call, &tool_ctx).await? {
                ToolOutcome::Value(content) => {
                    state.append(Message::tool(content, &call.id));
                }
                ToolOutcome::Directive(directive) => {
                    tracing::debug!(
                        session = %ctx.session_id(),
                        tool = %call.name,
                        goto = %directive.goto,
                        "Tool issued redirect"
                    );
                    if let Some(content) = directive.content {
                        state.append(Message::tool(content, &call.id));
                    }
                    redirect = Some(directive.goto);
                }
                ToolOutcome::Suspend(interrupt) => {
                    let cursor = DispatchCursor {
                        call_id: call.id.clone(),
                        occurrence: tool_ctx.entry.next_occurrence(),
                        continuation: interrupt.continuation,
                        redirect,
                    };
                    let interrupt = Interrupt::new(interrupt.prompt).with_continuation(&cursor)?;
                    return Ok(Transition::Suspend(interrupt));
                }
            }
        }

        Ok(redirect.map_or(Transition::Next, Transition::Goto))
    }
}
