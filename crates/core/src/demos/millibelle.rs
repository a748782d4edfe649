//! millibelle: a tool picks the branch.
//!
//! `start` asks for `sample_tool_1`, which draws a number between 1 and
//! 100 and redirects to `sample_node_1` when it is even or `sample_node_2`
//! when it is odd. Both branches lead to `end`.

use crate::graph::error::StepError;
use crate::graph::registry::Registry;
use crate::graph::step::{step_fn, StepContext, Transition};
use crate::tools::{Tool, ToolContext, ToolError, ToolOutcome};
use async_trait::async_trait;
use gk_protocol::graph_models::{GraphSpec, StepSpec};
use gk_protocol::message_models::{Message, ToolCall};
use gk_protocol::state_models::State;
use rand::Rng;
use std::collections::BTreeMap;

pub const NAME: &str = "millibelle";

/// Id of the tool call issued by `start`.
pub const TOOL_CALL_ID: &str = "123123123";

/// Registry key of a behavior or tool of this graph.
fn key(name: &str) -> String {
    format!("{NAME}.{name}")
}

pub fn spec() -> GraphSpec {
    let step = |name: &str| StepSpec::step(name).with_behavior(key(name));

    GraphSpec {
        name: NAME.to_string(),
        description: "A tool draws a number and redirects to an even or odd branch".to_string(),
        entry: "start".to_string(),
        finish: "end".to_string(),
        steps: vec![
            step("start"),
            StepSpec::dispatch("tool", vec![key(SampleTool::NAME)]),
            step("sample_node_1"),
            step("sample_node_2"),
            step("end"),
        ],
        edges: BTreeMap::from([
            ("start".to_string(), "tool".to_string()),
            ("sample_node_1".to_string(), "end".to_string()),
            ("sample_node_2".to_string(), "end".to_string()),
        ]),
    }
}

pub fn register(registry: &mut Registry) {
    registry.register_step(key("start"), step_fn(start));
    registry.register_step(key("sample_node_1"), step_fn(log_step));
    registry.register_step(key("sample_node_2"), step_fn(log_step));
    registry.register_step(key("end"), step_fn(log_step));
    registry.register_tool_as(key(SampleTool::NAME), SampleTool);
}

fn start(state: &mut State, _ctx: &StepContext) -> Result<Transition, StepError> {
    state.append(Message::system("Start!"));
    state.append(Message::ai_with_tool_calls(
        "",
        vec![ToolCall::new(SampleTool::NAME).with_id(TOOL_CALL_ID)],
    ));
    Ok(Transition::Next)
}

fn log_step(_state: &mut State, ctx: &StepContext) -> Result<Transition, StepError> {
    tracing::info!(graph = NAME, step = %ctx.step(), "Inside step");
    Ok(Transition::Next)
}

/// Draws a number and redirects by its parity.
///
/// A `number` argument on the call replaces the draw.
pub struct SampleTool;

impl SampleTool {
    pub const NAME: &'static str = "sample_tool_1";

    fn number(call: &ToolCall) -> Result<u64, ToolError> {
        match call.args.get("number") {
            None => Ok(rand::thread_rng().gen_range(1..=100)),
            Some(value) => value.as_u64().ok_or_else(|| ToolError::InvalidArguments {
                tool: Self::NAME.to_string(),
                reason: format!("number must be a non-negative integer, got {value}"),
            }),
        }
    }
}

#[async_trait]
impl Tool for SampleTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Sample tool 1"
    }

    async fn call(
        &self,
        _state: &State,
        call: &ToolCall,
        _ctx: &ToolContext,
    ) -> Result<ToolOutcome, ToolError> {
        let number = Self::number(call)?;
        tracing::info!(number, "Generated number");

        let target = if number % 2 == 0 {
            "sample_node_1"
        } else {
            "sample_node_2"
        };
        Ok(ToolOutcome::goto_with(
            target,
            format!("Generated random number: {number}"),
        ))
    }
}
