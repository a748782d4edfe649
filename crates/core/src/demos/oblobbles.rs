//! oblobbles: suspensions inside tools and inside a step.
//!
//! `start` asks for `sample_tool_1` and `sample_tool_2`. Each tool suspends
//! once and records the value it is resumed with. `human` then suspends
//! twice, recording a Human message after each answer, and `end` closes
//! the conversation.

use crate::graph::error::StepError;
use crate::graph::registry::Registry;
use crate::graph::step::{step_fn, Entry, StepContext, Transition};
use crate::tools::{Tool, ToolContext, ToolError, ToolOutcome};
use async_trait::async_trait;
use gk_protocol::graph_models::{GraphSpec, StepSpec};
use gk_protocol::message_models::{Message, ToolCall};
use gk_protocol::state_models::State;
use std::collections::BTreeMap;

pub const NAME: &str = "oblobbles";

/// Ids of the tool calls issued by `start`, in call order.
pub const TOOL_CALL_IDS: [&str; 2] = ["123123123", "0984305968049586"];

pub const FIRST_HUMAN_PROMPT: &str = "Hello Oblobbles!";
pub const SECOND_HUMAN_PROMPT: &str = "Hello again Human!";

fn key(name: &str) -> String {
    format!("{NAME}.{name}")
}

pub fn spec() -> GraphSpec {
    let step = |name: &str| StepSpec::step(name).with_behavior(key(name));

    GraphSpec {
        name: NAME.to_string(),
        description: "Two suspending tools followed by a two-question human step".to_string(),
        entry: "start".to_string(),
        finish: "end".to_string(),
        steps: vec![
            step("start"),
            StepSpec::dispatch(
                "tool",
                vec![key(&SampleTool::name_for(1)), key(&SampleTool::name_for(2))],
            ),
            step("human"),
            step("end"),
        ],
        edges: BTreeMap::from([
            ("start".to_string(), "tool".to_string()),
            ("tool".to_string(), "human".to_string()),
            ("human".to_string(), "end".to_string()),
        ]),
    }
}

pub fn register(registry: &mut Registry) {
    registry.register_step(key("start"), step_fn(start));
    registry.register_step(key("human"), step_fn(human));
    registry.register_step(key("end"), step_fn(end));
    for index in 1..=2 {
        let tool = SampleTool::new(index);
        registry.register_tool_as(key(tool.name()), tool);
    }
}

fn start(state: &mut State, _ctx: &StepContext) -> Result<Transition, StepError> {
    state.append(Message::system("Start!"));
    state.append(Message::ai_with_tool_calls(
        "",
        vec![
            ToolCall::new(SampleTool::name_for(1)).with_id(TOOL_CALL_IDS[0]),
            ToolCall::new(SampleTool::name_for(2)).with_id(TOOL_CALL_IDS[1]),
        ],
    ));
    Ok(Transition::Next)
}

fn human(state: &mut State, ctx: &StepContext) -> Result<Transition, StepError> {
    match ctx.entry() {
        Entry::Fresh => Ok(Transition::suspend(FIRST_HUMAN_PROMPT)),
        Entry::Resumed(resume) if resume.occurrence == 1 => {
            state.append(Message::human(resume.value.as_str()));
            Ok(Transition::suspend(SECOND_HUMAN_PROMPT))
        }
        Entry::Resumed(resume) if resume.occurrence == 2 => {
            state.append(Message::human(resume.value.as_str()));
            Ok(Transition::Next)
        }
        Entry::Resumed(_) => Err(ctx.unexpected_resume()),
    }
}

fn end(state: &mut State, _ctx: &StepContext) -> Result<Transition, StepError> {
    state.append(Message::system("End!"));
    Ok(Transition::Next)
}

/// Suspends once and returns the resume value as its result.
pub struct SampleTool {
    name: String,
    prompt: String,
}

impl SampleTool {
    pub fn new(index: u8) -> Self {
        let name = Self::name_for(index);
        Self {
            prompt: format!("Hello from {name}"),
            name,
        }
    }

    pub fn name_for(index: u8) -> String {
        format!("sample_tool_{index}")
    }
}

#[async_trait]
impl Tool for SampleTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Asks a question and returns the answer"
    }

    async fn call(
        &self,
        _state: &State,
        _call: &ToolCall,
        ctx: &ToolContext,
    ) -> Result<ToolOutcome, ToolError> {
        match &ctx.entry {
            Entry::Fresh => Ok(ToolOutcome::suspend(self.prompt.as_str())),
            Entry::Resumed(resume) if resume.occurrence == 1 => {
                Ok(ToolOutcome::value(resume.value.as_str()))
            }
            Entry::Resumed(resume) => Err(ToolError::Execution {
                tool: self.name.clone(),
                reason: format!("no suspension point with occurrence {}", resume.occurrence),
            }),
        }
    }
}
