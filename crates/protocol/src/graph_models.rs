//! Graph definition models for `.graph-kit/graphs/*.yaml`.
//!
//! A graph definition names the steps of a run graph, the static edge
//! table between them and the designated entry and exit steps. It carries
//! no behavior: the core binds each step name to a registered behavior
//! when the graph is built.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The kind of a step.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    /// A plain step running a single registered behavior.
    #[default]
    Step,

    /// A tool-dispatch step running the tool calls of the latest AI
    /// message. Its tools may redirect control flow.
    Dispatch,
}

/// Declaration of a single step.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StepSpec {
    /// Unique step name within the graph.
    pub name: String,

    #[serde(default)]
    pub kind: StepKind,

    /// Registered behavior bound to a plain step. Defaults to `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub behavior: Option<String>,

    /// Tools bundled with a dispatch step. Ignored for plain steps.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<String>,
}

impl StepSpec {
    pub fn step(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: StepKind::Step,
            behavior: None,
            tools: Vec::new(),
        }
    }

    /// Bind the step to a behavior registered under a different name.
    pub fn with_behavior(mut self, behavior: impl Into<String>) -> Self {
        self.behavior = Some(behavior.into());
        self
    }

    /// Name of the behavior to look up for a plain step.
    pub fn behavior_name(&self) -> &str {
        self.behavior.as_deref().unwrap_or(&self.name)
    }

    pub fn dispatch(name: impl Into<String>, tools: Vec<String>) -> Self {
        Self {
            name: name.into(),
            kind: StepKind::Dispatch,
            behavior: None,
            tools,
        }
    }
}

/// Defines a full run graph.
///
/// # Example
///
/// ```yaml
/// name: oblobbles
/// description: "Two suspending tools followed by a human step"
/// entry: start
/// finish: end
/// steps:
///   - name: start
///     behavior: oblobbles.start
///   - name: tool
///     kind: dispatch
///     tools: [sample_tool_1, sample_tool_2]
///   - name: human
///   - name: end
/// edges:
///   start: tool
///   tool: human
///   human: end
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GraphSpec {
    /// Unique name identifying this graph.
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// The step every fresh run starts at.
    pub entry: String,

    /// The exit step. A run completes once it has executed.
    pub finish: String,

    pub steps: Vec<StepSpec>,

    /// Static edge table: step name -> next step name.
    ///
    /// A step without an entry here must leave through a redirect.
    #[serde(default)]
    pub edges: BTreeMap<String, String>,
}
