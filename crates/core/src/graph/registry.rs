//! Binds declarative graph definitions to registered behaviors.

use crate::graph::builder::{Graph, GraphBuilder};
use crate::graph::error::{GraphError, GraphResult};
use crate::graph::step::Step;
use crate::tools::Tool;
use gk_protocol::graph_models::{GraphSpec, StepKind};
use std::collections::HashMap;
use std::sync::Arc;

/// Named step behaviors and tools available to graph definitions.
///
/// A [`GraphSpec`] only carries names. The registry resolves each plain
/// step to the behavior registered under its `behavior` name (the step
/// name by default) and each dispatch step to the tools it lists.
#[derive(Default, Clone)]
pub struct Registry {
    steps: HashMap<String, Arc<dyn Step>>,
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a step behavior under `name`, replacing any previous one.
    pub fn register_step(&mut self, name: impl Into<String>, step: impl Step + 'static) {
        self.steps.insert(name.into(), Arc::new(step));
    }

    /// Register a tool under its own name, replacing any previous one.
    pub fn register_tool(&mut self, tool: impl Tool + 'static) {
        let tool: Arc<dyn Tool> = Arc::new(tool);
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Register a tool under `key` instead of its own name.
    ///
    /// Dispatch steps list registry keys, while AI messages call tools by
    /// their own name, so two tools answering to the same call name can
    /// live in one registry.
    pub fn register_tool_as(&mut self, key: impl Into<String>, tool: impl Tool + 'static) {
        self.tools.insert(key.into(), Arc::new(tool));
    }

    pub fn has_step(&self, name: &str) -> bool {
        self.steps.contains_key(name)
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Build a validated [`Graph`] from a definition.
    ///
    /// # Arguments
    ///
    /// * `spec` - The graph definition, usually loaded from `.graph-kit/graphs/`
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownBehavior`] or [`GraphError::UnknownTool`]
    /// if a name is not registered, and any structural error reported by
    /// [`GraphBuilder::build`].
    pub fn build(&self, spec: &GraphSpec) -> GraphResult<Graph> {
        let mut builder = GraphBuilder::new(&spec.name);

        for step in &spec.steps {
            builder = match step.kind {
                StepKind::Step => {
                    let name = step.behavior_name();
                    let behavior = self
                        .steps
                        .get(name)
                        .ok_or_else(|| GraphError::UnknownBehavior(name.to_string()))?;
                    builder.step_arc(&step.name, Arc::clone(behavior))
                }
                StepKind::Dispatch => {
                    let tools = step
                        .tools
                        .iter()
                        .map(|tool| {
                            self.tools.get(tool).cloned().ok_or_else(|| {
                                GraphError::UnknownTool {
                                    step: step.name.clone(),
                                    tool: tool.clone(),
                                }
                            })
                        })
                        .collect::<GraphResult<Vec<_>>>()?;
                    builder.dispatch(&step.name, tools)
                }
            };
        }

        for (from, to) in &spec.edges {
            builder = builder.edge(from, to);
        }

        builder.entry(&spec.entry).finish(&spec.finish).build()
    }
}
