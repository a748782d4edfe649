//! Graph assembly and validation.
//!
//! A [`Graph`] is the immutable result of binding step names to behaviors
//! and wiring them with a static edge table. All structural checks run in
//! [`GraphBuilder::build`], so an executor never sees a graph whose edges,
//! entry or finish point at nothing.

use crate::graph::error::{GraphError, GraphResult};
use crate::graph::step::Step;
use crate::tools::{DispatchStep, Tool};
use gk_protocol::graph_models::StepKind;
use std::collections::HashMap;
use std::sync::Arc;

/// A named step and the behavior bound to it.
#[derive(Clone)]
pub struct StepDefinition {
    pub name: String,
    pub kind: StepKind,
    pub behavior: Arc<dyn Step>,
}

impl std::fmt::Debug for StepDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepDefinition")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// A validated, executable graph.
#[derive(Debug, Clone)]
pub struct Graph {
    name: String,
    steps: HashMap<String, StepDefinition>,
    edges: HashMap<String, String>,
    entry: String,
    finish: String,
}

impl Graph {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entry(&self) -> &str {
        &self.entry
    }

    pub fn finish(&self) -> &str {
        &self.finish
    }

    /// Look up a step by name.
    pub fn step(&self, name: &str) -> Option<&StepDefinition> {
        self.steps.get(name)
    }

    /// Look up a step by name, failing with [`GraphError::UnknownStep`].
    pub fn require(&self, name: &str) -> GraphResult<&StepDefinition> {
        self.step(name)
            .ok_or_else(|| GraphError::UnknownStep(name.to_string()))
    }

    /// The static successor of `name`, if one is declared.
    pub fn next_after(&self, name: &str) -> Option<&str> {
        self.edges.get(name).map(String::as_str)
    }

    pub fn is_finish(&self, name: &str) -> bool {
        self.finish == name
    }

    /// Step names in no particular order.
    pub fn step_names(&self) -> impl Iterator<Item = &str> {
        self.steps.keys().map(String::as_str)
    }
}

/// Incrementally describes a graph. Nothing is checked until [`build`].
///
/// # Example
///
/// ```ignore
/// let graph = GraphBuilder::new("demo")
///     .step("start", step_fn(|state, _| { state.append(Message::system("Start!")); Ok(Transition::Next) }))
///     .step("end", step_fn(|_, _| Ok(Transition::Next)))
///     .edge("start", "end")
///     .entry("start")
///     .finish("end")
///     .build()?;
/// ```
///
/// [`build`]: GraphBuilder::build
pub struct GraphBuilder {
    name: String,
    steps: Vec<StepDefinition>,
    edges: Vec<(String, String)>,
    entry: Option<String>,
    finish: Option<String>,
}

impl GraphBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
            edges: Vec::new(),
            entry: None,
            finish: None,
        }
    }

    /// Add a plain step.
    pub fn step(self, name: impl Into<String>, behavior: impl Step + 'static) -> Self {
        self.step_arc(name, Arc::new(behavior))
    }

    /// Add a plain step whose behavior is already shared.
    pub fn step_arc(mut self, name: impl Into<String>, behavior: Arc<dyn Step>) -> Self {
        self.steps.push(StepDefinition {
            name: name.into(),
            kind: StepKind::Step,
            behavior,
        });
        self
    }

    /// Add a dispatch step executing the given tools.
    pub fn dispatch(mut self, name: impl Into<String>, tools: Vec<Arc<dyn Tool>>) -> Self {
        self.steps.push(StepDefinition {
            name: name.into(),
            kind: StepKind::Dispatch,
            behavior: Arc::new(DispatchStep::new(tools)),
        });
        self
    }

    /// Declare the static successor of `from`.
    pub fn edge(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.edges.push((from.into(), to.into()));
        self
    }

    pub fn entry(mut self, name: impl Into<String>) -> Self {
        self.entry = Some(name.into());
        self
    }

    pub fn finish(mut self, name: impl Into<String>) -> Self {
        self.finish = Some(name.into());
        self
    }

    /// Validate and freeze the graph.
    ///
    /// # Errors
    ///
    /// Returns a [`GraphError`] if:
    /// - Two steps share a name or a step has two outgoing edges
    /// - An edge, the entry or the finish names an undefined step
    /// - The entry or finish is missing
    /// - The finish step has an outgoing edge
    pub fn build(self) -> GraphResult<Graph> {
        let mut steps = HashMap::with_capacity(self.steps.len());
        for definition in self.steps {
            if steps.contains_key(&definition.name) {
                return Err(GraphError::DuplicateStep(definition.name));
            }
            steps.insert(definition.name.clone(), definition);
        }

        let mut edges = HashMap::with_capacity(self.edges.len());
        for (from, to) in self.edges {
            for endpoint in [&from, &to] {
                if !steps.contains_key(endpoint) {
                    return Err(GraphError::UnknownStep(endpoint.clone()));
                }
            }
            if edges.contains_key(&from) {
                return Err(GraphError::DuplicateEdge(from));
            }
            edges.insert(from, to);
        }

        let entry = self
            .entry
            .ok_or_else(|| GraphError::MissingEntry(self.name.clone()))?;
        let finish = self
            .finish
            .ok_or_else(|| GraphError::MissingFinish(self.name.clone()))?;

        for endpoint in [&entry, &finish] {
            if !steps.contains_key(endpoint) {
                return Err(GraphError::UnknownStep(endpoint.clone()));
            }
        }
        if edges.contains_key(&finish) {
            return Err(GraphError::FinishHasEdge(finish));
        }

        Ok(Graph {
            name: self.name,
            steps,
            edges,
            entry,
            finish,
        })
    }
}
