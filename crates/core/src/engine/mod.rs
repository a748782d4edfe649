//! Resumable graph executor.
//!
//! The GraphEngine resolves the current step of a session from its
//! checkpoint, runs steps one at a time, follows static edges or redirects
//! and persists the state after every step and at every suspension.

pub mod error;

pub use error::{InvokeError, InvokeResult};

use crate::checkpoint::CheckpointStore;
use crate::graph::builder::Graph;
use crate::graph::error::GraphError;
use crate::graph::step::{Entry, Resume, StepContext, Transition};
use crate::state::events::EventSink;
use crate::state::run::{complete_run, fail_run, record_step, resume_run, start_run, suspend_run};
use gk_protocol::checkpoint_models::{Checkpoint, Suspension};
use gk_protocol::config_models::GlobalConfig;
use gk_protocol::ipc::{Event, Input, RunResult};
use gk_protocol::state_models::State;
use std::sync::Arc;

/// Executes one graph for any number of sessions.
///
/// Steps within a session never run concurrently: each invocation holds
/// the store's lease on the session for its whole load, run and save
/// cycle, so engines sharing one store are serialized too. Different
/// sessions proceed independently.
pub struct GraphEngine {
    graph: Arc<Graph>,
    store: Arc<dyn CheckpointStore>,
    config: GlobalConfig,
    events: EventSink,
}

impl GraphEngine {
    /// Create a new GraphEngine.
    ///
    /// # Arguments
    ///
    /// * `graph` - The validated graph to execute
    /// * `store` - Where checkpoints are loaded from and saved to
    pub fn new(graph: Graph, store: Arc<dyn CheckpointStore>) -> Self {
        Self {
            graph: Arc::new(graph),
            store,
            config: GlobalConfig::default(),
            events: EventSink::disabled(),
        }
    }

    pub fn with_config(mut self, config: GlobalConfig) -> Self {
        self.config = config;
        self
    }

    /// Publish lifecycle events to `events`.
    pub fn with_events(mut self, events: impl Into<EventSink>) -> Self {
        self.events = events.into();
        self
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn store(&self) -> &Arc<dyn CheckpointStore> {
        &self.store
    }

    /// Run a session until it completes or suspends.
    ///
    /// If the session has a pending suspension, `input` must be
    /// [`Input::Resume`]; the value is delivered to the exact suspension
    /// point inside the paused step. Otherwise `input` must be
    /// [`Input::Messages`]; the messages extend the state and execution
    /// continues at the checkpoint's next step, or at the entry step for a
    /// fresh or completed session.
    ///
    /// # Arguments
    ///
    /// * `input` - Seed messages or a resume value
    /// * `session_id` - Key of the session's checkpoint
    ///
    /// # Returns
    ///
    /// [`RunResult::Completed`] with the final state once the finish step
    /// has run, or [`RunResult::Paused`] with the new suspension.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A resume value is sent with nothing to resume, or messages are
    ///   sent while a suspension is pending (the checkpoint is untouched)
    /// - The graph names an unknown step, dead-ends or exceeds the step limit
    /// - A step or tool fails (its appended messages are discarded)
    /// - The checkpoint store fails
    #[tracing::instrument(skip_all, fields(session = %session_id, graph = %self.graph.name()))]
    pub async fn invoke(&self, input: impl Into<Input>, session_id: &str) -> InvokeResult<RunResult> {
        let input = input.into();
        let _lease = self.store.lease(session_id).await?;

        let result = self.execute(input, session_id).await;
        if let Err(e) = &result {
            if !e.is_usage_error() {
                fail_run(session_id, &e.to_string(), &self.events).await;
            }
        }
        result
    }

    /// Read-only view of a session: its state and pending suspension.
    ///
    /// Unknown sessions yield an empty state and no suspension.
    pub async fn get_state(&self, session_id: &str) -> InvokeResult<(State, Option<Suspension>)> {
        Ok(self
            .store
            .get(session_id)
            .await?
            .map(|checkpoint| (checkpoint.state, checkpoint.suspension))
            .unwrap_or_default())
    }

    /// The stored checkpoint of a session, if any.
    pub async fn checkpoint(&self, session_id: &str) -> InvokeResult<Option<Checkpoint>> {
        Ok(self.store.get(session_id).await?)
    }

    async fn execute(&self, input: Input, session_id: &str) -> InvokeResult<RunResult> {
        let mut checkpoint = self.store.load(session_id).await?;

        let (mut step, mut entry) = match input {
            Input::Resume(value) => {
                let suspension = resume_run(&mut checkpoint, &self.events)
                    .await
                    .ok_or_else(|| InvokeError::NothingToResume(session_id.to_string()))?;
                let entry = Entry::Resumed(Resume {
                    occurrence: suspension.occurrence,
                    value,
                    continuation: suspension.continuation,
                });
                (suspension.step, entry)
            }
            Input::Messages(messages) => {
                if let Some(suspension) = &checkpoint.suspension {
                    return Err(InvokeError::AwaitingResume {
                        session_id: session_id.to_string(),
                        step: suspension.step.clone(),
                    });
                }
                checkpoint.state.extend(messages);
                let step = checkpoint
                    .next_step
                    .clone()
                    .unwrap_or_else(|| self.graph.entry().to_string());
                start_run(&mut checkpoint, self.graph.name(), &step, &self.events).await;
                (step, Entry::Fresh)
            }
        };

        let mut executed = 0;
        loop {
            if executed >= self.config.max_steps {
                return Err(GraphError::StepLimitExceeded(self.config.max_steps).into());
            }
            executed += 1;

            let definition = self.graph.require(&step)?;
            tracing::debug!(step = %step, kind = ?definition.kind, "Step started");
            self.events
                .emit(Event::StepStarted {
                    session_id: session_id.to_string(),
                    step: step.clone(),
                })
                .await;

            // Bodies work on a copy so a failing step leaves no trace
            let mut state = checkpoint.state.snapshot();
            let ctx = StepContext::new(session_id, &step, std::mem::replace(&mut entry, Entry::Fresh));
            let transition = definition
                .behavior
                .run(&mut state, &ctx)
                .await
                .map_err(|source| InvokeError::Step {
                    step: step.clone(),
                    source,
                })?;

            let next = match transition {
                Transition::Suspend(interrupt) => {
                    let occurrence = ctx.entry().next_occurrence();
                    let suspension =
                        suspend_run(&mut checkpoint, &step, occurrence, interrupt, state, &self.events)
                            .await;
                    self.store.save(session_id, checkpoint).await?;
                    return Ok(RunResult::Paused(suspension));
                }
                _ if self.graph.is_finish(&step) => {
                    record_step(&mut checkpoint, &step, state, None, &self.events).await;
                    complete_run(&mut checkpoint, &self.events).await;
                    let final_state = checkpoint.state.snapshot();
                    self.store.save(session_id, checkpoint).await?;
                    return Ok(RunResult::Completed(final_state));
                }
                Transition::Goto(target) => {
                    self.graph.require(&target)?;
                    tracing::info!(from = %step, to = %target, "Redirected");
                    self.events
                        .emit(Event::Redirected {
                            session_id: session_id.to_string(),
                            from: step.clone(),
                            to: target.clone(),
                        })
                        .await;
                    target
                }
                Transition::Next => self
                    .graph
                    .next_after(&step)
                    .map(str::to_string)
                    .ok_or_else(|| GraphError::DeadEnd(step.clone()))?,
            };

            record_step(&mut checkpoint, &step, state, Some(next.clone()), &self.events).await;
            self.store.save(session_id, checkpoint.clone()).await?;
            step = next;
        }
    }
}
