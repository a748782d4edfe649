//! Run lifecycle transitions.
//!
//! This module provides functions that move a session's [`Checkpoint`]
//! between run states and publish the matching lifecycle events. They only
//! mutate the in-memory checkpoint; persisting it is the caller's job.

use crate::graph::step::Interrupt;
use crate::state::events::EventSink;
use chrono::Utc;
use gk_protocol::checkpoint_models::{Checkpoint, RunStatus, Suspension};
use gk_protocol::ipc::Event;
use gk_protocol::state_models::State;

/// Transition to Running at `step` and emit RunStarted.
///
/// Used when no suspension is pending. A session whose previous run
/// completed starts again from the entry step with its state retained.
///
/// # Arguments
///
/// * `checkpoint` - The session's checkpoint
/// * `graph` - Name of the graph being run
/// * `step` - The step execution starts at
/// * `events` - Sink for lifecycle events
pub async fn start_run(checkpoint: &mut Checkpoint, graph: &str, step: &str, events: &EventSink) {
    checkpoint.status = RunStatus::Running;
    checkpoint.next_step = Some(step.to_string());
    checkpoint.updated_at = Utc::now();

    tracing::info!(session = %checkpoint.session_id, graph = %graph, step = %step, "Run started");
    events
        .emit(Event::RunStarted {
            session_id: checkpoint.session_id.clone(),
            graph: graph.to_string(),
        })
        .await;
}

/// Clear the pending suspension, transition to Running and emit RunResumed.
///
/// # Returns
///
/// The suspension that was pending, or `None` if there was nothing to
/// resume (the checkpoint is then left untouched).
pub async fn resume_run(checkpoint: &mut Checkpoint, events: &EventSink) -> Option<Suspension> {
    let suspension = checkpoint.suspension.take()?;
    checkpoint.status = RunStatus::Running;
    checkpoint.next_step = Some(suspension.step.clone());
    checkpoint.updated_at = Utc::now();

    tracing::info!(
        session = %checkpoint.session_id,
        step = %suspension.step,
        occurrence = suspension.occurrence,
        "Run resumed"
    );
    events
        .emit(Event::RunResumed {
            session_id: checkpoint.session_id.clone(),
            step: suspension.step.clone(),
            occurrence: suspension.occurrence,
        })
        .await;

    Some(suspension)
}

/// Record a successfully finished step and emit StepCompleted.
///
/// # Arguments
///
/// * `checkpoint` - The session's checkpoint
/// * `step` - The step that finished
/// * `state` - The state as the step left it
/// * `next` - The step to run next, `None` after the finish step
/// * `events` - Sink for lifecycle events
pub async fn record_step(
    checkpoint: &mut Checkpoint,
    step: &str,
    state: State,
    next: Option<String>,
    events: &EventSink,
) {
    checkpoint.state = state;
    checkpoint.next_step = next;
    checkpoint.steps_executed += 1;
    checkpoint.updated_at = Utc::now();

    tracing::debug!(
        session = %checkpoint.session_id,
        step = %step,
        messages = checkpoint.state.len(),
        "Step completed"
    );
    events
        .emit(Event::StepCompleted {
            session_id: checkpoint.session_id.clone(),
            step: step.to_string(),
            messages: checkpoint.state.len(),
        })
        .await;
}

/// Capture a suspension and emit RunSuspended.
///
/// The state is stored exactly as the step left it at the suspension
/// point, and the step stays the next one to run.
///
/// # Returns
///
/// The recorded suspension.
pub async fn suspend_run(
    checkpoint: &mut Checkpoint,
    step: &str,
    occurrence: u32,
    interrupt: Interrupt,
    state: State,
    events: &EventSink,
) -> Suspension {
    let suspension = Suspension {
        step: step.to_string(),
        occurrence,
        prompt: interrupt.prompt,
        continuation: interrupt.continuation,
        suspended_at: Utc::now(),
    };

    checkpoint.state = state;
    checkpoint.suspension = Some(suspension.clone());
    checkpoint.next_step = Some(step.to_string());
    checkpoint.status = RunStatus::Suspended;
    checkpoint.steps_executed += 1;
    checkpoint.updated_at = suspension.suspended_at;

    tracing::info!(
        session = %checkpoint.session_id,
        step = %step,
        occurrence = occurrence,
        prompt = %suspension.prompt,
        "Run suspended"
    );
    events
        .emit(Event::RunSuspended {
            session_id: checkpoint.session_id.clone(),
            step: step.to_string(),
            occurrence,
            prompt: suspension.prompt.clone(),
        })
        .await;

    suspension
}

/// Mark the run as completed and emit RunCompleted.
pub async fn complete_run(checkpoint: &mut Checkpoint, events: &EventSink) {
    checkpoint.status = RunStatus::Completed;
    checkpoint.next_step = None;
    checkpoint.suspension = None;
    checkpoint.updated_at = Utc::now();

    tracing::info!(
        session = %checkpoint.session_id,
        messages = checkpoint.state.len(),
        steps = checkpoint.steps_executed,
        "Run completed"
    );
    events
        .emit(Event::RunCompleted {
            session_id: checkpoint.session_id.clone(),
            messages: checkpoint.state.len(),
        })
        .await;
}

/// Report a failed invocation.
///
/// The stored checkpoint is not touched, so it still reflects the last
/// completed step or captured suspension.
pub async fn fail_run(session_id: &str, error: &str, events: &EventSink) {
    tracing::warn!(session = %session_id, error = %error, "Run failed");
    events
        .emit(Event::RunFailed {
            session_id: session_id.to_string(),
            error: error.to_string(),
        })
        .await;
}
