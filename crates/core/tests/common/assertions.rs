//! Custom assertion helpers for integration tests.

use gk_protocol::ipc::Event;
use gk_protocol::message_models::Role;
use gk_protocol::state_models::State;

/// Whether any event started the given step.
#[allow(dead_code)]
pub fn has_step_started(events: &[Event], step: &str) -> bool {
    events
        .iter()
        .any(|e| matches!(e, Event::StepStarted { step: s, .. } if s == step))
}

/// Whether any event reports a redirect to `to`.
#[allow(dead_code)]
pub fn has_redirect_to(events: &[Event], to: &str) -> bool {
    events
        .iter()
        .any(|e| matches!(e, Event::Redirected { to: t, .. } if t == to))
}

/// Names of the steps started, in order.
#[allow(dead_code)]
pub fn started_steps(events: &[Event]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::StepStarted { step, .. } => Some(step.clone()),
            _ => None,
        })
        .collect()
}

/// Assert that every event in `events` belongs to `session_id`.
#[allow(dead_code)]
pub fn assert_single_session(events: &[Event], session_id: &str) {
    for event in events {
        let id = match event {
            Event::RunStarted { session_id, .. }
            | Event::RunResumed { session_id, .. }
            | Event::StepStarted { session_id, .. }
            | Event::StepCompleted { session_id, .. }
            | Event::Redirected { session_id, .. }
            | Event::RunSuspended { session_id, .. }
            | Event::RunCompleted { session_id, .. }
            | Event::RunFailed { session_id, .. } => session_id,
        };
        assert_eq!(id, session_id, "Unexpected session in event {event:?}");
    }
}

/// Assert the roles of a state's messages in order.
#[allow(dead_code)]
pub fn assert_roles(state: &State, expected: &[Role]) {
    let roles: Vec<Role> = state.messages().iter().map(|m| m.role).collect();
    assert_eq!(roles, expected);
}
