//! Integration tests for suspend/resume through GraphEngine.
//!
//! These tests drive the oblobbles graph, whose tools and human step
//! suspend, and verify that:
//! - Resume values land at the exact suspension point they answer
//! - State captured before a suspension survives it
//! - Usage errors leave the checkpoint untouched
//! - Failing steps leave no partial state behind

mod common;

use common::*;
use gk_core::checkpoint::MemoryCheckpointStore;
use gk_core::demos::oblobbles;
use gk_core::engine::{GraphEngine, InvokeError};
use gk_core::graph::{step_fn, GraphBuilder, StepContext, StepError, Transition};
use gk_protocol::checkpoint_models::RunStatus;
use gk_protocol::ipc::{Event, Input, RunResult};
use gk_protocol::message_models::{Message, Role};
use gk_protocol::state_models::State;
use std::sync::Arc;

#[tokio::test]
async fn test_oblobbles_full_conversation() {
    let (engine, mut rx) = demo_engine_with_events(oblobbles::NAME);

    let result = engine.invoke(Input::empty(), "0").await.unwrap();
    assert_eq!(result.prompt(), Some("Hello from sample_tool_1"));

    let result = engine.invoke(Input::resume("first tool"), "0").await.unwrap();
    assert_eq!(result.prompt(), Some("Hello from sample_tool_2"));

    let result = engine.invoke(Input::resume("second tool"), "0").await.unwrap();
    assert_eq!(result.prompt(), Some(oblobbles::FIRST_HUMAN_PROMPT));

    let result = engine.invoke(Input::resume("hi"), "0").await.unwrap();
    assert_eq!(result.prompt(), Some(oblobbles::SECOND_HUMAN_PROMPT));

    let result = engine.invoke(Input::resume("bye"), "0").await.unwrap();
    let state = result.state().expect("run should complete").clone();

    assert_eq!(
        contents(&state),
        vec!["Start!", "", "first tool", "second tool", "hi", "bye", "End!"]
    );
    assert_roles(
        &state,
        &[
            Role::System,
            Role::Ai,
            Role::Tool,
            Role::Tool,
            Role::Human,
            Role::Human,
            Role::System,
        ],
    );
    assert_eq!(
        state.tool_result_for(oblobbles::TOOL_CALL_IDS[0]).unwrap().content,
        "first tool"
    );
    assert_eq!(
        state.tool_result_for(oblobbles::TOOL_CALL_IDS[1]).unwrap().content,
        "second tool"
    );

    let events = drain(&mut rx);
    assert_single_session(&events, "0");
    assert_eq!(
        started_steps(&events),
        vec!["start", "tool", "tool", "tool", "human", "human", "human", "end"]
    );
    assert!(matches!(events.last(), Some(Event::RunCompleted { messages: 7, .. })));
}

#[tokio::test]
async fn test_two_suspension_step_persists_between_points() {
    let engine = demo_engine(oblobbles::NAME);

    engine.invoke(Input::empty(), "s").await.unwrap();
    engine.invoke(Input::resume("t1"), "s").await.unwrap();
    let paused = engine.invoke(Input::resume("t2"), "s").await.unwrap();

    let suspension = match paused {
        RunResult::Paused(suspension) => suspension,
        other => panic!("expected pause, got {other:?}"),
    };
    assert_eq!(suspension.step, "human");
    assert_eq!(suspension.occurrence, 1);

    let paused = engine.invoke(Input::resume("V1"), "s").await.unwrap();
    assert_eq!(paused.prompt(), Some(oblobbles::SECOND_HUMAN_PROMPT));

    // Exactly one message derived from V1 is checkpointed at the second point
    let (state, pending) = engine.get_state("s").await.unwrap();
    let pending = pending.expect("second suspension pending");
    assert_eq!(pending.occurrence, 2);
    assert_eq!(
        state.messages().iter().filter(|m| m.content == "V1").count(),
        1
    );
    assert_eq!(state.messages().last().unwrap().role, Role::Human);

    let completed = engine.invoke(Input::resume("V2"), "s").await.unwrap();
    let human: Vec<_> = completed
        .state()
        .unwrap()
        .messages()
        .iter()
        .filter(|m| m.role == Role::Human)
        .map(|m| m.content.as_str())
        .collect();
    assert_eq!(human, vec!["V1", "V2"]);
}

#[tokio::test]
async fn test_get_state_is_idempotent() {
    let engine = demo_engine(oblobbles::NAME);
    engine.invoke(Input::empty(), "s").await.unwrap();

    let first = engine.get_state("s").await.unwrap();
    let second = engine.get_state("s").await.unwrap();
    assert_eq!(first, second);

    let checkpoint = engine.checkpoint("s").await.unwrap().unwrap();
    assert_eq!(checkpoint.status, RunStatus::Suspended);
    assert_eq!(first.0, checkpoint.state);
}

#[tokio::test]
async fn test_resume_without_pending_suspension() {
    let engine = GraphEngine::new(linear_graph(), Arc::new(MemoryCheckpointStore::new()));

    // Unknown session
    let err = engine.invoke(Input::resume("x"), "nobody").await.unwrap_err();
    assert!(matches!(err, InvokeError::NothingToResume(ref s) if s == "nobody"));
    assert!(err.is_usage_error());
    assert!(engine.checkpoint("nobody").await.unwrap().is_none());

    // Completed session
    engine.invoke(Input::empty(), "done").await.unwrap();
    let before = engine.checkpoint("done").await.unwrap();
    let err = engine.invoke(Input::resume("x"), "done").await.unwrap_err();
    assert!(err.is_usage_error());
    assert_eq!(engine.checkpoint("done").await.unwrap(), before);
}

#[tokio::test]
async fn test_messages_while_suspended_rejected() {
    let engine = demo_engine(oblobbles::NAME);
    engine.invoke(Input::empty(), "s").await.unwrap();
    let before = engine.checkpoint("s").await.unwrap();

    let err = engine
        .invoke(vec![Message::human("not an answer")], "s")
        .await
        .unwrap_err();

    assert!(matches!(err, InvokeError::AwaitingResume { ref step, .. } if step == "tool"));
    assert_eq!(engine.checkpoint("s").await.unwrap(), before);
}

#[tokio::test]
async fn test_run_without_suspensions_is_deterministic() {
    let engine = GraphEngine::new(linear_graph(), Arc::new(MemoryCheckpointStore::new()));

    let result = engine.invoke(vec![Message::human("go")], "s").await.unwrap();
    assert_eq!(contents(result.state().unwrap()), vec!["go", "A", "B", "C"]);
}

#[tokio::test]
async fn test_completed_session_restarts_at_entry() {
    let engine = GraphEngine::new(linear_graph(), Arc::new(MemoryCheckpointStore::new()));

    engine.invoke(vec![Message::human("one")], "s").await.unwrap();
    let result = engine.invoke(vec![Message::human("two")], "s").await.unwrap();

    assert_eq!(
        contents(result.state().unwrap()),
        vec!["one", "A", "B", "C", "two", "A", "B", "C"]
    );
}

#[tokio::test]
async fn test_failing_step_discards_its_messages() {
    let graph = GraphBuilder::new("flaky")
        .step("a", system_step("A"))
        .step(
            "b",
            step_fn(|state: &mut State, _: &StepContext| {
                state.append(Message::system("partial"));
                Err(StepError::Other(anyhow::anyhow!("boom")))
            }),
        )
        .step("c", system_step("C"))
        .edge("a", "b")
        .edge("b", "c")
        .entry("a")
        .finish("c")
        .build()
        .unwrap();
    let (tx, mut rx) = tokio::sync::mpsc::channel(64);
    let engine = GraphEngine::new(graph, Arc::new(MemoryCheckpointStore::new())).with_events(tx);

    let err = engine.invoke(Input::empty(), "s").await.unwrap_err();
    assert_eq!(err.step(), Some("b"));
    assert!(!err.is_tool_error());

    let checkpoint = engine.checkpoint("s").await.unwrap().unwrap();
    assert_eq!(contents(&checkpoint.state), vec!["A"]);
    assert_eq!(checkpoint.next_step.as_deref(), Some("b"));

    let events = drain(&mut rx);
    assert!(matches!(events.last(), Some(Event::RunFailed { .. })));
}

#[tokio::test]
async fn test_single_suspension_step_resumes() {
    let graph = GraphBuilder::new("once")
        .step(
            "ask",
            step_fn(|state: &mut State, ctx: &StepContext| match ctx.resume() {
                None => Ok(Transition::suspend("question")),
                Some(resume) => {
                    state.append(Message::human(resume.value.as_str()));
                    Ok(Transition::Next)
                }
            }),
        )
        .step("end", system_step("End!"))
        .edge("ask", "end")
        .entry("ask")
        .finish("end")
        .build()
        .unwrap();
    let engine = GraphEngine::new(graph, Arc::new(MemoryCheckpointStore::new()));

    let paused = engine.invoke(Input::empty(), "s").await.unwrap();
    assert!(paused.is_paused());

    let completed = engine.invoke(Input::resume("answer"), "s").await.unwrap();
    assert_eq!(contents(completed.state().unwrap()), vec!["answer", "End!"]);
}
