//! Test fixtures for creating engines, graphs and sample configurations.

use gk_core::checkpoint::MemoryCheckpointStore;
use gk_core::demos;
use gk_core::engine::GraphEngine;
use gk_core::graph::{step_fn, Graph, GraphBuilder, StepContext, Transition};
use gk_protocol::ipc::Event;
use gk_protocol::message_models::Message;
use gk_protocol::state_models::State;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::mpsc;

/// Build an engine for a built-in graph backed by a fresh in-memory store.
#[allow(dead_code)]
pub fn demo_engine(name: &str) -> GraphEngine {
    let graph = demos::build(name)
        .expect("unknown demo graph")
        .expect("demo graph should build");
    GraphEngine::new(graph, Arc::new(MemoryCheckpointStore::new()))
}

/// Like [`demo_engine`], with lifecycle events delivered to the returned receiver.
#[allow(dead_code)]
pub fn demo_engine_with_events(name: &str) -> (GraphEngine, mpsc::Receiver<Event>) {
    let (tx, rx) = mpsc::channel(256);
    (demo_engine(name).with_events(tx), rx)
}

/// Collect every event currently buffered in the channel.
#[allow(dead_code)]
pub fn drain(rx: &mut mpsc::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Message contents in order.
#[allow(dead_code)]
pub fn contents(state: &State) -> Vec<String> {
    state.messages().iter().map(|m| m.content.clone()).collect()
}

/// A step appending a single System message.
#[allow(dead_code)]
pub fn system_step(text: &'static str) -> impl gk_core::graph::Step {
    step_fn(move |state: &mut State, _: &StepContext| {
        state.append(Message::system(text));
        Ok(Transition::Next)
    })
}

/// Three plain steps `a -> b -> c` appending "A", "B" and "C".
#[allow(dead_code)]
pub fn linear_graph() -> Graph {
    GraphBuilder::new("linear")
        .step("a", system_step("A"))
        .step("b", system_step("B"))
        .step("c", system_step("C"))
        .edge("a", "b")
        .edge("b", "c")
        .entry("a")
        .finish("c")
        .build()
        .expect("linear graph should build")
}

/// Create a temporary project directory with `.graph-kit` configuration.
///
/// The graph `greeter` reuses the built-in oblobbles behaviors: it greets,
/// asks the two human questions and closes.
///
/// Returns a TempDir that must be kept alive for the test duration.
#[allow(dead_code)]
pub fn create_test_project() -> std::io::Result<TempDir> {
    let temp_dir = tempfile::tempdir()?;
    let root = temp_dir.path();

    std::fs::create_dir_all(root.join(".graph-kit/graphs"))?;
    std::fs::write(root.join(".graph-kit/config.toml"), "max-steps = 12\n")?;

    let graph_yaml = r#"
name: greeter
description: "Ask twice, then say goodbye"
entry: ask
finish: bye
steps:
  - name: ask
    behavior: oblobbles.human
  - name: bye
    behavior: oblobbles.end
edges:
  ask: bye
"#;
    std::fs::write(root.join(".graph-kit/graphs/greeter.yaml"), graph_yaml)?;

    Ok(temp_dir)
}
