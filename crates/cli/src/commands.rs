//! Subcommand implementations.

use crate::render;
use color_eyre::eyre::{bail, eyre, WrapErr};
use color_eyre::Result;
use gk_core::checkpoint::MemoryCheckpointStore;
use gk_core::config::{load_config, AppConfig};
use gk_core::demos;
use gk_core::engine::GraphEngine;
use gk_protocol::graph_models::GraphSpec;
use gk_protocol::ipc::{Event, Input, RunResult};
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

/// Find a graph by name. Configured graphs shadow built-in ones.
fn resolve<'a>(config: &'a AppConfig, builtins: &'a [GraphSpec], name: &str) -> Option<&'a GraphSpec> {
    config
        .graph(name)
        .or_else(|| builtins.iter().find(|spec| spec.name == name))
}

/// Run `graph` for `session`, answering each suspension from stdin.
pub async fn run(root: &Path, graph: &str, session: &str, print_events: bool) -> Result<()> {
    let config = load_config(root)
        .await
        .wrap_err_with(|| format!("Failed to load configuration from {}", root.display()))?;
    let builtins = demos::graph_specs();

    let spec = resolve(&config, &builtins, graph).ok_or_else(|| {
        eyre!("Unknown graph '{graph}'. Run `graph-kit graphs` to list available graphs.")
    })?;
    let graph = demos::registry()
        .build(spec)
        .wrap_err_with(|| format!("Graph '{}' is invalid", spec.name))?;

    let mut engine = GraphEngine::new(graph, Arc::new(MemoryCheckpointStore::new()))
        .with_config(config.global.clone());

    let printer = if print_events {
        let (tx, rx) = mpsc::channel(config.global.event_buffer);
        engine = engine.with_events(tx);
        Some(tokio::spawn(print_events_from(rx)))
    } else {
        None
    };

    tracing::info!(graph = %engine.graph().name(), session, "Starting run");

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut result = engine.invoke(Input::empty(), session).await?;

    while let RunResult::Paused(suspension) = &result {
        render::prompt(&suspension.prompt);
        let answer = match stdin.next_line().await? {
            Some(line) => line,
            None => bail!(
                "Input closed while step '{}' awaits an answer to: {}",
                suspension.step,
                suspension.prompt
            ),
        };
        result = engine.invoke(Input::resume(answer.trim()), session).await?;
    }

    if let Some(state) = result.state() {
        render::conversation(state);
    }

    drop(engine);
    if let Some(printer) = printer {
        printer.await?;
    }
    Ok(())
}

async fn print_events_from(mut rx: mpsc::Receiver<Event>) {
    while let Some(event) = rx.recv().await {
        if let Ok(line) = serde_json::to_string(&event) {
            eprintln!("{line}");
        }
    }
}

/// Print every available graph with its description.
pub async fn list_graphs(root: &Path) -> Result<()> {
    let config = load_config(root)
        .await
        .wrap_err_with(|| format!("Failed to load configuration from {}", root.display()))?;

    render::heading("Built-in graphs");
    for spec in demos::graph_specs() {
        render::graph_line(&spec, config.graph(&spec.name).is_some());
    }

    if !config.graphs.is_empty() {
        render::heading("Configured graphs");
        for spec in &config.graphs {
            render::graph_line(spec, false);
        }
    }
    Ok(())
}
