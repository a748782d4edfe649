//! Built-in demo graphs.
//!
//! - [`millibelle`]: a tool redirects to one of two branches
//! - [`oblobbles`]: tools and a step that suspend for input
//!
//! Behaviors and tools are registered under `<graph>.<name>` keys so that
//! both demos share one [`Registry`] and their steps can be reused from
//! graphs defined in `.graph-kit/graphs/`.

pub mod millibelle;
pub mod oblobbles;

use crate::graph::builder::Graph;
use crate::graph::error::GraphResult;
use crate::graph::registry::Registry;
use gk_protocol::graph_models::GraphSpec;

/// A registry holding every demo behavior and tool.
pub fn registry() -> Registry {
    let mut registry = Registry::new();
    millibelle::register(&mut registry);
    oblobbles::register(&mut registry);
    registry
}

/// Definitions of all built-in graphs.
pub fn graph_specs() -> Vec<GraphSpec> {
    vec![millibelle::spec(), oblobbles::spec()]
}

/// Definition of a built-in graph by name.
pub fn builtin(name: &str) -> Option<GraphSpec> {
    graph_specs().into_iter().find(|spec| spec.name == name)
}

/// Build a built-in graph by name.
pub fn build(name: &str) -> Option<GraphResult<Graph>> {
    builtin(name).map(|spec| registry().build(&spec))
}
