//! Graph definition: steps, edges and the suspension protocol.
//!
//! This module provides:
//! - The [`Step`] trait and the [`Transition`]/[`Interrupt`] signals
//! - [`GraphBuilder`] for validated graphs
//! - [`Registry`] for building graphs from YAML definitions

pub mod builder;
pub mod error;
pub mod registry;
pub mod step;

pub use builder::{Graph, GraphBuilder, StepDefinition};
pub use error::{GraphError, GraphResult, StepError};
pub use registry::Registry;
pub use step::{step_fn, Entry, FnStep, Interrupt, Resume, Step, StepContext, Transition};
