//! # gk-protocol
//!
//! Shared data models for graph-kit.
//!
//! This crate defines the structures that cross the boundary between a
//! driver and the resumable graph executor:
//! - Chat-style messages and tool-call requests
//! - The run state passed from step to step
//! - Checkpoints and suspension records kept per session
//! - Declarative graph definitions loaded from YAML
//! - Invoke input/result types and lifecycle events
//!
//! ## Modules
//!
//! - [`message_models`]: Message records and tool calls
//! - [`state_models`]: The append-only run state
//! - [`checkpoint_models`]: Checkpoints, suspensions and run status
//! - [`graph_models`]: Graph definitions for `.graph-kit/graphs/*.yaml`
//! - [`config_models`]: Global settings from `.graph-kit/config.toml`
//! - [`ipc`]: Invoke input, run results and lifecycle events
//!
//! ## Design Principles
//!
//! - Minimal dependencies: only serde, uuid and chrono
//! - Independent compilation: no dependencies on other graph-kit crates

pub mod checkpoint_models;
pub mod config_models;
pub mod graph_models;
pub mod ipc;
pub mod message_models;
pub mod state_models;

// Re-export all public types for convenience
pub use checkpoint_models::*;
pub use config_models::*;
pub use graph_models::*;
pub use ipc::*;
pub use message_models::*;
pub use state_models::*;
