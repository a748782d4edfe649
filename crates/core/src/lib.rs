//! # gk-core
//!
//! Resumable graph executor for graph-kit.
//!
//! This crate provides:
//! - Graph definition with static edges and a step registry
//! - Suspend/resume of steps at explicit suspension points
//! - Tool dispatch with dynamic redirects
//! - Per-session checkpoint storage
//! - Configuration loading from `.graph-kit/` directory
//!
//! ## Modules
//!
//! - [`graph`]: Steps, edges, validation and the registry
//! - [`tools`]: Tool trait and the dispatch step
//! - [`checkpoint`]: Checkpoint store trait and in-memory implementation
//! - [`engine`]: The executor driving sessions through a graph
//! - [`state`]: Run lifecycle transitions and lifecycle events
//! - [`config`]: Configuration loading and management
//! - [`demos`]: Built-in demo graphs

pub mod checkpoint;
pub mod config;
pub mod demos;
pub mod engine;
pub mod graph;
pub mod state;
pub mod tools;
