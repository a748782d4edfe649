//! Run state management.
//!
//! This module provides:
//! - Lifecycle transitions on a session's checkpoint
//! - The optional event sink those transitions publish to

pub mod events;
pub mod run;

pub use events::EventSink;
