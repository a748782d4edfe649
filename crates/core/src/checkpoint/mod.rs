//! Per-session checkpoint storage.

pub mod store;

pub use store::{CheckpointStore, MemoryCheckpointStore, SessionLease, StoreError, StoreResult};
