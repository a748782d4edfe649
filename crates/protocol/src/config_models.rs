//! Global configuration models for `.graph-kit/config.toml`.

use serde::Deserialize;
use serde::Serialize;

/// Represents global settings from `.graph-kit/config.toml`.
///
/// # Example
///
/// ```toml
/// # .graph-kit/config.toml
/// max-steps = 50
/// event-buffer = 256
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct GlobalConfig {
    /// Upper bound on step executions within a single invocation.
    ///
    /// Guards against cycles formed by redirects or edges.
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,

    /// Capacity of the lifecycle event channel created by drivers.
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

fn default_max_steps() -> usize {
    25
}

fn default_event_buffer() -> usize {
    100
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            max_steps: default_max_steps(),
            event_buffer: default_event_buffer(),
        }
    }
}
