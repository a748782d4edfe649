//! Configuration models that aggregate all settings.
//!
//! This module provides the unified `AppConfig` structure that combines
//! global settings and graph definitions into a single configuration object.

use gk_protocol::config_models::GlobalConfig;
use gk_protocol::graph_models::GraphSpec;

/// Unified application configuration loaded from `.graph-kit/` directory.
///
/// This structure aggregates all configuration sources:
/// - `config.toml`: Global settings
/// - `graphs/*.yaml`: Graph definitions
///
/// # Example
///
/// ```rust,no_run
/// use gk_core::config::loader::load_config;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new(".")).await?;
/// println!("Loaded {} graphs (max {} steps per run)",
///          config.graphs.len(),
///          config.global.max_steps);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Global settings from `config.toml`.
    pub global: GlobalConfig,

    /// All graph definitions loaded from `graphs/*.yaml`, sorted by name.
    pub graphs: Vec<GraphSpec>,
}

impl AppConfig {
    /// Find a graph definition by name.
    pub fn graph(&self, name: &str) -> Option<&GraphSpec> {
        self.graphs.iter().find(|graph| graph.name == name)
    }
}
