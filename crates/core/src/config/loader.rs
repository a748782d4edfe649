//! Configuration file loader for `.graph-kit/` directory structure.
//!
//! This module provides functionality to load and parse all configuration files
//! from the `.graph-kit/` directory, including:
//! - `config.toml`: Global settings
//! - `graphs/*.yaml`: Graph definitions

use crate::config::error::ConfigError;
use crate::config::error::ConfigResult;
use crate::config::models::AppConfig;
use gk_protocol::config_models::GlobalConfig;
use gk_protocol::graph_models::GraphSpec;
use std::collections::HashSet;
use std::path::Path;
use walkdir::WalkDir;

/// Name of the configuration directory under a project root.
pub const CONFIG_DIR: &str = ".graph-kit";

/// Loads all configuration from the `.graph-kit/` directory.
///
/// # Arguments
///
/// * `root` - Root directory containing the `.graph-kit/` folder
///
/// # Returns
///
/// An `AppConfig` containing all loaded configuration. If directories or files
/// are missing, returns a default configuration rather than an error.
///
/// # Errors
///
/// Returns `ConfigError` if:
/// - Files exist but cannot be read
/// - Files have invalid syntax (TOML or YAML)
/// - `max-steps` is zero
/// - Two graph files use the same graph name
pub async fn load_config(root: &Path) -> ConfigResult<AppConfig> {
    let gk_dir = root.join(CONFIG_DIR);

    if !gk_dir.exists() {
        tracing::debug!(path = %gk_dir.display(), "No configuration directory, using defaults");
        return Ok(AppConfig::default());
    }

    let global = load_global_config(&gk_dir)?;
    let graphs = load_graphs(&gk_dir)?;

    tracing::debug!(graphs = graphs.len(), max_steps = global.max_steps, "Configuration loaded");
    Ok(AppConfig { global, graphs })
}

/// Loads global configuration from `config.toml`.
fn load_global_config(gk_dir: &Path) -> ConfigResult<GlobalConfig> {
    let config_path = gk_dir.join("config.toml");

    if !config_path.exists() {
        return Ok(GlobalConfig::default());
    }

    let content =
        std::fs::read_to_string(&config_path).map_err(|source| ConfigError::FileRead {
            path: config_path.clone(),
            source,
        })?;

    let config: GlobalConfig =
        toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
            path: config_path.clone(),
            source,
        })?;

    if config.max_steps == 0 {
        return Err(ConfigError::InvalidConfig {
            path: config_path,
            reason: "max-steps must be at least 1".to_string(),
        });
    }

    if config.event_buffer == 0 {
        return Err(ConfigError::InvalidConfig {
            path: config_path,
            reason: "event-buffer must be at least 1".to_string(),
        });
    }

    Ok(config)
}

/// Loads all graph definitions from `graphs/*.yaml` and `graphs/*.yml`.
fn load_graphs(gk_dir: &Path) -> ConfigResult<Vec<GraphSpec>> {
    let graphs_dir = gk_dir.join("graphs");

    if !graphs_dir.exists() {
        return Ok(Vec::new());
    }

    let mut graphs = Vec::new();
    let mut names = HashSet::new();

    for entry in WalkDir::new(&graphs_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| ConfigError::DirectoryWalk {
            path: graphs_dir.clone(),
            source,
        })?;

        let path = entry.path();

        let ext = path.extension().and_then(|s| s.to_str());
        if ext != Some("yaml") && ext != Some("yml") {
            continue;
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        let graph: GraphSpec =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::YamlParse {
                path: path.to_path_buf(),
                source,
            })?;

        if !names.insert(graph.name.clone()) {
            return Err(ConfigError::DuplicateGraph {
                path: path.to_path_buf(),
                name: graph.name,
            });
        }

        graphs.push(graph);
    }

    graphs.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(graphs)
}
