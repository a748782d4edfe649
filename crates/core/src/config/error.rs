//! Errors raised while reading `.graph-kit/`.
//!
//! Every variant names the file or directory at fault so the CLI can point
//! straight at it.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// `config.toml` or a graph file exists but cannot be read.
    #[error("Cannot read {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// `config.toml` is not valid TOML or has unknown value types.
    #[error("Malformed settings in {path}: {source}")]
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A graph file does not deserialize into a graph definition.
    #[error("Malformed graph definition in {path}: {source}")]
    YamlParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// Two graph files declare the same graph name.
    #[error("Graph '{name}' in {path} is already defined")]
    DuplicateGraph { path: PathBuf, name: String },

    /// The `graphs/` directory could not be listed.
    #[error("Cannot scan graph directory {path}: {source}")]
    DirectoryWalk {
        path: PathBuf,
        source: walkdir::Error,
    },

    /// A setting is out of range, e.g. a zero step limit.
    #[error("Invalid setting in {path}: {reason}")]
    InvalidConfig { path: PathBuf, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
