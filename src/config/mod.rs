//! Configuration system for richpath.
//!
//! This module provides the configuration structure for the `richpath` command
//! with sensible defaults and support for serialization/deserialization via
//! serde. Configuration is loaded from a TOML file and overridden by
//! command-line arguments.
//!
//! # Example
//!
//! ```
//! use richpath::config::{Config, OutputFormat};
//! use richpath::ypath::AttributeConflictPolicy;
//!
//! // Use default configuration
//! let config = Config::default();
//! assert_eq!(config.output_format, OutputFormat::Yson);
//! assert_eq!(config.attribute_conflict, AttributeConflictPolicy::ComputedWins);
//!
//! // Create custom configuration
//! let custom = Config {
//!     output_format: OutputFormat::Json,
//!     ..Config::default()
//! };
//! assert!(custom.pretty);
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::ypath::AttributeConflictPolicy;

/// Text format used to print rendered trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// YSON text, `<attributes>value`
    #[default]
    Yson,
    /// JSON with `$attributes`/`$value` wrappers
    Json,
    /// YAML with `$attributes`/`$value` wrappers
    Yaml,
}

/// Configuration for the richpath command.
///
/// # Fields
///
/// * `attribute_conflict` - How literal `columns`/`ranges` attributes interact with
///   the computed ones (default: "computed-wins")
/// * `output_format` - Output format for rendered trees (default: "yson")
/// * `pretty` - Pretty-print JSON output (default: true)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Policy for literal attributes named like computed ones
    #[serde(default)]
    pub attribute_conflict: AttributeConflictPolicy,

    /// Output format for rendered trees
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

fn default_pretty() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            attribute_conflict: AttributeConflictPolicy::default(),
            output_format: OutputFormat::default(),
            pretty: default_pretty(),
        }
    }
}

impl Config {
    /// Returns the path to the config file.
    ///
    /// Uses `~/.config/richpath/config.toml` on all platforms.
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|mut path| {
            path.push(".config");
            path.push("richpath");
            path.push("config.toml");
            path
        })
    }

    /// Loads configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist or can't be read.
    pub fn load() -> Self {
        let config_path = match Self::config_path() {
            Some(path) => path,
            None => return Self::default(),
        };

        if !config_path.exists() {
            return Self::default();
        }

        Self::load_from(&config_path).unwrap_or_else(|e| {
            warn!(path = %config_path.display(), error = %e, "ignoring unreadable config file");
            Self::default()
        })
    }

    /// Loads configuration from a specific file, failing on unreadable or invalid TOML.
    pub fn load_from<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Saves configuration to the default config file.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        self.save_to(config_path)
    }

    /// Saves configuration to a specific file, creating parent directories.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }
}
