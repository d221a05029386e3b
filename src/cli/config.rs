//! TOML configuration file support.
//!
//! Defaults for command-line flags can be kept in a config file:
//!
//! ```toml
//! # flowgate.toml
//! [load]
//! max_events = 100000
//!
//! [save]
//! indent = 2
//! byte_order = "msbf"
//! ```
//!
//! Flags given on the command line take precedence.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use super::ByteOrderArg;

/// Root configuration structure for flowgate.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Settings used when loading files.
    #[serde(default)]
    pub load: LoadConfig,

    /// Settings used when saving files.
    #[serde(default)]
    pub save: SaveConfig,
}

/// Configuration for loading.
#[derive(Debug, Default, Deserialize)]
pub struct LoadConfig {
    /// Maximum number of events to load from an event file.
    pub max_events: Option<usize>,
}

/// Configuration for saving.
#[derive(Debug, Default, Deserialize)]
pub struct SaveConfig {
    /// Spaces per indentation level in parameter maps.
    pub indent: Option<usize>,

    /// Byte order of saved event files.
    pub byte_order: Option<ByteOrderArg>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}
