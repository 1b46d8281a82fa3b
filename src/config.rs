// src/config.rs

//! Defines the configuration structures for the `bfloat16` inspector.
//!
//! The configuration is read from a JSON file named by the `BFLOAT16_CONFIG`
//! environment variable. Every field has a default, so a partial file (or no
//! file at all) is fine.

use anyhow::Context;
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "BFLOAT16_CONFIG";

/// Process-wide configuration, loaded on first access.
pub static CONFIG: Lazy<Config> = Lazy::new(Config::load_or_default);

// --- Top-Level Configuration Structure ---

/// Represents the complete configuration for the inspector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)] // Apply default values for the entire struct if a field is missing.
pub struct Config {
    /// How reports are printed.
    pub output: OutputConfig,
    /// How command-line values are interpreted.
    pub input: InputConfig,
}

impl Config {
    /// Load the file named by `BFLOAT16_CONFIG`, falling back to defaults
    /// when the variable is unset or the file can't be used.
    pub fn load_or_default() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV_VAR) else {
            debug!("{CONFIG_ENV_VAR} not set, using default configuration");
            return Config::default();
        };
        match Config::load(Path::new(&path)) {
            Ok(config) => {
                info!("Configuration loaded from {}", Path::new(&path).display());
                config
            }
            Err(e) => {
                warn!("Ignoring configuration file: {e:#}. Using defaults.");
                Config::default()
            }
        }
    }

    /// Read and parse a JSON configuration file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Config::from_json(&text).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

// --- Output Configuration ---

/// Output encoding for inspection reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// Pretty-printed JSON, one document per value.
    Json,
}

/// Defines what a report shows and how.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Include the raw sign, exponent and significand fields.
    pub show_fields: bool,
    /// Include the adjacent representable values.
    pub show_neighbors: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            format: OutputFormat::Text,
            show_fields: true,
            show_neighbors: false,
        }
    }
}

// --- Input Configuration ---

/// Defines how command-line values are interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Treat `0x`-prefixed arguments as raw 16-bit patterns rather than
    /// numbers.
    pub hex_bit_patterns: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        InputConfig {
            hex_bit_patterns: true,
        }
    }
}
