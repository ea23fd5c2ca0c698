//! Pass configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Options that change how declarations are checked
///
/// Loaded from a TOML file or built directly. Every field has a default, so
/// an empty file is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ElabConfig {
    /// Treat a scalar port with a vectored net declaration as an error
    /// instead of a warning
    pub strict_port_ranges: bool,

    /// Accept SystemVerilog relaxations, e.g. functions without ports
    pub system_verilog: bool,

    /// Width of `integer` function return values
    pub integer_width: u32,
}

impl Default for ElabConfig {
    fn default() -> Self {
        Self {
            strict_port_ranges: false,
            system_verilog: false,
            integer_width: 32,
        }
    }
}

impl ElabConfig {
    /// Parses a configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML or names an unknown
    /// option.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse elaboration config")
    }

    /// Loads a configuration file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}
