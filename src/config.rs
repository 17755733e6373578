//! Session configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Rows the cursor may address before anything is written
pub const DEFAULT_LINES: usize = 48;
/// Columns the cursor may address before anything is written
pub const DEFAULT_COLS: usize = 80;

/// Whether a bare line break also returns the cursor to column 0
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineDiscipline {
    /// LF moves down only
    Raw,
    /// LF moves down and to column 0
    #[default]
    Cooked,
}

/// Options fixed when a terminal session is created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub line_discipline: LineDiscipline,
    /// Initial row bound for cursor movement
    pub lines: usize,
    /// Initial column bound for cursor movement
    pub cols: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            line_discipline: LineDiscipline::Cooked,
            lines: DEFAULT_LINES,
            cols: DEFAULT_COLS,
        }
    }
}

impl Config {
    pub fn with_line_discipline(mut self, discipline: LineDiscipline) -> Self {
        self.line_discipline = discipline;
        self
    }

    /// Set the initial screen bounds. Zero leaves a dimension unchanged.
    pub fn with_screen_size(mut self, lines: usize, cols: usize) -> Self {
        if lines > 0 {
            self.lines = lines;
        }
        if cols > 0 {
            self.cols = cols;
        }
        self
    }

    /// Parse configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
