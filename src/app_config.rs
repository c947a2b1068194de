use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::writers::{OutputFormat, SubRipOptions, TtmlOptions, WebVttOptions};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Config {
    /// Target caption format
    #[serde(default)]
    pub output_format: OutputFormat,

    /// WebVTT writer options
    #[serde(default)]
    pub webvtt: WebVttOptions,

    /// SubRip writer options
    #[serde(default)]
    pub subrip: SubRipOptions,

    /// TTML writer options
    #[serde(default)]
    pub ttml: TtmlOptions,

    /// Document-level conversion settings
    #[serde(default)]
    pub conversion: ConversionConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Settings applied between parsing and writing
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ConversionConfig {
    // @field: Shift applied to every cue, may be negative
    #[serde(default)]
    pub delay_ms: i64,

    // @field: Write one output per declared language
    #[serde(default)]
    pub split_languages: bool,

    // @field: Only write the language matching this code
    #[serde(default)]
    pub language: Option<String>,

    // @field: Files converted at once in folder mode
    #[serde(default = "default_concurrent_files")]
    pub concurrent_files: usize,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            delay_ms: 0,
            split_languages: false,
            language: None,
            concurrent_files: default_concurrent_files(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<&LogLevel> for log::LevelFilter {
    fn from(level: &LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_concurrent_files() -> usize {
    4
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.webvtt.selector.trim().is_empty() {
            return Err(anyhow!("WebVTT stylesheet selector must not be empty"));
        }

        if self.conversion.concurrent_files == 0 {
            return Err(anyhow!("conversion.concurrent_files must be at least 1"));
        }

        // Validate language filter
        if let Some(language) = &self.conversion.language {
            let _name = crate::language_utils::get_language_name(language)?;
        }

        Ok(())
    }

    /// Load a configuration file, falling back to defaults for missing fields
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to open config file {:?}: {}", path, e))?;
        serde_json::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {:?}: {}", path, e))
    }

    /// Write the configuration as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)
            .map_err(|e| anyhow!("Failed to write config file {:?}: {}", path.as_ref(), e))
    }
}
