/*!
 * Application configuration.
 *
 * Loads, validates and defaults the settings the command line tool runs with.
 */

use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::debug;

use crate::errors::AppError;
use crate::reader::ReaderOptions;
use crate::timestamp::{TimestampFormat, USER_TIMESTAMP_FORMAT};

/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Grammar for timestamps typed by the operator
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,

    /// Require exactly one [Events] section in ASS files
    #[serde(default = "default_true")]
    pub strict_ass: bool,

    /// How query results are printed
    #[serde(default)]
    pub output: OutputFormat,

    /// Matches printed per query, 0 for no limit
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching filter for the log facade
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Rendering of query results
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    // @output: Aligned plain text, one event per line
    #[default]
    Text,
    // @output: Pretty-printed JSON
    Json,
}

fn default_timestamp_format() -> String {
    USER_TIMESTAMP_FORMAT.to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_results() -> usize {
    10
}

impl Config {
    /// Load a configuration file, falling back to defaults when it does not exist
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("Config file not found at '{}', using defaults", path.display());
            return Ok(Self::default());
        }

        let file = File::open(path)
            .map_err(|e| AppError::Config(format!("Failed to open config file {}: {}", path.display(), e)))?;
        let config: Config = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| AppError::Config(format!("Failed to parse config file {}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), AppError> {
        self.timestamp_grammar()?;
        Ok(())
    }

    /// Compiled operator timestamp grammar
    pub fn timestamp_grammar(&self) -> Result<TimestampFormat, AppError> {
        TimestampFormat::compile(&self.timestamp_format).map_err(|e| {
            AppError::Config(format!("Invalid timestamp_format '{}': {}", self.timestamp_format, e))
        })
    }

    pub fn reader_options(&self) -> ReaderOptions {
        ReaderOptions {
            strict_ass: self.strict_ass,
        }
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: LogLevel::default(),
            timestamp_format: default_timestamp_format(),
            strict_ass: default_true(),
            output: OutputFormat::default(),
            max_results: default_max_results(),
        }
    }
}
