//! Configuration structures for deserialisation.
//!
//! These structures map directly to the JSON configuration file format.

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::ewarm::layout::TemplateLayout;

/// Root configuration structure.
///
/// This is the top-level structure that matches the JSON config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Optional JSON schema reference (ignored during parsing).
    #[serde(rename = "$schema", default)]
    _schema: Option<String>,

    /// Optional comment field (ignored during parsing).
    #[serde(rename = "_comment", default)]
    _comment: Option<String>,

    /// Folder holding `template.eww`, `template.ewp` and `template_main.c`.
    #[serde(default = "default_template_dir")]
    pub template_dir: PathBuf,

    /// Root of the vendor CMSIS tree (`Include/`, `Device/ST/...`).
    #[serde(default = "default_cmsis_dir")]
    pub cmsis_dir: PathBuf,

    /// Virtual prefix written in front of every file added by `add_folder`.
    #[serde(default = "default_source_prefix")]
    pub source_prefix: String,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            _schema: None,
            _comment: None,
            template_dir: default_template_dir(),
            cmsis_dir: default_cmsis_dir(),
            source_prefix: default_source_prefix(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any validation checks fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.template_dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "template_dir must not be empty".to_string(),
            });
        }
        if self.cmsis_dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "cmsis_dir must not be empty".to_string(),
            });
        }
        if self.source_prefix.is_empty() {
            return Err(ConfigError::ValidationError {
                message: "source_prefix must not be empty".to_string(),
            });
        }
        if self.source_prefix.ends_with(['/', '\\']) {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "source_prefix '{}' must not end with a path separator",
                    self.source_prefix
                ),
            });
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
                    self.logging.level
                ),
            });
        }
        Ok(())
    }

    /// Returns the template and CMSIS layout described by this configuration.
    #[must_use]
    pub fn layout(&self) -> TemplateLayout {
        TemplateLayout::new(&self.template_dir, &self.cmsis_dir)
    }
}

fn default_template_dir() -> PathBuf {
    PathBuf::from("template")
}

fn default_cmsis_dir() -> PathBuf {
    PathBuf::from("CMSIS")
}

fn default_source_prefix() -> String {
    "$PROJ_DIR$/../source".to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}
