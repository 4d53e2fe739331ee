//! Configuration types for the Guru orchestrator.
//!
//! Configuration is loaded from a `guru.json` file; a missing file yields
//! the defaults, a malformed or invalid one is an error. Every field has a
//! default so an empty object is a valid configuration.

use std::path::Path;

use guru_gateway::SafetyPolicy;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SessionError};

/// The default config file name.
const CONFIG_FILE_NAME: &str = "guru.json";

/// Default model identifier for gateway requests.
fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

/// Default grade level used when the caller does not supply one.
fn default_grade() -> String {
    "9".to_string()
}

/// Main configuration for a Guru run.
///
/// Controls which model the gateway talks to, where the service lives, how
/// empty safety verdicts are treated, and the default learner profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Model identifier sent with every gateway request.
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the generative-content service. `None` uses the
    /// client's built-in default endpoint.
    #[serde(default)]
    pub api_base: Option<String>,

    /// How an empty safety response is resolved.
    #[serde(default)]
    pub safety_policy: SafetyPolicy,

    /// Grade level used when the CLI is not given one.
    #[serde(default = "default_grade")]
    pub grade: String,

    /// Examination board or curriculum used for course context
    /// (e.g. "CBSE"). Empty means no course context is sent.
    #[serde(default)]
    pub board: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_base: None,
            safety_policy: SafetyPolicy::default(),
            grade: default_grade(),
            board: String::new(),
        }
    }
}

impl Config {
    /// Loads configuration from the current working directory.
    ///
    /// Looks for `guru.json` in the current directory. If found, loads and
    /// validates the configuration. If not found, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but contains invalid JSON.
    pub fn load() -> Result<Self> {
        let current_dir = std::env::current_dir().map_err(|e| {
            SessionError::config_parse(
                "<current directory>",
                format!("cannot determine current directory: {e}"),
            )
        })?;
        Self::load_from_dir(&current_dir)
    }

    /// Loads configuration from a specific directory.
    ///
    /// # Errors
    ///
    /// Returns an error if `guru.json` exists in `dir` but contains invalid
    /// JSON.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let config_path = dir.join(CONFIG_FILE_NAME);
        Self::load_from_file(&config_path)
    }

    /// Loads configuration from a specific file path.
    ///
    /// If the file does not exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::ConfigParse` if the file exists but contains
    /// invalid JSON or invalid enum values.
    ///
    /// Returns `SessionError::ConfigValidation` if the configuration values
    /// are invalid (e.g., an empty model name).
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let config = Self::default();
                config.validate()?;
                return Ok(config);
            }
            Err(e) => {
                return Err(SessionError::config_parse(
                    path,
                    format!("failed to read file: {e}"),
                ));
            }
        };

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| SessionError::config_parse(path, e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::ConfigValidation` if any check fails:
    /// - `model` must not be empty
    /// - `grade` must not be empty
    /// - `apiBase`, when present, must not be empty
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(SessionError::config_validation(
                "model must not be empty",
                "Set model to a model identifier in your guru.json",
            ));
        }

        if self.grade.trim().is_empty() {
            return Err(SessionError::config_validation(
                "grade must not be empty",
                "Set grade to a grade level in your guru.json (e.g. \"9\")",
            ));
        }

        if let Some(api_base) = &self.api_base {
            if api_base.trim().is_empty() {
                return Err(SessionError::config_validation(
                    "apiBase must not be empty when present",
                    "Remove apiBase from your guru.json or set it to a service URL",
                ));
            }
        }

        Ok(())
    }
}
