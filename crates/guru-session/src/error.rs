//! Error types for the session orchestrator.
//!
//! Gateway failures pass through unchanged so callers can distinguish the
//! empty/malformed/transport taxonomy; everything else is either a guard
//! violation (an action invalid for the current phase) or a configuration
//! problem.

use std::path::PathBuf;

use guru_gateway::GatewayError;

use crate::session::Phase;

/// A specialized `Result` type for orchestrator operations.
pub type Result<T> = std::result::Result<T, SessionError>;

/// Errors that can occur during session orchestration.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The caller invoked an action that is not valid for the current phase
    /// (e.g. submitting an answer with no current question).
    #[error("cannot {action} while the session is {phase}")]
    InvalidTransition {
        /// Human-readable name of the attempted action.
        action: &'static str,
        /// The phase the session was in.
        phase: Phase,
    },

    /// The chosen answer index does not address any option.
    #[error("answer index {index} is out of range for {option_count} options")]
    AnswerOutOfRange {
        /// The index the caller submitted.
        index: usize,
        /// How many options the current question has.
        option_count: usize,
    },

    /// A model gateway call failed; the triggering transition was aborted
    /// with no session mutation committed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// Invalid JSON syntax in the configuration file.
    #[error("invalid config file '{path}': {message}\n\nSuggestion: Validate your guru.json with a JSON linter")]
    ConfigParse {
        /// Path to the configuration file.
        path: PathBuf,
        /// Description of the parse error.
        message: String,
    },

    /// Configuration validation failed.
    #[error("invalid configuration: {message}\n\nSuggestion: {suggestion}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
        /// Actionable suggestion for the user.
        suggestion: String,
    },
}

impl SessionError {
    /// Creates a new `InvalidTransition` error.
    #[must_use]
    pub const fn invalid_transition(action: &'static str, phase: Phase) -> Self {
        Self::InvalidTransition { action, phase }
    }

    /// Creates a new `AnswerOutOfRange` error.
    #[must_use]
    pub const fn answer_out_of_range(index: usize, option_count: usize) -> Self {
        Self::AnswerOutOfRange {
            index,
            option_count,
        }
    }

    /// Creates a new `ConfigParse` error.
    #[must_use]
    pub fn config_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ConfigParse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new `ConfigValidation` error.
    #[must_use]
    pub fn config_validation(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Returns `true` if this error came from the model gateway boundary.
    #[must_use]
    pub const fn is_gateway(&self) -> bool {
        matches!(self, Self::Gateway(_))
    }
}
