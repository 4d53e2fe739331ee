//! Guru Model Gateway
//!
//! Translates pedagogical intents into single requests against a hosted
//! generative-content service and returns validated, typed results. Each
//! operation builds a natural-language instruction plus a strict output
//! shape, issues exactly one request, and parses the textual reply; the
//! gateway holds no session state and never retries.
//!
//! # Operations
//!
//! - [`ModelGateway::generate_question`] - quiz question at mastery-derived difficulty
//! - [`ModelGateway::decide_next_step`] - quiz-vs-content branch, delegated to the model
//! - [`ModelGateway::curate_material`] - short reading passage for a focus area
//! - [`ModelGateway::localize_material`] - rewrite into a code-switched register
//! - [`ModelGateway::check_safety`] - bounded-prefix safety/relevance judgment
//!
//! # Example
//!
//! ```no_run
//! use guru_gateway::{ModelGateway, OpenAiClient};
//!
//! # async fn example() -> guru_gateway::Result<()> {
//! let client = OpenAiClient::new(None, "gpt-4o-mini", None);
//! let gateway = ModelGateway::new(client);
//!
//! let question = gateway.generate_question("Algebra", "9", 0, None).await?;
//! assert_eq!(question.options.len(), 4);
//! # Ok(())
//! # }
//! ```

pub mod client;
mod error;
mod gateway;
mod parse;
mod prompt;
pub mod scripted;
mod types;

pub use client::{GenerativeClient, OpenAiClient, TokenUsage, TransportError};
pub use error::{GatewayError, Result};
pub use gateway::{ModelGateway, SafetyPolicy};
pub use scripted::ScriptedClient;
pub use types::{
    AdaptationDecision, Difficulty, LanguageMode, LearningMaterial, NextAction, QuizQuestion,
    SafetyVerdict, HARD_THRESHOLD, MEDIUM_THRESHOLD, OPTION_COUNT,
};
