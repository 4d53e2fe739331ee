//! Typed gateway operations over a generative client.
//!
//! Each operation issues exactly one request: build the instruction, send
//! it, validate the reply against the declared shape. No retries, no
//! caching; recovery belongs to the orchestrator.

use crate::client::GenerativeClient;
use crate::error::{GatewayError, Result};
use crate::parse;
use crate::prompt;
use crate::types::{
    AdaptationDecision, Difficulty, LanguageMode, LearningMaterial, QuizQuestion, SafetyVerdict,
};

use serde::{Deserialize, Serialize};

// ============================================================================
// SafetyPolicy
// ============================================================================

/// What an empty safety-check response should mean.
///
/// The historical behavior treats silence as safe, trading strictness for
/// availability. That choice is surfaced here as an explicit, configurable
/// policy instead of a hardcoded default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SafetyPolicy {
    /// An empty response counts as safe (default).
    #[default]
    FailOpen,
    /// An empty response counts as unsafe.
    FailClosed,
}

impl SafetyPolicy {
    /// Returns the wire representation of this policy.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FailOpen => "failOpen",
            Self::FailClosed => "failClosed",
        }
    }

    /// Parses a string into a `SafetyPolicy`.
    ///
    /// Accepts any casing and ignores `-`/`_` separators.
    fn from_str_case_insensitive(s: &str) -> Option<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "failopen" => Some(Self::FailOpen),
            "failclosed" => Some(Self::FailClosed),
            _ => None,
        }
    }
}

impl std::fmt::Display for SafetyPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SafetyPolicy {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str_case_insensitive(&s).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "invalid safety policy '{s}': expected 'failOpen' or 'failClosed'"
            ))
        })
    }
}

impl Serialize for SafetyPolicy {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

// ============================================================================
// ModelGateway
// ============================================================================

/// Translates pedagogical intents into single model requests.
///
/// Stateless apart from the wrapped client and the safety policy; the
/// orchestrator owns all session state.
#[derive(Debug)]
pub struct ModelGateway<C> {
    client: C,
    safety_policy: SafetyPolicy,
}

impl<C: GenerativeClient> ModelGateway<C> {
    /// Creates a gateway with the default (fail-open) safety policy.
    pub fn new(client: C) -> Self {
        Self {
            client,
            safety_policy: SafetyPolicy::default(),
        }
    }

    /// Overrides the safety policy.
    #[must_use]
    pub const fn with_safety_policy(mut self, policy: SafetyPolicy) -> Self {
        self.safety_policy = policy;
        self
    }

    /// Returns the wrapped client.
    pub const fn client(&self) -> &C {
        &self.client
    }

    /// Returns the configured safety policy.
    pub const fn safety_policy(&self) -> SafetyPolicy {
        self.safety_policy
    }

    /// Generates a quiz question at the difficulty implied by `mastery`.
    ///
    /// Mastery above 70 requests a hard question, above 40 medium, and
    /// everything else easy.
    pub async fn generate_question(
        &self,
        topic: &str,
        grade: &str,
        mastery: u8,
        course: Option<&str>,
    ) -> Result<QuizQuestion> {
        const OP: &str = "generate_question";

        let difficulty = Difficulty::for_mastery(mastery);
        let text = self
            .call(OP, &prompt::question_prompt(topic, grade, difficulty, course))
            .await?;
        let question: QuizQuestion = parse::parse_reply(OP, &text)?;
        question
            .check_shape()
            .map_err(|detail| GatewayError::malformed(OP, detail))?;
        Ok(question)
    }

    /// Asks the model whether the learner should quiz again or read first.
    ///
    /// No local decision logic: the branch is delegated entirely to the
    /// model's judgment given the answer outcome and the mastery score.
    pub async fn decide_next_step(
        &self,
        last_correct: bool,
        mastery: u8,
        topic: &str,
    ) -> Result<AdaptationDecision> {
        const OP: &str = "decide_next_step";

        let text = self
            .call(OP, &prompt::next_step_prompt(last_correct, mastery, topic))
            .await?;
        parse::parse_reply(OP, &text)
    }

    /// Requests a short reading passage aligned to the given focus area.
    pub async fn curate_material(
        &self,
        topic: &str,
        grade: &str,
        focus: &str,
        course: Option<&str>,
    ) -> Result<LearningMaterial> {
        const OP: &str = "curate_material";

        let text = self
            .call(OP, &prompt::material_prompt(topic, grade, focus, course))
            .await?;
        let material: LearningMaterial = parse::parse_reply(OP, &text)?;
        material
            .check_shape()
            .map_err(|detail| GatewayError::malformed(OP, detail))?;
        Ok(material)
    }

    /// Rewrites a material into the target language register.
    ///
    /// The returned record must carry the target language-mode tag; other
    /// fields may change because the rewrite is itself a model judgment,
    /// not a local transform.
    pub async fn localize_material(
        &self,
        material: &LearningMaterial,
        target: LanguageMode,
    ) -> Result<LearningMaterial> {
        const OP: &str = "localize_material";

        let text = self
            .call(OP, &prompt::localize_prompt(material, target))
            .await?;
        let localized: LearningMaterial = parse::parse_reply(OP, &text)?;
        localized
            .check_shape()
            .map_err(|detail| GatewayError::malformed(OP, detail))?;
        if localized.language_mode != target {
            return Err(GatewayError::malformed(
                OP,
                format!(
                    "expected languageMode '{target}', got '{}'",
                    localized.language_mode
                ),
            ));
        }
        Ok(localized)
    }

    /// Runs the safety/relevance check over a bounded content prefix.
    ///
    /// An empty response resolves through the configured [`SafetyPolicy`]
    /// instead of failing; a present-but-malformed response is still an
    /// error.
    pub async fn check_safety(&self, content: &str) -> Result<SafetyVerdict> {
        const OP: &str = "check_safety";

        let text = self
            .client
            .generate(&prompt::safety_prompt(content))
            .await
            .map_err(|e| GatewayError::transport(OP, e.to_string()))?;

        if text.trim().is_empty() {
            tracing::warn!(policy = %self.safety_policy, "Empty safety response, applying policy");
            return Ok(match self.safety_policy {
                SafetyPolicy::FailOpen => SafetyVerdict {
                    safe: true,
                    reason: None,
                },
                SafetyPolicy::FailClosed => SafetyVerdict {
                    safe: false,
                    reason: Some("safety check returned no response".to_string()),
                },
            });
        }

        parse::parse_reply(OP, &text)
    }

    /// Issues one request and rejects empty replies.
    async fn call(&self, operation: &'static str, prompt: &str) -> Result<String> {
        tracing::debug!(operation, prompt_chars = prompt.len(), "Issuing model request");
        let text = self
            .client
            .generate(prompt)
            .await
            .map_err(|e| GatewayError::transport(operation, e.to_string()))?;
        if text.trim().is_empty() {
            return Err(GatewayError::empty(operation));
        }
        Ok(text)
    }
}
