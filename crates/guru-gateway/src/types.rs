//! Generated artifact types returned by the model gateway.
//!
//! These types describe the shapes the external model is asked to produce.
//! Enum fields use case-insensitive custom serde so that minor variations in
//! model output ("Easy", "EASY") still deserialize; unknown values are
//! rejected with a descriptive message that surfaces as a malformed-response
//! error at the gateway boundary.

use serde::{Deserialize, Serialize};

/// Number of answer options every quiz question must carry.
pub const OPTION_COUNT: usize = 4;

/// Mastery threshold above which hard questions are requested.
pub const HARD_THRESHOLD: u8 = 70;

/// Mastery threshold above which medium questions are requested.
pub const MEDIUM_THRESHOLD: u8 = 40;

// ============================================================================
// Difficulty
// ============================================================================

/// Requested difficulty for a generated quiz question.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Difficulty {
    /// Easy question (mastery 40 or below).
    #[default]
    Easy,
    /// Medium question (mastery above 40, up to 70).
    Medium,
    /// Hard question (mastery above 70).
    Hard,
}

impl Difficulty {
    /// Derives the requested difficulty from a mastery score.
    ///
    /// Thresholds are exclusive: mastery above 70 is hard, above 40 is
    /// medium, everything else (including exactly 40 and 70) is easy or
    /// medium respectively.
    ///
    /// # Examples
    ///
    /// ```
    /// use guru_gateway::Difficulty;
    ///
    /// assert_eq!(Difficulty::for_mastery(0), Difficulty::Easy);
    /// assert_eq!(Difficulty::for_mastery(40), Difficulty::Easy);
    /// assert_eq!(Difficulty::for_mastery(41), Difficulty::Medium);
    /// assert_eq!(Difficulty::for_mastery(70), Difficulty::Medium);
    /// assert_eq!(Difficulty::for_mastery(71), Difficulty::Hard);
    /// ```
    #[must_use]
    pub const fn for_mastery(mastery: u8) -> Self {
        if mastery > HARD_THRESHOLD {
            Self::Hard
        } else if mastery > MEDIUM_THRESHOLD {
            Self::Medium
        } else {
            Self::Easy
        }
    }

    /// Returns the wire representation of this difficulty.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    /// Parses a string into a `Difficulty`, case-insensitively.
    fn from_str_case_insensitive(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Difficulty {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str_case_insensitive(&s).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "invalid difficulty '{s}': expected one of 'easy', 'medium', 'hard'"
            ))
        })
    }
}

impl Serialize for Difficulty {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

// ============================================================================
// LanguageMode
// ============================================================================

/// Language register of a learning material.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LanguageMode {
    /// Plain English prose (default for freshly curated material).
    #[default]
    Plain,
    /// Code-switched register mixing English with the learner's language.
    CodeSwitched,
}

impl LanguageMode {
    /// Returns the wire representation of this language mode.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::CodeSwitched => "codeSwitched",
        }
    }

    /// Parses a string into a `LanguageMode`.
    ///
    /// Accepts any casing and ignores `-`/`_` separators, so "codeSwitched",
    /// "code-switched" and "CODE_SWITCHED" all parse to the same variant.
    fn from_str_case_insensitive(s: &str) -> Option<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "plain" => Some(Self::Plain),
            "codeswitched" => Some(Self::CodeSwitched),
            _ => None,
        }
    }
}

impl std::fmt::Display for LanguageMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LanguageMode {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str_case_insensitive(&s).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "invalid language mode '{s}': expected 'plain' or 'codeSwitched'"
            ))
        })
    }
}

impl Serialize for LanguageMode {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

// ============================================================================
// QuizQuestion
// ============================================================================

/// A generated quiz question.
///
/// Immutable once produced; the orchestrator holds at most one current
/// question at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    /// The question text shown to the learner.
    pub question: String,

    /// Exactly four answer options, index-addressed.
    pub options: Vec<String>,

    /// Index into `options` of the correct answer.
    pub correct_index: usize,

    /// Explanation shown after the learner answers.
    pub explanation: String,

    /// Difficulty the question was generated at.
    pub difficulty: Difficulty,

    /// Topic label the question belongs to.
    pub topic: String,
}

impl QuizQuestion {
    /// Validates the structural constraints serde cannot express.
    ///
    /// Checks the option count, the correct-index bound, and that the
    /// question text is non-empty. Returns a description of the first
    /// violation found.
    pub(crate) fn check_shape(&self) -> std::result::Result<(), String> {
        if self.question.trim().is_empty() {
            return Err("question text is empty".to_string());
        }
        if self.options.len() != OPTION_COUNT {
            return Err(format!(
                "expected {OPTION_COUNT} options, got {}",
                self.options.len()
            ));
        }
        if self.correct_index >= self.options.len() {
            return Err(format!(
                "correctIndex {} out of range for {} options",
                self.correct_index,
                self.options.len()
            ));
        }
        Ok(())
    }
}

// ============================================================================
// LearningMaterial
// ============================================================================

/// A curated (or localized) reading passage.
///
/// Immutable once produced; a localized copy supersedes the plain one and
/// carries a different language mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningMaterial {
    /// Title of the passage.
    pub title: String,

    /// Body text of the passage.
    pub body: String,

    /// Reading-level tag (free text, e.g. "grade 9").
    pub reading_level: String,

    /// Source attribution text.
    pub attribution: String,

    /// Language register of the passage.
    pub language_mode: LanguageMode,
}

impl LearningMaterial {
    /// Validates the structural constraints serde cannot express.
    pub(crate) fn check_shape(&self) -> std::result::Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title is empty".to_string());
        }
        if self.body.trim().is_empty() {
            return Err("body is empty".to_string());
        }
        Ok(())
    }
}

// ============================================================================
// AdaptationDecision
// ============================================================================

/// The pedagogical next step chosen by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextAction {
    /// Ask another quiz question.
    Quiz,
    /// Detour through curated reading content.
    Content,
}

impl NextAction {
    /// Returns the wire representation of this action.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Quiz => "quiz",
            Self::Content => "content",
        }
    }

    /// Parses a string into a `NextAction`, case-insensitively.
    fn from_str_case_insensitive(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "quiz" => Some(Self::Quiz),
            "content" => Some(Self::Content),
            _ => None,
        }
    }
}

impl std::fmt::Display for NextAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NextAction {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str_case_insensitive(&s).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "invalid next action '{s}': expected 'quiz' or 'content'"
            ))
        })
    }
}

impl Serialize for NextAction {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// Outcome of the adaptation step.
///
/// The choice between another quiz and a content detour is delegated
/// entirely to the model; all three fields are required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdaptationDecision {
    /// What the session should do next.
    pub next_action: NextAction,

    /// The model's stated reasoning for the choice.
    pub reasoning: String,

    /// Focus area suggested for the next step.
    pub suggested_focus: String,
}

// ============================================================================
// SafetyVerdict
// ============================================================================

/// Result of the safety/relevance check on curated content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyVerdict {
    /// Whether the content was judged safe and on-topic.
    pub safe: bool,

    /// Optional reason given when the content is flagged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    // ------------------------------------------------------------------------
    // Difficulty tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_difficulty_for_mastery_boundaries() {
        assert_eq!(Difficulty::for_mastery(0), Difficulty::Easy);
        assert_eq!(Difficulty::for_mastery(39), Difficulty::Easy);
        // Exactly 40 is still easy
        assert_eq!(Difficulty::for_mastery(40), Difficulty::Easy);
        assert_eq!(Difficulty::for_mastery(41), Difficulty::Medium);
        assert_eq!(Difficulty::for_mastery(69), Difficulty::Medium);
        // Exactly 70 is still medium
        assert_eq!(Difficulty::for_mastery(70), Difficulty::Medium);
        assert_eq!(Difficulty::for_mastery(71), Difficulty::Hard);
        assert_eq!(Difficulty::for_mastery(100), Difficulty::Hard);
    }

    #[test]
    fn test_difficulty_serialization() {
        assert_eq!(serde_json::to_string(&Difficulty::Easy).unwrap(), "\"easy\"");
        assert_eq!(
            serde_json::to_string(&Difficulty::Medium).unwrap(),
            "\"medium\""
        );
        assert_eq!(serde_json::to_string(&Difficulty::Hard).unwrap(), "\"hard\"");
    }

    #[test]
    fn test_difficulty_case_insensitive() {
        let d: Difficulty = serde_json::from_str("\"EASY\"").unwrap();
        assert_eq!(d, Difficulty::Easy);
        let d: Difficulty = serde_json::from_str("\"Medium\"").unwrap();
        assert_eq!(d, Difficulty::Medium);
        let d: Difficulty = serde_json::from_str("\"hArD\"").unwrap();
        assert_eq!(d, Difficulty::Hard);
    }

    #[test]
    fn test_invalid_difficulty_error() {
        let result: std::result::Result<Difficulty, _> = serde_json::from_str("\"extreme\"");
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("invalid difficulty"));
        assert!(err.contains("extreme"));
    }

    // ------------------------------------------------------------------------
    // LanguageMode tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_language_mode_serialization() {
        assert_eq!(
            serde_json::to_string(&LanguageMode::Plain).unwrap(),
            "\"plain\""
        );
        assert_eq!(
            serde_json::to_string(&LanguageMode::CodeSwitched).unwrap(),
            "\"codeSwitched\""
        );
    }

    #[test]
    fn test_language_mode_accepts_separator_variants() {
        for variant in ["codeSwitched", "code-switched", "code_switched", "CODESWITCHED"] {
            let json = format!("\"{variant}\"");
            let mode: LanguageMode = serde_json::from_str(&json).unwrap();
            assert_eq!(mode, LanguageMode::CodeSwitched, "variant: {variant}");
        }
    }

    #[test]
    fn test_invalid_language_mode_error() {
        let result: std::result::Result<LanguageMode, _> = serde_json::from_str("\"bilingual\"");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("invalid language mode"));
    }

    // ------------------------------------------------------------------------
    // QuizQuestion tests
    // ------------------------------------------------------------------------

    fn sample_question() -> QuizQuestion {
        QuizQuestion {
            question: "What is 2 + 2?".to_string(),
            options: vec![
                "3".to_string(),
                "4".to_string(),
                "5".to_string(),
                "22".to_string(),
            ],
            correct_index: 1,
            explanation: "Basic addition.".to_string(),
            difficulty: Difficulty::Easy,
            topic: "Algebra".to_string(),
        }
    }

    #[test]
    fn test_quiz_question_shape_valid() {
        assert!(sample_question().check_shape().is_ok());
    }

    #[test]
    fn test_quiz_question_wrong_option_count() {
        let mut q = sample_question();
        q.options.pop();
        let err = q.check_shape().unwrap_err();
        assert!(err.contains("expected 4 options"));
    }

    #[test]
    fn test_quiz_question_index_out_of_range() {
        let mut q = sample_question();
        q.correct_index = 4;
        let err = q.check_shape().unwrap_err();
        assert!(err.contains("out of range"));
    }

    #[test]
    fn test_quiz_question_empty_text() {
        let mut q = sample_question();
        q.question = "   ".to_string();
        assert!(q.check_shape().unwrap_err().contains("empty"));
    }

    #[test]
    fn test_quiz_question_camel_case_wire_names() {
        let json = serde_json::to_string(&sample_question()).unwrap();
        assert!(json.contains("\"correctIndex\":1"));
        assert!(json.contains("\"difficulty\":\"easy\""));
    }

    // ------------------------------------------------------------------------
    // AdaptationDecision tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_adaptation_decision_deserialization() {
        let json = r#"{
            "nextAction": "content",
            "reasoning": "Learner missed two in a row",
            "suggestedFocus": "linear equations"
        }"#;
        let decision: AdaptationDecision = serde_json::from_str(json).unwrap();
        assert_eq!(decision.next_action, NextAction::Content);
        assert_eq!(decision.suggested_focus, "linear equations");
    }

    #[test]
    fn test_adaptation_decision_missing_next_action() {
        let json = r#"{"reasoning": "r", "suggestedFocus": "f"}"#;
        let result: std::result::Result<AdaptationDecision, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    // ------------------------------------------------------------------------
    // SafetyVerdict tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_safety_verdict_reason_optional() {
        let verdict: SafetyVerdict = serde_json::from_str(r#"{"safe": true}"#).unwrap();
        assert!(verdict.safe);
        assert!(verdict.reason.is_none());

        let verdict: SafetyVerdict =
            serde_json::from_str(r#"{"safe": false, "reason": "off-topic"}"#).unwrap();
        assert!(!verdict.safe);
        assert_eq!(verdict.reason.as_deref(), Some("off-topic"));
    }
}
