//! Session state types for the Guru orchestrator.
//!
//! A [`Session`] is one learner's run through a topic: identity fields, the
//! clamped mastery score, and an append-only event history. The session is
//! owned exclusively by the orchestrator; the presentation layer only ever
//! sees a shared reference.

use chrono::{DateTime, Utc};
use guru_gateway::{LearningMaterial, QuizQuestion};
use serde::{Deserialize, Serialize};

/// Upper bound of the mastery score.
pub const MASTERY_MAX: u8 = 100;

/// Mastery gained on a correct answer.
pub const MASTERY_GAIN: u8 = 20;

/// Mastery lost on an incorrect answer.
pub const MASTERY_LOSS: u8 = 10;

// ============================================================================
// Phase
// ============================================================================

/// Current phase of the tutoring session.
///
/// The session alternates `Assessing -> Learning -> Assessing -> ...`, with
/// `Learning` entered only when the adaptation step chooses a content
/// detour. `Summary` is reachable in the type but not produced by any
/// transition yet; it is reserved for a future wrap-up screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No session has been started.
    #[default]
    Idle,
    /// A quiz question is current; waiting for an answer.
    Assessing,
    /// A learning material is current; waiting for the learner to continue.
    Learning,
    /// Reserved terminal phase; no transition produces it today.
    Summary,
}

impl Phase {
    /// Returns `true` if a quiz question should be on screen.
    #[must_use]
    pub const fn is_assessing(&self) -> bool {
        matches!(self, Self::Assessing)
    }

    /// Returns `true` if a learning material should be on screen.
    #[must_use]
    pub const fn is_learning(&self) -> bool {
        matches!(self, Self::Learning)
    }

    /// Returns the wire representation of this phase.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Assessing => "assessing",
            Self::Learning => "learning",
            Self::Summary => "summary",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// HistoryEvent
// ============================================================================

/// One append-only entry in the session history.
///
/// Events are never mutated after creation; the history only grows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HistoryEvent {
    /// The learner answered a quiz question.
    #[serde(rename_all = "camelCase")]
    Quiz {
        /// The question that was answered.
        question: QuizQuestion,
        /// The option index the learner chose.
        chosen_index: usize,
        /// Whether the chosen index matched the correct one.
        correct: bool,
        /// When the answer was recorded.
        timestamp: DateTime<Utc>,
    },
    /// The learner was shown a learning material.
    #[serde(rename_all = "camelCase")]
    Content {
        /// The material that was displayed.
        material: LearningMaterial,
        /// When the material was recorded.
        timestamp: DateTime<Utc>,
    },
}

impl HistoryEvent {
    /// Creates a quiz-attempt event stamped with the current time.
    #[must_use]
    pub fn quiz(question: QuizQuestion, chosen_index: usize, correct: bool) -> Self {
        Self::Quiz {
            question,
            chosen_index,
            correct,
            timestamp: Utc::now(),
        }
    }

    /// Creates a content-exposure event stamped with the current time.
    #[must_use]
    pub fn content(material: LearningMaterial) -> Self {
        Self::Content {
            material,
            timestamp: Utc::now(),
        }
    }

    /// Returns `true` if this is a quiz attempt.
    #[must_use]
    pub const fn is_quiz(&self) -> bool {
        matches!(self, Self::Quiz { .. })
    }

    /// Returns `true` if this is a content exposure.
    #[must_use]
    pub const fn is_content(&self) -> bool {
        matches!(self, Self::Content { .. })
    }
}

// ============================================================================
// Session
// ============================================================================

/// One learner's run through a topic.
///
/// Serializes for snapshots and export; there is no deserialization back
/// into a live session. Mastery only changes through
/// [`Session::apply_answer`], which keeps it within `[0, 100]`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Topic being studied.
    pub topic: String,

    /// Grade level of the learner.
    pub grade: String,

    /// Course context (board + course identifier), free text.
    pub course: String,

    /// Mastery score, always within `[0, 100]`.
    mastery: u8,

    /// Append-only event history.
    history: Vec<HistoryEvent>,

    /// When the session started.
    pub started_at: DateTime<Utc>,
}

impl Session {
    /// Creates a fresh session with mastery 0 and empty history.
    #[must_use]
    pub fn new(topic: impl Into<String>, grade: impl Into<String>, course: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            grade: grade.into(),
            course: course.into(),
            mastery: 0,
            history: Vec::new(),
            started_at: Utc::now(),
        }
    }

    /// Returns the current mastery score.
    #[must_use]
    pub const fn mastery(&self) -> u8 {
        self.mastery
    }

    /// Returns the event history, oldest first.
    #[must_use]
    pub fn history(&self) -> &[HistoryEvent] {
        &self.history
    }

    /// Applies the mastery delta for an answer and returns the new score.
    ///
    /// Correct answers add 20 capped at 100; incorrect answers subtract 10
    /// floored at 0.
    pub fn apply_answer(&mut self, correct: bool) -> u8 {
        self.mastery = if correct {
            self.mastery.saturating_add(MASTERY_GAIN).min(MASTERY_MAX)
        } else {
            self.mastery.saturating_sub(MASTERY_LOSS)
        };
        self.mastery
    }

    /// Appends a quiz-attempt event.
    pub fn record_quiz(&mut self, question: QuizQuestion, chosen_index: usize, correct: bool) {
        self.history
            .push(HistoryEvent::quiz(question, chosen_index, correct));
    }

    /// Appends a content-exposure event.
    pub fn record_content(&mut self, material: LearningMaterial) {
        self.history.push(HistoryEvent::content(material));
    }

    /// Counts quiz attempts in the history.
    #[must_use]
    pub fn quiz_count(&self) -> usize {
        self.history.iter().filter(|e| e.is_quiz()).count()
    }

    /// Counts content exposures in the history.
    #[must_use]
    pub fn content_count(&self) -> usize {
        self.history.iter().filter(|e| e.is_content()).count()
    }
}
