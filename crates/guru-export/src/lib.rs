//! Guru Session Export
//!
//! Builds the portable study-pack artifact from a finished (or in-progress)
//! session: the questions attempted, the materials read, the final mastery
//! score, and the full trace log, all under stable camelCase field names so
//! external tools can consume the JSON without knowing this crate.
//!
//! # Example
//!
//! ```rust
//! use guru_export::{json::JsonExporter, SessionExport};
//! use guru_session::{Session, TraceLog};
//!
//! let session = Session::new("Algebra", "9", "CBSE Mathematics");
//! let trace = TraceLog::new();
//!
//! let export = SessionExport::from_session(&session, &trace);
//! let json = JsonExporter::new(&export).generate_pretty().unwrap();
//! assert!(json.contains("masteryScore"));
//! ```

pub mod json;

use chrono::{DateTime, Utc};
use guru_gateway::{LearningMaterial, QuizQuestion};
use guru_session::{HistoryEvent, Session, TraceEntry, TraceLog};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur while producing an export artifact.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Failed to serialize the artifact to JSON.
    #[error("failed to serialize export: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Failed to write the artifact to disk.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;

// ============================================================================
// QuizExport
// ============================================================================

/// One attempted quiz question in the export artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizExport {
    /// The question as it was shown.
    pub question: QuizQuestion,

    /// The option index the learner chose.
    pub chosen_index: usize,

    /// Whether the attempt was correct.
    pub correct: bool,

    /// When the answer was recorded.
    pub timestamp: DateTime<Utc>,
}

// ============================================================================
// SessionExport
// ============================================================================

/// The portable study-pack artifact for one session.
///
/// Field names are a stable external contract; do not rename them without
/// versioning the artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionExport {
    /// Topic the session covered.
    pub topic: String,

    /// Course context, free text; empty when none was configured.
    pub course: String,

    /// Grade level of the learner.
    pub grade: String,

    /// Final mastery score, within `[0, 100]`; re-read artifacts are
    /// clamped to that range.
    #[serde(deserialize_with = "clamp_mastery")]
    pub mastery_score: u8,

    /// When the artifact was produced.
    pub exported_at: DateTime<Utc>,

    /// Every question attempted, in session order, for later review.
    pub review_quizzes: Vec<QuizExport>,

    /// Every material shown, in session order.
    pub materials: Vec<LearningMaterial>,

    /// The complete trace log of the session.
    pub trace_log: Vec<TraceEntry>,
}

/// Clamps a deserialized mastery score to the session bound.
fn clamp_mastery<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = u8::deserialize(deserializer)?;
    Ok(value.min(guru_session::MASTERY_MAX))
}

impl SessionExport {
    /// Builds the artifact from live session state.
    ///
    /// Quiz attempts and materials are split out of the interleaved history
    /// with their original order preserved within each list.
    #[must_use]
    pub fn from_session(session: &Session, trace: &TraceLog) -> Self {
        let mut review_quizzes = Vec::new();
        let mut materials = Vec::new();

        for event in session.history() {
            match event {
                HistoryEvent::Quiz {
                    question,
                    chosen_index,
                    correct,
                    timestamp,
                } => review_quizzes.push(QuizExport {
                    question: question.clone(),
                    chosen_index: *chosen_index,
                    correct: *correct,
                    timestamp: *timestamp,
                }),
                HistoryEvent::Content { material, .. } => materials.push(material.clone()),
            }
        }

        Self {
            topic: session.topic.clone(),
            course: session.course.clone(),
            grade: session.grade.clone(),
            mastery_score: session.mastery(),
            exported_at: Utc::now(),
            review_quizzes,
            materials,
            trace_log: trace.entries().to_vec(),
        }
    }

    /// Counts of attempted quizzes and shown materials, for summaries.
    #[must_use]
    pub fn counts(&self) -> (usize, usize) {
        (self.review_quizzes.len(), self.materials.len())
    }
}
