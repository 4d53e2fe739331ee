//! Trace log types for orchestration observability.
//!
//! Every external call the orchestrator makes is mirrored by trace entries
//! tagged with the logical agent responsible for the step. The log is
//! append-only and unbounded for the session's lifetime; it is cleared only
//! when a new session starts, and entries are never reordered.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// AgentId
// ============================================================================

/// Logical agent responsible for an orchestration step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentId {
    /// Generates and grades quiz questions.
    Assessment,
    /// Chooses the pedagogical next step.
    Adaptation,
    /// Fetches reading passages.
    Curator,
    /// Rewrites passages into the code-switched register.
    Language,
    /// Judges content safety/relevance.
    Safety,
    /// The orchestrator itself (errors, lifecycle).
    System,
}

impl AgentId {
    /// Returns the wire representation of this agent.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Assessment => "assessment",
            Self::Adaptation => "adaptation",
            Self::Curator => "curator",
            Self::Language => "language",
            Self::Safety => "safety",
            Self::System => "system",
        }
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// TraceStatus
// ============================================================================

/// Outcome tag on a trace entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceStatus {
    /// The step is in flight.
    Working,
    /// The step completed normally.
    Done,
    /// The step completed but flagged something (e.g. an unsafe verdict).
    Warning,
    /// The step failed.
    Error,
}

impl std::fmt::Display for TraceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Working => "working",
            Self::Done => "done",
            Self::Warning => "warning",
            Self::Error => "error",
        };
        f.write_str(s)
    }
}

// ============================================================================
// TraceEntry
// ============================================================================

/// One orchestration step, recorded for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceEntry {
    /// The logical agent responsible for the step.
    pub agent: AgentId,

    /// Short action label (e.g. "generating", "decision").
    pub action: String,

    /// Free-text detail for display.
    pub detail: String,

    /// Outcome tag.
    pub status: TraceStatus,

    /// When the entry was recorded.
    pub timestamp: DateTime<Utc>,
}

impl TraceEntry {
    /// Creates an entry stamped with the current time.
    #[must_use]
    pub fn new(
        agent: AgentId,
        action: impl Into<String>,
        detail: impl Into<String>,
        status: TraceStatus,
    ) -> Self {
        Self {
            agent,
            action: action.into(),
            detail: detail.into(),
            status,
            timestamp: Utc::now(),
        }
    }
}

// ============================================================================
// TraceLog
// ============================================================================

/// Append-only, ordered log of orchestration steps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraceLog(Vec<TraceEntry>);

impl TraceLog {
    /// Creates an empty log.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends an entry. Entries are never removed or reordered afterwards.
    pub fn push(&mut self, entry: TraceEntry) {
        self.0.push(entry);
    }

    /// Returns all entries in append order.
    #[must_use]
    pub fn entries(&self) -> &[TraceEntry] {
        &self.0
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the log has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Clears the log. Used only when a new session starts.
    pub(crate) fn clear(&mut self) {
        self.0.clear();
    }
}
