//! The tutoring session orchestrator.
//!
//! Owns all mutable session state and exposes exactly three entry points:
//! [`Orchestrator::start_session`], [`Orchestrator::submit_answer`], and
//! [`Orchestrator::continue_from_content`]. Each entry point runs its full
//! sequence of gateway calls to completion before returning; exclusive
//! `&mut self` access means no two transitions can interleave, and the
//! `busy` flag mirrors that in-flight state for the presentation layer.
//!
//! Mutations the learner has earned (mastery delta, history events) commit
//! before any fallible gateway call; mutations derived from gateway output
//! (current question/material, phase) commit only after the whole call
//! sequence succeeds. A failed transition therefore leaves the screen state
//! exactly as it was, plus one system-tagged error entry in the trace log.

use guru_gateway::{
    GenerativeClient, LanguageMode, LearningMaterial, ModelGateway, NextAction, QuizQuestion,
};

use crate::error::{Result, SessionError};
use crate::session::{Phase, Session};
use crate::trace::{AgentId, TraceEntry, TraceLog, TraceStatus};

/// Drives a tutoring session through its quiz/content loop.
///
/// Generic over the gateway's transport so tests can script replies.
#[derive(Debug)]
pub struct Orchestrator<C> {
    gateway: ModelGateway<C>,
    session: Option<Session>,
    phase: Phase,
    current_question: Option<QuizQuestion>,
    current_material: Option<LearningMaterial>,
    trace: TraceLog,
    busy: bool,
}

impl<C: GenerativeClient> Orchestrator<C> {
    /// Creates an orchestrator with no active session.
    pub fn new(gateway: ModelGateway<C>) -> Self {
        Self {
            gateway,
            session: None,
            phase: Phase::Idle,
            current_question: None,
            current_material: None,
            trace: TraceLog::new(),
            busy: false,
        }
    }

    // ========================================================================
    // Read accessors
    // ========================================================================

    /// Returns the active session, if any.
    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Returns the current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the question currently on screen, if the session is assessing.
    #[must_use]
    pub const fn current_question(&self) -> Option<&QuizQuestion> {
        self.current_question.as_ref()
    }

    /// Returns the material currently on screen, if the session is learning.
    #[must_use]
    pub const fn current_material(&self) -> Option<&LearningMaterial> {
        self.current_material.as_ref()
    }

    /// Returns the trace log for the active session.
    #[must_use]
    pub const fn trace(&self) -> &TraceLog {
        &self.trace
    }

    /// Returns `true` while a transition is in flight.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.busy
    }

    /// Returns the underlying gateway.
    pub const fn gateway(&self) -> &ModelGateway<C> {
        &self.gateway
    }

    // ========================================================================
    // Entry points
    // ========================================================================

    /// Starts a fresh session on `topic`, discarding any previous one.
    ///
    /// Resets mastery, history, and the trace log, then generates the first
    /// question. Valid in any phase, including mid-session restart.
    ///
    /// # Errors
    ///
    /// Returns a gateway error if the first question cannot be produced; the
    /// reset still happens, and the session stays idle so the caller can
    /// retry by starting again.
    pub async fn start_session(&mut self, topic: &str, grade: &str, course: &str) -> Result<()> {
        self.busy = true;
        let result = self.start_inner(topic, grade, course).await;
        self.finish(result)
    }

    /// Submits the learner's answer to the current question.
    ///
    /// Grades locally, commits the mastery delta and history event, then
    /// asks the model for the next step and runs the chosen branch (another
    /// question, or the curate/safety/localize content sequence).
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if no question is current,
    /// `AnswerOutOfRange` if `index` does not address an option, or a
    /// gateway error if any follow-up call fails. On gateway failure the
    /// graded answer stays committed but the screen does not change.
    pub async fn submit_answer(&mut self, index: usize) -> Result<()> {
        self.busy = true;
        let result = self.answer_inner(index).await;
        self.finish(result)
    }

    /// Advances from the current learning material back to assessment.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if no material is current, or a gateway
    /// error if the follow-up question cannot be produced.
    pub async fn continue_from_content(&mut self) -> Result<()> {
        self.busy = true;
        let result = self.continue_inner().await;
        self.finish(result)
    }

    // ========================================================================
    // Transition bodies
    // ========================================================================

    /// Clears the busy flag and mirrors gateway failures into the trace.
    fn finish(&mut self, result: Result<()>) -> Result<()> {
        if let Err(SessionError::Gateway(e)) = &result {
            tracing::warn!(error = %e, "Transition aborted");
            self.trace.push(TraceEntry::new(
                AgentId::System,
                "error",
                e.to_string(),
                TraceStatus::Error,
            ));
        }
        self.busy = false;
        result
    }

    async fn start_inner(&mut self, topic: &str, grade: &str, course: &str) -> Result<()> {
        tracing::info!(topic, grade, "Starting session");

        // Reset happens unconditionally; the first question is fallible.
        self.session = Some(Session::new(topic, grade, course));
        self.phase = Phase::Idle;
        self.current_question = None;
        self.current_material = None;
        self.trace.clear();
        self.trace.push(TraceEntry::new(
            AgentId::System,
            "start",
            format!("Session started on {topic}"),
            TraceStatus::Done,
        ));

        let question = self.fetch_question().await?;
        self.current_question = Some(question);
        self.phase = Phase::Assessing;
        Ok(())
    }

    async fn answer_inner(&mut self, index: usize) -> Result<()> {
        if !self.phase.is_assessing() {
            return Err(SessionError::invalid_transition(
                "submit an answer",
                self.phase,
            ));
        }
        let question = self
            .current_question
            .clone()
            .ok_or(SessionError::invalid_transition(
                "submit an answer",
                self.phase,
            ))?;
        if index >= question.options.len() {
            return Err(SessionError::answer_out_of_range(
                index,
                question.options.len(),
            ));
        }

        let correct = index == question.correct_index;

        // The graded outcome commits before any gateway call so a later
        // failure cannot lose it.
        let (mastery, topic) = match self.session.as_mut() {
            Some(session) => {
                let mastery = session.apply_answer(correct);
                session.record_quiz(question, index, correct);
                (mastery, session.topic.clone())
            }
            None => {
                return Err(SessionError::invalid_transition(
                    "submit an answer",
                    self.phase,
                ))
            }
        };
        tracing::info!(correct, mastery, "Answer graded");
        self.trace.push(TraceEntry::new(
            AgentId::Assessment,
            "graded",
            if correct {
                format!("Correct; mastery now {mastery}")
            } else {
                format!("Incorrect; mastery now {mastery}")
            },
            TraceStatus::Done,
        ));

        self.trace.push(TraceEntry::new(
            AgentId::Adaptation,
            "deciding",
            format!("Choosing next step at mastery {mastery}"),
            TraceStatus::Working,
        ));
        let decision = self.gateway.decide_next_step(correct, mastery, &topic).await?;
        self.trace.push(TraceEntry::new(
            AgentId::Adaptation,
            "decision",
            format!("{}: {}", decision.next_action, decision.reasoning),
            TraceStatus::Done,
        ));

        match decision.next_action {
            NextAction::Quiz => {
                let question = self.fetch_question().await?;
                self.current_question = Some(question);
                self.current_material = None;
                self.phase = Phase::Assessing;
            }
            NextAction::Content => {
                self.learn_inner(&decision.suggested_focus).await?;
            }
        }
        Ok(())
    }

    async fn continue_inner(&mut self) -> Result<()> {
        if !self.phase.is_learning() || self.current_material.is_none() {
            return Err(SessionError::invalid_transition(
                "continue from content",
                self.phase,
            ));
        }

        let question = self.fetch_question().await?;
        self.current_question = Some(question);
        self.current_material = None;
        self.phase = Phase::Assessing;
        Ok(())
    }

    // ========================================================================
    // Gateway sequences
    // ========================================================================

    /// Generates a question for the active session at its current mastery.
    ///
    /// Does not touch screen state; callers commit the result themselves.
    async fn fetch_question(&mut self) -> Result<QuizQuestion> {
        let (topic, grade, course, mastery) = match self.session.as_ref() {
            Some(session) => (
                session.topic.clone(),
                session.grade.clone(),
                session.course.clone(),
                session.mastery(),
            ),
            None => {
                return Err(SessionError::invalid_transition(
                    "generate a question",
                    self.phase,
                ))
            }
        };

        self.trace.push(TraceEntry::new(
            AgentId::Assessment,
            "generating",
            format!("Generating question on {topic} at mastery {mastery}"),
            TraceStatus::Working,
        ));
        let question = self
            .gateway
            .generate_question(&topic, &grade, mastery, non_empty(&course))
            .await?;
        self.trace.push(TraceEntry::new(
            AgentId::Assessment,
            "ready",
            format!("{} question ready", question.difficulty),
            TraceStatus::Done,
        ));
        Ok(question)
    }

    /// Runs the curate -> safety -> localize sequence and commits the result.
    ///
    /// An unsafe verdict is recorded as a warning but does not block; only a
    /// failed call aborts the sequence, leaving screen state untouched.
    async fn learn_inner(&mut self, focus: &str) -> Result<()> {
        let (topic, grade, course) = match self.session.as_ref() {
            Some(session) => (
                session.topic.clone(),
                session.grade.clone(),
                session.course.clone(),
            ),
            None => {
                return Err(SessionError::invalid_transition(
                    "fetch learning material",
                    self.phase,
                ))
            }
        };

        self.trace.push(TraceEntry::new(
            AgentId::Curator,
            "searching",
            format!("Curating material on {focus}"),
            TraceStatus::Working,
        ));
        let material = self
            .gateway
            .curate_material(&topic, &grade, focus, non_empty(&course))
            .await?;
        self.trace.push(TraceEntry::new(
            AgentId::Curator,
            "found",
            material.title.clone(),
            TraceStatus::Done,
        ));

        self.trace.push(TraceEntry::new(
            AgentId::Safety,
            "checking",
            "Reviewing material for safety and relevance",
            TraceStatus::Working,
        ));
        let verdict = self.gateway.check_safety(&material.body).await?;
        if verdict.safe {
            self.trace.push(TraceEntry::new(
                AgentId::Safety,
                "passed",
                "Material approved",
                TraceStatus::Done,
            ));
        } else {
            let reason = verdict
                .reason
                .unwrap_or_else(|| "no reason given".to_string());
            tracing::warn!(reason = %reason, "Material flagged by safety check");
            self.trace.push(TraceEntry::new(
                AgentId::Safety,
                "flagged",
                reason,
                TraceStatus::Warning,
            ));
        }

        self.trace.push(TraceEntry::new(
            AgentId::Language,
            "localizing",
            "Rewriting into the code-switched register",
            TraceStatus::Working,
        ));
        let localized = self
            .gateway
            .localize_material(&material, LanguageMode::CodeSwitched)
            .await?;
        self.trace.push(TraceEntry::new(
            AgentId::Language,
            "ready",
            localized.title.clone(),
            TraceStatus::Done,
        ));

        // Whole sequence succeeded; commit.
        if let Some(session) = self.session.as_mut() {
            session.record_content(localized.clone());
        }
        self.current_material = Some(localized);
        self.current_question = None;
        self.phase = Phase::Learning;
        Ok(())
    }
}

/// Maps an empty course string to `None` for the gateway's optional context.
fn non_empty(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}
