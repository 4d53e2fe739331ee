//! End-to-end integration tests for the tutoring session loop.
//!
//! These tests drive the orchestrator through whole sessions against a
//! scripted transport, validating the quiz/content alternation, mastery
//! accounting, trace ordering, and failure recovery across crate
//! boundaries. No network access is required.

use guru_gateway::{
    GatewayError, LanguageMode, ModelGateway, SafetyPolicy, ScriptedClient,
};
use guru_session::{AgentId, Orchestrator, Phase, SessionError, TraceStatus};

/// A well-formed quiz question reply at the given difficulty.
fn question_reply(difficulty: &str) -> String {
    format!(
        r#"{{
            "question": "What is the slope of y = 3x + 1?",
            "options": ["1", "3", "4", "x"],
            "correctIndex": 1,
            "explanation": "The coefficient of x is the slope.",
            "difficulty": "{difficulty}",
            "topic": "Linear equations"
        }}"#
    )
}

/// An adaptation reply choosing the given branch.
fn decision_reply(next_action: &str) -> String {
    format!(
        r#"{{
            "nextAction": "{next_action}",
            "reasoning": "Scripted decision",
            "suggestedFocus": "slope"
        }}"#
    )
}

fn material_reply(mode: &str) -> String {
    format!(
        r#"{{
            "title": "Understanding slope",
            "body": "The slope measures how fast y changes with x.",
            "readingLevel": "grade 9",
            "attribution": "Generated",
            "languageMode": "{mode}"
        }}"#
    )
}

const SAFE_REPLY: &str = r#"{"safe": true, "reason": null}"#;

fn scripted(replies: &[String]) -> Orchestrator<ScriptedClient> {
    let client = ScriptedClient::new();
    for reply in replies {
        client.push_reply(reply.clone());
    }
    Orchestrator::new(ModelGateway::new(client))
}

/// Scenario: a fresh session asks an easy first question.
#[tokio::test]
async fn test_fresh_session_starts_easy() {
    let mut orch = scripted(&[question_reply("easy")]);
    orch.start_session("Linear equations", "9", "CBSE Mathematics")
        .await
        .expect("start should succeed");

    assert_eq!(orch.phase(), Phase::Assessing);
    let session = orch.session().expect("session should exist");
    assert_eq!(session.mastery(), 0);

    // The outgoing prompt asked for an easy question at mastery 0.
    let prompts = orch.gateway().client().prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("easy"), "prompt: {}", prompts[0]);
}

/// Scenario: a correct answer raises mastery and, when the model says quiz,
/// shows another question.
#[tokio::test]
async fn test_correct_answer_quiz_branch() {
    let mut orch = scripted(&[
        question_reply("easy"),
        decision_reply("quiz"),
        question_reply("easy"),
    ]);
    orch.start_session("Linear equations", "9", "").await.unwrap();

    orch.submit_answer(1).await.expect("answer should succeed");

    let session = orch.session().unwrap();
    assert_eq!(session.mastery(), 20);
    assert_eq!(session.quiz_count(), 1);
    assert_eq!(session.content_count(), 0);
    assert_eq!(orch.phase(), Phase::Assessing);
    assert!(orch.current_question().is_some());
    assert!(orch.current_material().is_none());
}

/// Scenario: the content branch runs curate -> safety -> localize and lands
/// in the learning phase with code-switched material.
#[tokio::test]
async fn test_content_branch_full_pipeline() {
    let mut orch = scripted(&[
        question_reply("easy"),
        decision_reply("content"),
        material_reply("plain"),
        SAFE_REPLY.to_string(),
        material_reply("codeSwitched"),
    ]);
    orch.start_session("Linear equations", "9", "").await.unwrap();

    orch.submit_answer(0).await.expect("content branch should succeed");

    assert_eq!(orch.phase(), Phase::Learning);
    let material = orch.current_material().expect("material should be current");
    assert_eq!(material.language_mode, LanguageMode::CodeSwitched);
    assert!(orch.current_question().is_none());

    // Mastery dropped for the wrong answer but floors at zero.
    assert_eq!(orch.session().unwrap().mastery(), 0);
    assert_eq!(orch.session().unwrap().content_count(), 1);

    // All four logical agents appear in the trace.
    let agents: Vec<AgentId> = orch.trace().entries().iter().map(|e| e.agent).collect();
    for agent in [
        AgentId::Assessment,
        AgentId::Adaptation,
        AgentId::Curator,
        AgentId::Safety,
        AgentId::Language,
    ] {
        assert!(agents.contains(&agent), "missing agent {agent}");
    }
}

/// Scenario: continuing from material returns to assessment with a fresh
/// question at the committed mastery level.
#[tokio::test]
async fn test_continue_resumes_assessment() {
    let mut orch = scripted(&[
        question_reply("easy"),
        decision_reply("content"),
        material_reply("plain"),
        SAFE_REPLY.to_string(),
        material_reply("codeSwitched"),
        question_reply("easy"),
    ]);
    orch.start_session("Linear equations", "9", "").await.unwrap();
    orch.submit_answer(1).await.unwrap();
    assert_eq!(orch.phase(), Phase::Learning);

    orch.continue_from_content().await.expect("continue should succeed");

    assert_eq!(orch.phase(), Phase::Assessing);
    assert!(orch.current_question().is_some());
    assert!(orch.current_material().is_none());
}

/// Mastery walks up through the difficulty bands and the outgoing prompts
/// follow it.
#[tokio::test]
async fn test_difficulty_tracks_mastery() {
    // Four correct answers walk mastery 0 -> 20 -> 40 -> 60 -> 80, so the
    // five generation prompts request easy, easy, easy, medium, hard (the
    // 40 and 70 boundaries still count as the lower band).
    let mut replies = vec![question_reply("easy")];
    for difficulty in ["easy", "easy", "medium", "hard"] {
        replies.push(decision_reply("quiz"));
        replies.push(question_reply(difficulty));
    }
    let mut orch = scripted(&replies);
    orch.start_session("Linear equations", "9", "").await.unwrap();

    for _ in 0..4 {
        orch.submit_answer(1).await.unwrap();
    }
    assert_eq!(orch.session().unwrap().mastery(), 80);

    let prompts = orch.gateway().client().prompts();
    let requested: Vec<&str> = prompts
        .iter()
        .filter(|p| p.contains("multiple-choice"))
        .map(|p| {
            if p.contains("hard") {
                "hard"
            } else if p.contains("medium") {
                "medium"
            } else {
                "easy"
            }
        })
        .collect();
    assert_eq!(requested, vec!["easy", "easy", "easy", "medium", "hard"]);
}

/// A transport failure mid-transition leaves the screen unchanged, records
/// one system error in the trace, and clears the busy flag.
#[tokio::test]
async fn test_failure_preserves_screen_and_traces_once() {
    let client = ScriptedClient::new();
    client.push_reply(question_reply("easy"));
    client.push_failure("connection reset by peer");
    let mut orch = Orchestrator::new(ModelGateway::new(client));
    orch.start_session("Linear equations", "9", "").await.unwrap();
    let question_before = orch.current_question().cloned();

    let err = orch.submit_answer(1).await.expect_err("should fail");
    assert!(matches!(
        err,
        SessionError::Gateway(GatewayError::Transport { .. })
    ));

    // Screen unchanged; graded outcome still committed.
    assert_eq!(orch.phase(), Phase::Assessing);
    assert_eq!(orch.current_question().cloned(), question_before);
    assert_eq!(orch.session().unwrap().mastery(), 20);
    assert!(!orch.is_busy());

    let errors: Vec<_> = orch
        .trace()
        .entries()
        .iter()
        .filter(|e| e.status == TraceStatus::Error)
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].agent, AgentId::System);
}

/// Restarting mid-session discards all accumulated state.
#[tokio::test]
async fn test_restart_discards_previous_session() {
    let mut orch = scripted(&[
        question_reply("easy"),
        decision_reply("quiz"),
        question_reply("easy"),
        question_reply("easy"),
    ]);
    orch.start_session("Linear equations", "9", "").await.unwrap();
    orch.submit_answer(1).await.unwrap();
    assert_eq!(orch.session().unwrap().mastery(), 20);

    orch.start_session("Fractions", "8", "").await.unwrap();

    let session = orch.session().unwrap();
    assert_eq!(session.topic, "Fractions");
    assert_eq!(session.grade, "8");
    assert_eq!(session.mastery(), 0);
    assert!(session.history().is_empty());
    assert_eq!(orch.trace().entries()[0].agent, AgentId::System);
    assert_eq!(orch.trace().entries()[0].action, "start");
}

/// An empty safety reply resolves through the configured policy: fail-open
/// approves silently, fail-closed flags the material as unsafe.
#[tokio::test]
async fn test_safety_policy_governs_empty_verdict() {
    // Fail-closed: the empty reply becomes an unsafe verdict, which is
    // recorded as a warning; the branch still completes.
    let client = ScriptedClient::new();
    client.push_reply(question_reply("easy"));
    client.push_reply(decision_reply("content"));
    client.push_reply(material_reply("plain"));
    client.push_reply("");
    client.push_reply(material_reply("codeSwitched"));
    let gateway = ModelGateway::new(client).with_safety_policy(SafetyPolicy::FailClosed);
    let mut orch = Orchestrator::new(gateway);
    orch.start_session("Linear equations", "9", "").await.unwrap();

    orch.submit_answer(1).await.expect("branch should complete");

    assert_eq!(orch.phase(), Phase::Learning);
    let flagged = orch
        .trace()
        .entries()
        .iter()
        .find(|e| e.agent == AgentId::Safety && e.status == TraceStatus::Warning)
        .expect("fail-closed should flag the material");
    assert!(flagged.detail.contains("no response"));

    // Fail-open: the same empty reply approves without a warning.
    let client = ScriptedClient::new();
    client.push_reply(question_reply("easy"));
    client.push_reply(decision_reply("content"));
    client.push_reply(material_reply("plain"));
    client.push_reply("");
    client.push_reply(material_reply("codeSwitched"));
    let mut orch = Orchestrator::new(ModelGateway::new(client));
    orch.start_session("Linear equations", "9", "").await.unwrap();

    orch.submit_answer(1).await.expect("branch should complete");

    assert_eq!(orch.phase(), Phase::Learning);
    assert!(!orch
        .trace()
        .entries()
        .iter()
        .any(|e| e.status == TraceStatus::Warning));
}

/// Answer indexes outside the option list are rejected before any model
/// call or state change.
#[tokio::test]
async fn test_out_of_range_answer_changes_nothing() {
    let mut orch = scripted(&[question_reply("easy")]);
    orch.start_session("Linear equations", "9", "").await.unwrap();

    let err = orch.submit_answer(9).await.expect_err("should reject");
    assert!(matches!(err, SessionError::AnswerOutOfRange { .. }));

    assert_eq!(orch.session().unwrap().mastery(), 0);
    assert_eq!(orch.session().unwrap().quiz_count(), 0);
    // No extra prompt was consumed.
    assert_eq!(orch.gateway().client().remaining(), 0);
    assert_eq!(orch.gateway().client().prompts().len(), 1);
}

/// Actions invalid for the current phase are rejected without touching the
/// scripted transport.
#[tokio::test]
async fn test_phase_guards() {
    let mut orch = scripted(&[question_reply("easy")]);

    // Nothing started yet.
    assert!(matches!(
        orch.submit_answer(0).await,
        Err(SessionError::InvalidTransition { .. })
    ));
    assert!(matches!(
        orch.continue_from_content().await,
        Err(SessionError::InvalidTransition { .. })
    ));

    orch.start_session("Linear equations", "9", "").await.unwrap();

    // Assessing: continue is invalid.
    assert!(matches!(
        orch.continue_from_content().await,
        Err(SessionError::InvalidTransition { .. })
    ));
    assert_eq!(orch.phase(), Phase::Assessing);
}
