//! Integration tests for the study-pack export artifact.
//!
//! Drives a whole session through the orchestrator, exports it, and checks
//! the artifact against the external JSON contract.

use guru_gateway::{ModelGateway, ScriptedClient};
use guru_export::{json::JsonExporter, SessionExport};
use guru_session::Orchestrator;

const QUESTION: &str = r#"{
    "question": "Which fraction equals one half?",
    "options": ["1/3", "2/4", "2/3", "3/4"],
    "correctIndex": 1,
    "explanation": "2/4 reduces to 1/2.",
    "difficulty": "easy",
    "topic": "Fractions"
}"#;

const DECIDE_QUIZ: &str = r#"{
    "nextAction": "quiz",
    "reasoning": "Keep the streak going",
    "suggestedFocus": "equivalence"
}"#;

const DECIDE_CONTENT: &str = r#"{
    "nextAction": "content",
    "reasoning": "Review equivalence first",
    "suggestedFocus": "equivalent fractions"
}"#;

const MATERIAL: &str = r#"{
    "title": "Equivalent fractions",
    "body": "Two fractions are equivalent when they name the same amount.",
    "readingLevel": "grade 8",
    "attribution": "Generated",
    "languageMode": "plain"
}"#;

const MATERIAL_LOCALIZED: &str = r#"{
    "title": "Equivalent fractions",
    "body": "Equivalent fractions ka matlab hai same amount, alag naam.",
    "readingLevel": "grade 8",
    "attribution": "Generated",
    "languageMode": "codeSwitched"
}"#;

const SAFE: &str = r#"{"safe": true, "reason": null}"#;

/// Runs a session with two quiz answers and one content detour.
async fn two_quizzes_one_material() -> Orchestrator<ScriptedClient> {
    let client = ScriptedClient::new();
    for reply in [
        QUESTION,
        DECIDE_CONTENT,
        MATERIAL,
        SAFE,
        MATERIAL_LOCALIZED,
        QUESTION,
        DECIDE_QUIZ,
        QUESTION,
    ] {
        client.push_reply(reply);
    }
    let mut orch = Orchestrator::new(ModelGateway::new(client));
    orch.start_session("Fractions", "8", "CBSE Mathematics")
        .await
        .expect("start");
    orch.submit_answer(1).await.expect("first answer");
    orch.continue_from_content().await.expect("continue");
    orch.submit_answer(0).await.expect("second answer");
    orch
}

/// Scenario: a session with two attempts and one material exports two
/// review quizzes and one material.
#[tokio::test]
async fn test_export_splits_history() {
    let orch = two_quizzes_one_material().await;
    let session = orch.session().expect("session");

    let export = SessionExport::from_session(session, orch.trace());

    assert_eq!(export.review_quizzes.len(), 2);
    assert_eq!(export.materials.len(), 1);
    assert!(export.review_quizzes[0].correct);
    assert!(!export.review_quizzes[1].correct);
    assert_eq!(export.mastery_score, session.mastery());
    assert_eq!(export.trace_log.len(), orch.trace().len());
}

/// The serialized artifact exposes the stable camelCase contract.
#[tokio::test]
async fn test_export_json_contract() {
    let orch = two_quizzes_one_material().await;
    let export = SessionExport::from_session(orch.session().expect("session"), orch.trace());

    let json = JsonExporter::new(&export).generate().expect("serialize");
    let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");

    assert_eq!(value["topic"], "Fractions");
    assert_eq!(value["grade"], "8");
    assert_eq!(value["course"], "CBSE Mathematics");
    assert!(value["masteryScore"].is_u64());
    assert!(value["exportedAt"].is_string());
    assert_eq!(value["reviewQuizzes"].as_array().map(Vec::len), Some(2));
    assert_eq!(value["materials"].as_array().map(Vec::len), Some(1));
    assert!(value["traceLog"].is_array());

    // Nested records keep their wire names too.
    let quiz = &value["reviewQuizzes"][0];
    assert!(quiz["chosenIndex"].is_u64());
    assert!(quiz["question"]["correctIndex"].is_u64());
    let material = &value["materials"][0];
    assert_eq!(material["languageMode"], "codeSwitched");
}

/// Exporting mid-session is allowed; the artifact reflects state so far.
#[tokio::test]
async fn test_export_mid_session() {
    let client = ScriptedClient::new();
    client.push_reply(QUESTION);
    let mut orch = Orchestrator::new(ModelGateway::new(client));
    orch.start_session("Fractions", "8", "").await.expect("start");

    let export = SessionExport::from_session(orch.session().expect("session"), orch.trace());

    assert_eq!(export.review_quizzes.len(), 0);
    assert_eq!(export.materials.len(), 0);
    assert_eq!(export.mastery_score, 0);
    // The trace already has the session-start and question entries.
    assert!(!export.trace_log.is_empty());
}
