//! Prompt construction for each gateway operation.
//!
//! Every prompt pairs a natural-language instruction with a strict output
//! shape so the reply parses into the corresponding type in
//! [`crate::types`]. Wording is a contract with the model provider, not a
//! design invariant; the shapes are what the parser enforces.

use crate::types::{Difficulty, LanguageMode, LearningMaterial, OPTION_COUNT};

/// Approximate word bound requested for curated passages.
pub(crate) const PASSAGE_WORD_LIMIT: usize = 200;

/// Maximum characters of content forwarded to the safety check.
///
/// Only a relevance/safety judgment is needed, so a bounded prefix is
/// enough; this also keeps request sizes predictable.
pub(crate) const SAFETY_PREFIX_CHARS: usize = 1500;

/// Appends the course context line when one is present.
fn push_course_context(prompt: &mut String, course: Option<&str>) {
    if let Some(course) = course {
        prompt.push_str(&format!("Course context: {course}.\n"));
    }
}

/// Builds the quiz-generation prompt.
pub(crate) fn question_prompt(
    topic: &str,
    grade: &str,
    difficulty: Difficulty,
    course: Option<&str>,
) -> String {
    let mut prompt = format!(
        "Write one {difficulty} multiple-choice question on \"{topic}\" \
         for a grade {grade} learner.\n"
    );
    push_course_context(&mut prompt, course);
    prompt.push_str(&format!(
        "Respond with JSON only, in this exact shape:\n\
         {{\"question\": string, \"options\": [string x{OPTION_COUNT}], \
         \"correctIndex\": integer 0-{}, \"explanation\": string, \
         \"difficulty\": \"{difficulty}\", \"topic\": \"{topic}\"}}",
        OPTION_COUNT - 1
    ));
    prompt
}

/// Builds the adaptation-decision prompt.
///
/// The choice between another quiz and a content detour is deliberately
/// left to the model; the prompt only supplies the two inputs it needs.
pub(crate) fn next_step_prompt(last_correct: bool, mastery: u8, topic: &str) -> String {
    let outcome = if last_correct { "correctly" } else { "incorrectly" };
    format!(
        "A learner studying \"{topic}\" just answered a quiz question {outcome}. \
         Their current mastery score is {mastery} out of 100.\n\
         Decide whether they should attempt another quiz question or take a \
         short reading detour first.\n\
         Respond with JSON only, in this exact shape:\n\
         {{\"nextAction\": \"quiz\" or \"content\", \"reasoning\": string, \
         \"suggestedFocus\": string}}"
    )
}

/// Builds the content-curation prompt.
pub(crate) fn material_prompt(
    topic: &str,
    grade: &str,
    focus: &str,
    course: Option<&str>,
) -> String {
    let mut prompt = format!(
        "Write a short reading passage (at most {PASSAGE_WORD_LIMIT} words) on \
         \"{topic}\" for a grade {grade} learner, focused on: {focus}.\n"
    );
    push_course_context(&mut prompt, course);
    prompt.push_str(
        "Respond with JSON only, in this exact shape:\n\
         {\"title\": string, \"body\": string, \"readingLevel\": string, \
         \"attribution\": string, \"languageMode\": \"plain\"}",
    );
    prompt
}

/// Builds the localization prompt for an existing material.
pub(crate) fn localize_prompt(material: &LearningMaterial, target: LanguageMode) -> String {
    format!(
        "Rewrite the following passage in a {target} register, mixing the \
         learner's everyday spoken language with English while keeping the \
         meaning intact.\n\
         Title: {title}\n\
         Body: {body}\n\
         Respond with JSON only, in this exact shape:\n\
         {{\"title\": string, \"body\": string, \"readingLevel\": string, \
         \"attribution\": string, \"languageMode\": \"{target}\"}}",
        title = material.title,
        body = material.body,
    )
}

/// Builds the safety-check prompt over a bounded content prefix.
pub(crate) fn safety_prompt(content: &str) -> String {
    let prefix: String = content.chars().take(SAFETY_PREFIX_CHARS).collect();
    format!(
        "Judge whether the following passage is safe and appropriate for a \
         school-age learner.\n\
         Passage:\n{prefix}\n\
         Respond with JSON only, in this exact shape:\n\
         {{\"safe\": boolean, \"reason\": string (only when unsafe)}}"
    )
}
