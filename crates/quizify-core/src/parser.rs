//! Quiz file parser.
//!
//! Loads quizzes from TOML files, imports the JSON shape produced by the
//! text-to-quiz service, reads answer sheets, and validates quizzes.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::{Question, Quiz, QuizOption, QuizSession};
use crate::segment::{self, ScanOutcome};

/// Intermediate TOML structure for parsing quiz files.
#[derive(Debug, Deserialize, Serialize)]
struct TomlQuizFile {
    quiz: TomlQuizHeader,
    #[serde(default)]
    questions: Vec<RawQuestion>,
}

#[derive(Debug, Deserialize, Serialize)]
struct TomlQuizHeader {
    id: String,
    title: String,
}

/// A question as written by hand or emitted by the text-to-quiz service.
#[derive(Debug, Deserialize, Serialize)]
struct RawQuestion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    question: String,
    #[serde(default)]
    options: Vec<RawOption>,
}

#[derive(Debug, Deserialize, Serialize)]
struct RawOption {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    option: String,
    #[serde(default)]
    is_correct: bool,
}

/// Top-level JSON document returned by the text-to-quiz service.
#[derive(Debug, Deserialize)]
struct JsonQuiz {
    title: String,
    #[serde(default)]
    questions: Vec<RawQuestion>,
}

/// Fill in positional ids: question `q{n}`, option `q{n}.{m}`, both 1-based.
fn build_questions(raw: Vec<RawQuestion>) -> Vec<Question> {
    raw.into_iter()
        .enumerate()
        .map(|(qi, q)| {
            let question_id = q.id.unwrap_or_else(|| format!("q{}", qi + 1));
            let options = q
                .options
                .into_iter()
                .enumerate()
                .map(|(oi, o)| QuizOption {
                    id: o.id.unwrap_or_else(|| format!("{question_id}.{}", oi + 1)),
                    option: o.option,
                    is_correct: o.is_correct,
                })
                .collect();
            Question {
                id: question_id,
                question: q.question,
                options,
            }
        })
        .collect()
}

/// Parse a single TOML file into a `Quiz`.
pub fn parse_quiz(path: &Path) -> Result<Quiz> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read quiz file: {}", path.display()))?;

    parse_quiz_str(&content, path)
}

/// Parse a TOML string into a `Quiz` (useful for testing).
pub fn parse_quiz_str(content: &str, source_path: &Path) -> Result<Quiz> {
    let parsed: TomlQuizFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    Ok(Quiz {
        id: parsed.quiz.id,
        title: parsed.quiz.title,
        questions: build_questions(parsed.questions),
    })
}

/// Serialize a quiz in the TOML quiz file layout, ids included.
pub fn quiz_to_toml(quiz: &Quiz) -> Result<String> {
    let file = TomlQuizFile {
        quiz: TomlQuizHeader {
            id: quiz.id.clone(),
            title: quiz.title.clone(),
        },
        questions: quiz
            .questions
            .iter()
            .map(|q| RawQuestion {
                id: Some(q.id.clone()),
                question: q.question.clone(),
                options: q
                    .options
                    .iter()
                    .map(|o| RawOption {
                        id: Some(o.id.clone()),
                        option: o.option.clone(),
                        is_correct: o.is_correct,
                    })
                    .collect(),
            })
            .collect(),
    };
    toml::to_string_pretty(&file).with_context(|| format!("failed to serialize quiz {}", quiz.id))
}

/// Import a quiz from the JSON returned by the text-to-quiz service.
///
/// The document carries no id, so `id` is supplied by the caller.
pub fn import_json_quiz_str(content: &str, id: &str) -> Result<Quiz> {
    let parsed: JsonQuiz =
        serde_json::from_str(content).context("failed to parse quiz JSON")?;

    Ok(Quiz {
        id: id.to_string(),
        title: parsed.title,
        questions: build_questions(parsed.questions),
    })
}

/// Load a quiz from `.toml` or `.json`, picked by extension.
///
/// JSON quizzes take their id from the file stem.
pub fn load_quiz(path: &Path) -> Result<Quiz> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read quiz file: {}", path.display()))?;
            let id = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("quiz");
            import_json_quiz_str(&content, id)
                .with_context(|| format!("failed to import {}", path.display()))
        }
        _ => parse_quiz(path),
    }
}

/// Recursively list `.toml` and `.json` files under `dir`, sorted by path.
pub fn quiz_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            files.extend(quiz_files(&path)?);
        } else if path
            .extension()
            .is_some_and(|ext| ext == "toml" || ext == "json")
        {
            files.push(path);
        }
    }

    Ok(files)
}

/// Recursively load all `.toml` and `.json` quiz files from a directory.
///
/// Files that fail to parse are logged and skipped.
pub fn load_quiz_directory(dir: &Path) -> Result<Vec<Quiz>> {
    let mut quizzes = Vec::new();

    for path in quiz_files(dir)? {
        match load_quiz(&path) {
            Ok(quiz) => quizzes.push(quiz),
            Err(e) => {
                tracing::warn!("skipping {}: {:#}", path.display(), e);
            }
        }
    }

    Ok(quizzes)
}

/// Answer sheet layout: the quiz id and, per question, the ticked option ids.
#[derive(Debug, Deserialize)]
struct TomlAnswerSheet {
    quiz_id: String,
    #[serde(default)]
    answers: BTreeMap<String, Vec<String>>,
}

/// Parse an answer sheet file into a new `QuizSession`.
pub fn parse_answer_sheet(path: &Path) -> Result<QuizSession> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read answer sheet: {}", path.display()))?;

    parse_answer_sheet_str(&content, path)
}

/// Parse an answer sheet from a TOML string.
pub fn parse_answer_sheet_str(content: &str, source_path: &Path) -> Result<QuizSession> {
    let sheet: TomlAnswerSheet = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let mut session = QuizSession::new(sheet.quiz_id);
    for (question_id, option_ids) in sheet.answers {
        for option_id in option_ids {
            session.select(question_id.as_str(), option_id);
        }
    }
    Ok(session)
}

/// A warning from quiz validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn quiz(message: impl Into<String>) -> Self {
        Self {
            question_id: None,
            message: message.into(),
        }
    }

    fn question(question: &Question, message: impl Into<String>) -> Self {
        Self {
            question_id: Some(question.id.clone()),
            message: message.into(),
        }
    }
}

/// Validate a quiz for common authoring mistakes.
pub fn validate_quiz(quiz: &Quiz) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if quiz.title.trim().is_empty() {
        warnings.push(ValidationWarning::quiz("title is empty"));
    }
    if let Some(kind) = unterminated_math(&quiz.title) {
        warnings.push(ValidationWarning::quiz(format!(
            "title has an unterminated {kind} math delimiter"
        )));
    }
    if quiz.questions.is_empty() {
        warnings.push(ValidationWarning::quiz("quiz has no questions"));
    }

    // Check for duplicate question IDs
    let mut seen_ids = HashSet::new();
    for question in &quiz.questions {
        if !seen_ids.insert(&question.id) {
            warnings.push(ValidationWarning::question(
                question,
                format!("duplicate question ID: {}", question.id),
            ));
        }
    }

    for question in &quiz.questions {
        if question.question.trim().is_empty() {
            warnings.push(ValidationWarning::question(question, "question text is empty"));
        }
        if let Some(kind) = unterminated_math(&question.question) {
            warnings.push(ValidationWarning::question(
                question,
                format!("question text has an unterminated {kind} math delimiter"),
            ));
        }

        if question.options.is_empty() {
            warnings.push(ValidationWarning::question(question, "question has no options"));
            continue;
        }
        if !question.options.iter().any(|o| o.is_correct) {
            warnings.push(ValidationWarning::question(
                question,
                "no option is marked correct",
            ));
        }

        let mut seen_options = HashSet::new();
        for option in &question.options {
            if !seen_options.insert(&option.id) {
                warnings.push(ValidationWarning::question(
                    question,
                    format!("duplicate option ID: {}", option.id),
                ));
            }
            if option.option.trim().is_empty() {
                warnings.push(ValidationWarning::question(
                    question,
                    format!("option {} is empty", option.id),
                ));
            }
            if let Some(kind) = unterminated_math(&option.option) {
                warnings.push(ValidationWarning::question(
                    question,
                    format!("option {} has an unterminated {kind} math delimiter", option.id),
                ));
            }
        }
    }

    warnings
}

/// `Some("inline")` or `Some("display")` when `text` leaves math open.
fn unterminated_math(text: &str) -> Option<&'static str> {
    match segment::scan(text).outcome {
        ScanOutcome::Complete => None,
        ScanOutcome::Unterminated { display: true } => Some("display"),
        ScanOutcome::Unterminated { display: false } => Some("inline"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const VALID_TOML: &str = r#"
[quiz]
id = "algebra"
title = "Algebra $\\mathbb{R}$"

[[questions]]
question = "Solve $x + 1 = 3$"

[[questions.options]]
option = "$x = 2$"
is_correct = true

[[questions.options]]
option = "$x = 4$"

[[questions]]
id = "cost"
question = "A pen costs $2 and a book $10. Total?"

[[questions.options]]
id = "twelve"
option = "$12"
is_correct = true

[[questions.options]]
option = "$20"
"#;

    #[test]
    fn quiz_to_toml_keeps_ids() {
        let quiz = parse_quiz_str(VALID_TOML, &PathBuf::from("test.toml")).unwrap();
        let written = quiz_to_toml(&quiz).unwrap();
        assert!(written.contains("id = \"q1.1\""));

        let reparsed = parse_quiz_str(&written, &PathBuf::from("written.toml")).unwrap();
        assert_eq!(reparsed, quiz);
    }

    #[test]
    fn parse_valid_toml() {
        let quiz = parse_quiz_str(VALID_TOML, &PathBuf::from("test.toml")).unwrap();
        assert_eq!(quiz.id, "algebra");
        assert_eq!(quiz.title, "Algebra $\\mathbb{R}$");
        assert_eq!(quiz.questions.len(), 2);
        assert_eq!(quiz.questions[0].id, "q1");
        assert_eq!(quiz.questions[0].options[0].id, "q1.1");
        assert!(quiz.questions[0].options[0].is_correct);
        assert!(!quiz.questions[0].options[1].is_correct);
    }

    #[test]
    fn explicit_ids_are_kept() {
        let quiz = parse_quiz_str(VALID_TOML, &PathBuf::from("test.toml")).unwrap();
        let cost = quiz.question("cost").unwrap();
        assert_eq!(cost.options[0].id, "twelve");
        assert_eq!(cost.options[1].id, "cost.2");
    }

    #[test]
    fn valid_quiz_has_no_warnings() {
        let quiz = parse_quiz_str(VALID_TOML, &PathBuf::from("test.toml")).unwrap();
        let warnings = validate_quiz(&quiz);
        assert!(warnings.is_empty(), "{warnings:?}");
    }

    #[test]
    fn parse_malformed_toml() {
        let bad = "this is not [valid toml }{";
        let result = parse_quiz_str(bad, &PathBuf::from("bad.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn import_service_json() {
        let json = r#"{
            "title": "Capitals",
            "questions": [
                {
                    "question": "Capital of France?",
                    "options": [
                        { "option": "Paris", "is_correct": true },
                        { "option": "Lyon", "is_correct": false }
                    ]
                }
            ]
        }"#;
        let quiz = import_json_quiz_str(json, "capitals").unwrap();
        assert_eq!(quiz.id, "capitals");
        assert_eq!(quiz.questions[0].options[1].id, "q1.2");
        assert!(validate_quiz(&quiz).is_empty());
    }

    #[test]
    fn import_rejects_invalid_json() {
        assert!(import_json_quiz_str("{\"questions\": []}", "x").is_err());
    }

    #[test]
    fn validate_duplicate_ids() {
        let toml = r#"
[quiz]
id = "dupes"
title = "Dupes"

[[questions]]
id = "same"
question = "First"
options = [{ option = "a", is_correct = true }]

[[questions]]
id = "same"
question = "Second"
options = [{ id = "x", option = "a", is_correct = true }, { id = "x", option = "b" }]
"#;
        let quiz = parse_quiz_str(toml, &PathBuf::from("test.toml")).unwrap();
        let warnings = validate_quiz(&quiz);
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("duplicate question ID")));
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("duplicate option ID")));
    }

    #[test]
    fn validate_missing_options_and_correct_answers() {
        let toml = r#"
[quiz]
id = "gaps"
title = "Gaps"

[[questions]]
question = "No options"

[[questions]]
question = "Nothing correct"
options = [{ option = "a" }, { option = "b" }]
"#;
        let quiz = parse_quiz_str(toml, &PathBuf::from("test.toml")).unwrap();
        let warnings = validate_quiz(&quiz);
        assert!(warnings
            .iter()
            .any(|w| w.question_id.as_deref() == Some("q1") && w.message.contains("no options")));
        assert!(warnings
            .iter()
            .any(|w| w.question_id.as_deref() == Some("q2") && w.message.contains("marked correct")));
    }

    #[test]
    fn validate_unterminated_math() {
        let toml = r#"
[quiz]
id = "math"
title = "Open $$block"

[[questions]]
question = "Is $x open?"
options = [{ option = "yes $y", is_correct = true }]
"#;
        let quiz = parse_quiz_str(toml, &PathBuf::from("test.toml")).unwrap();
        let warnings = validate_quiz(&quiz);
        assert!(warnings
            .iter()
            .any(|w| w.question_id.is_none() && w.message.contains("unterminated display")));
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("question text has an unterminated inline")));
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("option q1.1 has an unterminated")));
    }

    #[test]
    fn answer_sheet_becomes_session() {
        let toml = r#"
quiz_id = "algebra"

[answers]
q1 = ["q1.1"]
cost = ["twelve", "cost.2"]
"#;
        let session = parse_answer_sheet_str(toml, &PathBuf::from("answers.toml")).unwrap();
        assert_eq!(session.quiz_id, "algebra");
        assert_eq!(session.selected_options.len(), 3);
        assert_eq!(session.selected_by_question()["cost"].len(), 2);
    }

    #[test]
    fn load_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("algebra.toml"), VALID_TOML).unwrap();
        std::fs::write(
            dir.path().join("capitals.json"),
            r#"{"title": "Capitals", "questions": []}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("broken.toml"), "not = [valid").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let quizzes = load_quiz_directory(dir.path()).unwrap();
        let ids: Vec<&str> = quizzes.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["algebra", "capitals"]);
    }

    #[test]
    fn quiz_files_lists_broken_files_too() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested/b.json"), "{}").unwrap();
        std::fs::write(dir.path().join("a.toml"), "not = [valid").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let files = quiz_files(dir.path()).unwrap();
        assert_eq!(
            files,
            vec![dir.path().join("a.toml"), dir.path().join("nested/b.json")]
        );
    }

    #[test]
    fn load_directory_rejects_files() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("quiz.toml");
        std::fs::write(&file, VALID_TOML).unwrap();
        assert!(load_quiz_directory(&file).is_err());
    }
}
