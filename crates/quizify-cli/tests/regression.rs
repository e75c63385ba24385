//! Progress tracking integration tests.
//!
//! Grades real answer sheets, persists the reports as JSON and checks the
//! comparison workflow, both through the library and the `compare` command.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;

use quizify_core::model::{Quiz, QuizSession};
use quizify_core::parser;
use quizify_core::report::SessionReport;

fn quizify() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("quizify").unwrap()
}

fn algebra() -> Quiz {
    parser::load_quiz(Path::new("../../quizzes/algebra.toml")).unwrap()
}

fn session(answers: &[(&str, &[&str])]) -> QuizSession {
    let mut session = QuizSession::new("algebra");
    for (question, options) in answers {
        for option in *options {
            session.select(*question, *option);
        }
    }
    session
}

fn save(report: &SessionReport, dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    report.save_json(&path).unwrap();
    path
}

#[test]
fn detect_regression_when_answer_changes() {
    let quiz = algebra();
    let baseline = SessionReport::grade(
        &quiz,
        &session(&[("linear", &["a"]), ("budget", &["a"])]),
    )
    .unwrap();
    let current = SessionReport::grade(
        &quiz,
        &session(&[("linear", &["b"]), ("budget", &["a"])]),
    )
    .unwrap();

    let progress = current.compare(&baseline);

    assert!(progress.has_regressions());
    assert_eq!(progress.regressions, vec!["linear"]);
    assert!(progress.current_score < progress.baseline_score);
}

#[test]
fn partial_selection_is_not_an_improvement() {
    let quiz = algebra();
    let baseline = SessionReport::grade(&quiz, &session(&[])).unwrap();
    let current = SessionReport::grade(&quiz, &session(&[("roots", &["a"])])).unwrap();

    let progress = current.compare(&baseline);

    assert!(progress.improvements.is_empty());
    assert_eq!(progress.unchanged, 4);
}

#[test]
fn detect_improvement() {
    let quiz = algebra();
    let baseline = SessionReport::grade(&quiz, &session(&[("roots", &["a"])])).unwrap();
    let current = SessionReport::grade(&quiz, &session(&[("roots", &["a", "b"])])).unwrap();

    let progress = current.compare(&baseline);

    assert!(!progress.has_regressions());
    assert_eq!(progress.improvements, vec!["roots"]);
}

#[test]
fn json_roundtrip_preserves_outcomes() {
    let quiz = algebra();
    let report = SessionReport::grade(
        &quiz,
        &session(&[("linear", &["a"]), ("escaped", &["b"])]),
    )
    .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = save(&report, dir.path(), "session.json");
    let loaded = SessionReport::load_json(&path).unwrap();

    assert_eq!(loaded.quiz.id, "algebra");
    assert_eq!(loaded.session_id, report.session_id);
    assert_eq!(loaded.score, report.score);
    assert_eq!(loaded.score.outcome("escaped").unwrap().selected, vec!["b"]);
}

#[test]
fn compare_command_text_output() {
    let quiz = algebra();
    let dir = tempfile::tempdir().unwrap();
    let baseline = save(
        &SessionReport::grade(&quiz, &session(&[("linear", &["a"])])).unwrap(),
        dir.path(),
        "baseline.json",
    );
    let current = save(
        &SessionReport::grade(&quiz, &session(&[("budget", &["a"])])).unwrap(),
        dir.path(),
        "current.json",
    );

    quizify()
        .arg("compare")
        .arg("--baseline")
        .arg(&baseline)
        .arg("--current")
        .arg(&current)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 regressions, 1 improvements, 2 unchanged"))
        .stdout(predicate::str::contains("Now incorrect:\n  linear"))
        .stdout(predicate::str::contains("Now correct:\n  budget"));
}

#[test]
fn compare_command_fails_on_regression() {
    let quiz = algebra();
    let dir = tempfile::tempdir().unwrap();
    let baseline = save(
        &SessionReport::grade(&quiz, &session(&[("linear", &["a"])])).unwrap(),
        dir.path(),
        "baseline.json",
    );
    let current = save(
        &SessionReport::grade(&quiz, &session(&[])).unwrap(),
        dir.path(),
        "current.json",
    );

    quizify()
        .arg("compare")
        .arg("--baseline")
        .arg(&baseline)
        .arg("--current")
        .arg(&current)
        .arg("--fail-on-regression")
        .assert()
        .failure();

    // Same reports the other way round only improve.
    quizify()
        .arg("compare")
        .arg("--baseline")
        .arg(&current)
        .arg("--current")
        .arg(&baseline)
        .arg("--fail-on-regression")
        .assert()
        .success();
}

#[test]
fn compare_command_markdown_and_json() {
    let quiz = algebra();
    let dir = tempfile::tempdir().unwrap();
    let baseline = save(
        &SessionReport::grade(&quiz, &session(&[])).unwrap(),
        dir.path(),
        "baseline.json",
    );
    let current = save(
        &SessionReport::grade(&quiz, &session(&[("escaped", &["a"])])).unwrap(),
        dir.path(),
        "current.json",
    );

    quizify()
        .args(["compare", "--format", "markdown", "--baseline"])
        .arg(&baseline)
        .arg("--current")
        .arg(&current)
        .assert()
        .success()
        .stdout(predicate::str::contains("### Now correct"))
        .stdout(predicate::str::contains("- escaped"));

    let output = quizify()
        .args(["compare", "--format", "json", "--baseline"])
        .arg(&baseline)
        .arg("--current")
        .arg(&current)
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["improvements"][0], "escaped");
    assert_eq!(json["current_score"], 0.25);
}
