//! The `quizify validate` command.

use std::path::PathBuf;

use anyhow::Result;

use quizify_core::model::Quiz;
use quizify_core::parser;

pub fn execute(quiz_path: PathBuf) -> Result<()> {
    let mut quizzes: Vec<Quiz> = Vec::new();
    let mut failures = 0;

    if quiz_path.is_dir() {
        for path in parser::quiz_files(&quiz_path)? {
            match parser::load_quiz(&path) {
                Ok(quiz) => quizzes.push(quiz),
                Err(e) => {
                    eprintln!("  ERROR: {}: {e:#}", path.display());
                    failures += 1;
                }
            }
        }
    } else {
        quizzes.push(parser::load_quiz(&quiz_path)?);
    }

    let mut total_warnings = 0;

    for quiz in &quizzes {
        println!("Quiz: {} ({} questions)", quiz.title, quiz.questions.len());

        let warnings = parser::validate_quiz(quiz);
        for w in &warnings {
            let prefix = w
                .question_id
                .as_ref()
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if failures > 0 {
        anyhow::bail!("{failures} quiz file(s) failed to parse");
    }

    if total_warnings == 0 {
        println!("All quizzes valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
