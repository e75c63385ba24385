//! The `quizify retry` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use quizify_core::parser;
use quizify_core::report::SessionReport;
use quizify_core::scoring::retry_quiz;

pub fn execute(quiz_path: PathBuf, report_path: PathBuf, output: Option<PathBuf>) -> Result<()> {
    let quiz = parser::load_quiz(&quiz_path)?;
    let report = SessionReport::load_json(&report_path)?;
    anyhow::ensure!(
        report.quiz.id == quiz.id,
        "report is for quiz '{}', not '{}'",
        report.quiz.id,
        quiz.id
    );

    let Some(retry) = retry_quiz(&quiz, &report.score) else {
        println!("All questions answered correctly, nothing to retry.");
        return Ok(());
    };

    let toml = parser::quiz_to_toml(&retry)?;
    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, toml)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!(
                "Created {} ({} questions): {}",
                retry.id,
                retry.questions.len(),
                path.display()
            );
        }
        None => print!("{toml}"),
    }

    Ok(())
}
