//! The `quizify render` command.

use std::path::PathBuf;

use anyhow::Result;

use quizify_core::parser;
use quizify_core::report::SessionReport;
use quizify_report::config::{create_math_renderer, load_config_from};
use quizify_report::html::{write_quiz_html, write_session_html};

pub fn execute(
    quiz_path: PathBuf,
    report_path: Option<PathBuf>,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let renderer = create_math_renderer(&config)?;
    tracing::debug!(renderer = renderer.name(), "rendering HTML");

    let quiz = parser::load_quiz(&quiz_path)?;

    match report_path {
        Some(report_path) => {
            let report = SessionReport::load_json(&report_path)?;
            anyhow::ensure!(
                report.quiz.id == quiz.id,
                "report is for quiz '{}', not '{}'",
                report.quiz.id,
                quiz.id
            );
            let path = output
                .unwrap_or_else(|| config.output_dir.join(format!("{}-results.html", quiz.id)));
            write_session_html(&quiz, &report, renderer.as_ref(), &path)?;
            println!("Result page: {}", path.display());
        }
        None => {
            let path = output.unwrap_or_else(|| config.output_dir.join(format!("{}.html", quiz.id)));
            write_quiz_html(&quiz, renderer.as_ref(), &path)?;
            println!("Quiz sheet: {}", path.display());
        }
    }

    Ok(())
}
