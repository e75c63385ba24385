//! The `quizify grade` command.

use std::path::PathBuf;

use anyhow::Result;

use quizify_core::model::Quiz;
use quizify_core::parser;
use quizify_core::report::SessionReport;
use quizify_report::config::{create_math_renderer, load_config_from};
use quizify_report::html::write_session_html;

pub fn execute(
    quiz_path: PathBuf,
    answers_path: PathBuf,
    output: Option<PathBuf>,
    format: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let quiz = parser::load_quiz(&quiz_path)?;
    let session = parser::parse_answer_sheet(&answers_path)?;
    let report = SessionReport::grade(&quiz, &session)?;

    print_summary(&quiz, &report);

    let output = output.unwrap_or_else(|| config.output_dir.clone());
    let format = format.unwrap_or_else(|| config.default_format.clone());

    std::fs::create_dir_all(&output)?;
    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");

    let formats: Vec<&str> = if format == "all" {
        vec!["json", "html"]
    } else {
        format.split(',').map(str::trim).collect()
    };

    for fmt in &formats {
        match *fmt {
            "json" => {
                let path = output.join(format!("session-{timestamp}.json"));
                report.save_json(&path)?;
                eprintln!("Results saved to: {}", path.display());
            }
            "html" => {
                let renderer = create_math_renderer(&config)?;
                let path = output.join(format!("session-{timestamp}.html"));
                write_session_html(&quiz, &report, renderer.as_ref(), &path)?;
                eprintln!("HTML report: {}", path.display());
            }
            _ => {
                eprintln!("Unknown format: {fmt}");
            }
        }
    }

    Ok(())
}

fn print_summary(quiz: &Quiz, report: &SessionReport) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["Question", "Selected", "Correct", "Points"]);

    for outcome in &report.score.questions {
        let points = if outcome.correct {
            "+1 point"
        } else {
            "+0 points"
        };
        table.add_row(vec![
            Cell::new(&outcome.question_id),
            Cell::new(outcome.selected.join(", ")),
            Cell::new(outcome.expected.join(", ")),
            Cell::new(points),
        ]);
    }

    println!("{}\n\n{table}", quiz.title);
    println!(
        "\nScore: {} / {} ({:.1}%)",
        report.score.score,
        report.score.total,
        report.score.percentage() * 100.0
    );
}
