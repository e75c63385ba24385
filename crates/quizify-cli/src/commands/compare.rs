//! The `quizify compare` command.

use std::path::PathBuf;

use anyhow::Result;

use quizify_core::report::SessionReport;

pub fn execute(
    baseline_path: PathBuf,
    current_path: PathBuf,
    fail_on_regression: bool,
    format: String,
) -> Result<()> {
    let baseline = SessionReport::load_json(&baseline_path)?;
    let current = SessionReport::load_json(&current_path)?;

    let report = current.compare(&baseline);

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", report.to_markdown());
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            // text format
            println!(
                "Comparison: {} regressions, {} improvements, {} unchanged",
                report.regressions.len(),
                report.improvements.len(),
                report.unchanged
            );
            println!(
                "Score: {:.1}% -> {:.1}%",
                report.baseline_score * 100.0,
                report.current_score * 100.0
            );

            if !report.regressions.is_empty() {
                println!("\nNow incorrect:");
                for id in &report.regressions {
                    println!("  {id}");
                }
            }

            if !report.improvements.is_empty() {
                println!("\nNow correct:");
                for id in &report.improvements {
                    println!("  {id}");
                }
            }

            if report.new_questions > 0 {
                println!("\n{} new question(s)", report.new_questions);
            }
            if report.removed_questions > 0 {
                println!("{} removed question(s)", report.removed_questions);
            }
        }
    }

    if fail_on_regression && report.has_regressions() {
        std::process::exit(1);
    }

    Ok(())
}
