//! HTML page generators.
//!
//! Produces self-contained pages with CSS/JS inlined. Math is handed to the
//! configured [`MathRenderer`], which may add its own `<head>` tags.

use anyhow::{Context, Result};
use std::path::Path;

use quizify_core::model::{Question, Quiz};
use quizify_core::report::SessionReport;
use quizify_core::scoring::QuestionOutcome;

use crate::markup::{html_escape, TrustedHtml};
use crate::math::{MathRenderer, RichText};

fn page_head(html: &mut String, title: &TrustedHtml, renderer: &dyn MathRenderer) {
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!("<title>{title}</title>\n"));
    html.push_str(renderer.head().as_str());
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");
}

/// Generate a printable quiz sheet.
pub fn generate_quiz_html(quiz: &Quiz, renderer: &dyn MathRenderer) -> String {
    let rich = RichText::new(renderer);
    let title = rich.render(&quiz.title);
    let mut html = String::new();

    page_head(&mut html, &TrustedHtml::escape(&quiz.title), renderer);

    html.push_str("<header>\n");
    html.push_str(&format!("<h1>{title}</h1>\n"));
    html.push_str(&format!(
        "<p class=\"meta\">{} questions | select every correct option</p>\n",
        quiz.questions.len()
    ));
    html.push_str("</header>\n");

    html.push_str("<ol class=\"questions\">\n");
    for question in &quiz.questions {
        html.push_str(&format!(
            "<li class=\"question\" id=\"{}\">\n",
            html_escape(&question.id)
        ));
        html.push_str(&format!(
            "<p class=\"prompt\">{}</p>\n",
            rich.render(&question.question)
        ));
        html.push_str("<ul class=\"options\">\n");
        for option in &question.options {
            html.push_str(&format!(
                "<li><label><input type=\"checkbox\" name=\"{}\" value=\"{}\"> {}</label></li>\n",
                html_escape(&question.id),
                html_escape(&option.id),
                rich.render(&option.option)
            ));
        }
        html.push_str("</ul>\n</li>\n");
    }
    html.push_str("</ol>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Generate the result page for a graded session.
pub fn generate_session_html(
    quiz: &Quiz,
    report: &SessionReport,
    renderer: &dyn MathRenderer,
) -> String {
    let rich = RichText::new(renderer);
    let score = &report.score;
    let mut html = String::new();

    page_head(
        &mut html,
        &TrustedHtml::escape(&format!("{} results", quiz.title)),
        renderer,
    );

    // Header
    html.push_str("<header>\n");
    html.push_str(&format!("<h1>{}</h1>\n", rich.render(&quiz.title)));
    html.push_str(&format!(
        "<p class=\"score\">Score: {} / {}</p>\n",
        score.score, score.total
    ));
    html.push_str(&generate_score_bar(score.percentage()));
    html.push_str(&format!(
        "<p class=\"meta\">Session {} | submitted {}</p>\n",
        report.session_id,
        report.submitted_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    if score.has_incorrect() {
        html.push_str(
            "<label class=\"filter\"><input type=\"checkbox\" onchange=\"toggleCorrect(this.checked)\"> Show incorrect only</label>\n",
        );
    }
    html.push_str("</header>\n");

    // Per-question results
    html.push_str("<ol class=\"questions\" id=\"results\">\n");
    for question in &quiz.questions {
        match score.outcome(&question.id) {
            Some(outcome) => push_question_result(&mut html, &rich, question, outcome),
            None => tracing::warn!(
                question = %question.id,
                "question missing from session report"
            ),
        }
    }
    html.push_str("</ol>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(report).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

fn push_question_result(
    html: &mut String,
    rich: &RichText<'_>,
    question: &Question,
    outcome: &QuestionOutcome,
) {
    let (class, points) = if outcome.correct {
        ("correct", "+1 point")
    } else {
        ("incorrect", "+0 points")
    };

    html.push_str(&format!(
        "<li class=\"question {class}\" id=\"{}\">\n",
        html_escape(&question.id)
    ));
    html.push_str(&format!(
        "<p class=\"prompt\">{} <span class=\"points\">{points}</span></p>\n",
        rich.render(&question.question)
    ));
    html.push_str("<ul class=\"options\">\n");
    for option in &question.options {
        let selected = outcome.selected.contains(&option.id);
        let mut badges = String::new();
        if selected {
            badges.push_str(" <span class=\"badge selected\">Selected</span>");
        }
        if option.is_correct {
            badges.push_str(" <span class=\"badge expected\">Correct</span>");
        }
        let row_class = match (selected, option.is_correct) {
            (true, true) => "hit",
            (true, false) => "wrong",
            (false, true) => "missed",
            (false, false) => "",
        };
        html.push_str(&format!(
            "<li class=\"{row_class}\">{}{badges}</li>\n",
            rich.render(&option.option)
        ));
    }
    html.push_str("</ul>\n</li>\n");
}

/// Write a printable quiz sheet to a file.
pub fn write_quiz_html(quiz: &Quiz, renderer: &dyn MathRenderer, path: &Path) -> Result<()> {
    write_page(&generate_quiz_html(quiz, renderer), path)
}

/// Write a session result page to a file.
pub fn write_session_html(
    quiz: &Quiz,
    report: &SessionReport,
    renderer: &dyn MathRenderer,
    path: &Path,
) -> Result<()> {
    write_page(&generate_session_html(quiz, report, renderer), path)
}

fn write_page(html: &str, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::debug!(path = %path.display(), "wrote HTML page");
    Ok(())
}

fn generate_score_bar(fraction: f64) -> String {
    let max_width = 400;
    let bar_height = 24;
    let width = (fraction.clamp(0.0, 1.0) * max_width as f64) as usize;

    let color = if fraction >= 0.8 {
        "#22c55e"
    } else if fraction >= 0.5 {
        "#eab308"
    } else {
        "#ef4444"
    };

    format!(
        concat!(
            "<svg width=\"{total}\" height=\"{h}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
            "  <rect x=\"0\" y=\"0\" width=\"{max}\" height=\"{h}\" fill=\"var(--border)\" rx=\"4\"/>\n",
            "  <rect x=\"0\" y=\"0\" width=\"{w}\" height=\"{h}\" fill=\"{color}\" rx=\"4\"/>\n",
            "  <text x=\"{tx}\" y=\"{ty}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{pct:.1}%</text>\n",
            "</svg>\n"
        ),
        total = max_width + 60,
        max = max_width,
        h = bar_height,
        w = width,
        color = color,
        tx = max_width + 8,
        ty = bar_height / 2,
        pct = fraction * 100.0,
    )
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --fail: #fde2e2; --warn: #fef9c3; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --fail: #7f1d1d; --warn: #713f12; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); max-width: 60rem; }
h1 { margin-top: 1rem; }
.meta { color: #6b7280; }
.score { font-size: 1.4rem; font-weight: bold; }
.questions > li { margin: 1.5rem 0; padding: 0.5rem 1rem; border-left: 4px solid var(--border); }
.questions > li.correct { border-color: #22c55e; }
.questions > li.incorrect { border-color: #ef4444; }
.options { list-style: none; padding-left: 0.5rem; }
.options li { padding: 0.25rem 0.5rem; margin: 0.25rem 0; border-radius: 4px; }
.options li.hit { background: var(--pass); }
.options li.wrong { background: var(--fail); }
.options li.missed { background: var(--warn); }
.points { color: #6b7280; font-size: 0.85rem; margin-left: 0.5rem; }
.badge { font-size: 0.75rem; padding: 0.1rem 0.4rem; border-radius: 999px; border: 1px solid currentColor; margin-left: 0.4rem; }
.math-display { display: block; margin: 0.5rem 0; text-align: center; }
.math-error { color: #cc0000; font-family: monospace; }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 2rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 0.5rem 0; }
"#;

const JS: &str = r#"
function toggleCorrect(hide) {
  document.querySelectorAll('#results > li.correct').forEach(li => {
    li.style.display = hide ? 'none' : '';
  });
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::SourceMathRenderer;
    use quizify_core::model::{QuizOption, QuizSession};

    fn make_quiz() -> Quiz {
        Quiz {
            id: "algebra".into(),
            title: "Algebra <basics>".into(),
            questions: vec![
                Question {
                    id: "q1".into(),
                    question: "Solve $x + 1 = 2$ for $x$".into(),
                    options: vec![
                        QuizOption {
                            id: "a".into(),
                            option: "$x = 1$".into(),
                            is_correct: true,
                        },
                        QuizOption {
                            id: "b".into(),
                            option: "$x = 2$".into(),
                            is_correct: false,
                        },
                    ],
                },
                Question {
                    id: "q2".into(),
                    question: "Which costs $5?".into(),
                    options: vec![
                        QuizOption {
                            id: "a".into(),
                            option: "<b>the pen</b>".into(),
                            is_correct: true,
                        },
                        QuizOption {
                            id: "b".into(),
                            option: "the car".into(),
                            is_correct: false,
                        },
                    ],
                },
            ],
        }
    }

    fn make_report(quiz: &Quiz) -> SessionReport {
        let mut session = QuizSession::new(quiz.id.clone());
        session.select("q1", "a");
        session.select("q2", "b");
        SessionReport::grade(quiz, &session).unwrap()
    }

    #[test]
    fn quiz_html_contains_questions_and_math() {
        let quiz = make_quiz();
        let html = generate_quiz_html(&quiz, &SourceMathRenderer);

        assert!(html.contains("<html"));
        assert!(html.contains("</html>"));
        assert!(html.contains("<h1>Algebra &lt;basics&gt;</h1>"));
        assert!(html.contains("<span class=\"math math-inline\">x + 1 = 2</span>"));
        assert!(html.contains("Which costs $5?"));
        assert!(html.contains("type=\"checkbox\" name=\"q1\" value=\"a\""));
        assert!(html.contains("katex.min.js"));
    }

    #[test]
    fn user_markup_is_escaped() {
        let quiz = make_quiz();
        let html = generate_quiz_html(&quiz, &SourceMathRenderer);
        assert!(!html.contains("<b>the pen</b>"));
        assert!(html.contains("&lt;b&gt;the pen&lt;/b&gt;"));
    }

    #[test]
    fn session_html_shows_score_and_badges() {
        let quiz = make_quiz();
        let report = make_report(&quiz);
        let html = generate_session_html(&quiz, &report, &SourceMathRenderer);

        assert!(html.contains("Score: 1 / 2"));
        assert!(html.contains("+1 point"));
        assert!(html.contains("+0 points"));
        assert!(html.contains(">Selected</span>"));
        assert!(html.contains(">Correct</span>"));
        assert!(html.contains("class=\"missed\""));
        assert!(html.contains("class=\"wrong\""));
        assert!(html.contains("Show incorrect only"));
        assert!(html.contains("Raw JSON Data"));
    }

    #[test]
    fn perfect_session_has_no_filter() {
        let quiz = make_quiz();
        let mut session = QuizSession::new("algebra");
        session.select("q1", "a");
        session.select("q2", "a");
        let report = SessionReport::grade(&quiz, &session).unwrap();

        let html = generate_session_html(&quiz, &report, &SourceMathRenderer);
        assert!(html.contains("Score: 2 / 2"));
        assert!(!html.contains("Show incorrect only"));
    }

    #[test]
    fn write_pages_to_file() {
        let quiz = make_quiz();
        let report = make_report(&quiz);
        let dir = tempfile::tempdir().unwrap();

        let quiz_path = dir.path().join("out").join("quiz.html");
        write_quiz_html(&quiz, &SourceMathRenderer, &quiz_path).unwrap();
        assert!(quiz_path.exists());

        let session_path = dir.path().join("out").join("session.html");
        write_session_html(&quiz, &report, &SourceMathRenderer, &session_path).unwrap();
        let content = std::fs::read_to_string(&session_path).unwrap();
        assert!(content.contains("Score: 1 / 2"));
    }

    #[test]
    fn score_bar_width_tracks_fraction() {
        assert!(generate_score_bar(0.5).contains("width=\"200\""));
        assert!(generate_score_bar(1.0).contains("#22c55e"));
        assert!(generate_score_bar(0.0).contains("#ef4444"));
    }
}
