//! The `quizify init` command.

use std::path::Path;

use anyhow::{Context, Result};

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("quizify.toml"), SAMPLE_CONFIG)?;

    std::fs::create_dir_all("quizzes").context("failed to create quizzes/")?;
    write_if_missing(Path::new("quizzes/example.toml"), EXAMPLE_QUIZ)?;
    write_if_missing(Path::new("quizzes/example-answers.toml"), EXAMPLE_ANSWERS)?;

    println!("\nNext steps:");
    println!("  1. Run: quizify validate --quiz quizzes/example.toml");
    println!("  2. Run: quizify grade --quiz quizzes/example.toml --answers quizzes/example-answers.toml --format all");
    println!("  3. Open the HTML result page in quizify-results/");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r##"# quizify configuration

# "source" leaves TeX for the browser to render, "katex" renders on the
# server (requires a build with the `katex` feature).
math_renderer = "source"
output_dir = "./quizify-results"
default_format = "json"

[katex]
error_color = "#cc0000"
"##;

const EXAMPLE_QUIZ: &str = r#"[quiz]
id = "example"
title = "Warm-up: $x$, $y$ and prices"

[[questions]]
id = "linear"
question = "Solve $2x + 3 = 7$."

[[questions.options]]
id = "a"
option = "$x = 2$"
is_correct = true

[[questions.options]]
id = "b"
option = "$x = 5$"

[[questions]]
id = "area"
question = "The area of a circle of radius $r$ is $$A = \\pi r^2$$ Which radius gives $A = 4\\pi$?"

[[questions.options]]
id = "a"
option = "$r = 2$"
is_correct = true

[[questions.options]]
id = "b"
option = "$r = 4$"

[[questions.options]]
id = "c"
option = "$r = \\sqrt{2}$"

[[questions]]
id = "change"
question = "A notebook costs $3.50 and you pay with $10. How much change?"

[[questions.options]]
id = "a"
option = "$6.50"
is_correct = true

[[questions.options]]
id = "b"
option = "$7.50"
"#;

const EXAMPLE_ANSWERS: &str = r#"quiz_id = "example"

[answers]
linear = ["a"]
area = ["a"]
change = ["a"]
"#;
