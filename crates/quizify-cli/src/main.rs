//! quizify CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "quizify", version, about = "Math-aware quiz authoring, grading and rendering")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split text into literal and math segments
    Segment {
        /// Text to segment (reads stdin when omitted)
        text: Option<String>,

        /// Treat the whole input as one display-math expression
        #[arg(long)]
        display: bool,

        /// Output format: json, text
        #[arg(long, default_value = "json")]
        format: String,
    },

    /// Validate quiz files
    Validate {
        /// Path to a quiz file or directory
        #[arg(long)]
        quiz: PathBuf,
    },

    /// Grade an answer sheet against a quiz
    Grade {
        /// Quiz file (.toml or .json)
        #[arg(long)]
        quiz: PathBuf,

        /// Answer sheet (.toml)
        #[arg(long)]
        answers: PathBuf,

        /// Output directory (defaults to `output_dir` from config)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: json, html, all (defaults to `default_format` from config)
        #[arg(long)]
        format: Option<String>,
    },

    /// Render a quiz, or a graded session, to HTML
    Render {
        /// Quiz file (.toml or .json)
        #[arg(long)]
        quiz: PathBuf,

        /// Session report JSON; renders the result page instead of the quiz sheet
        #[arg(long)]
        report: Option<PathBuf>,

        /// Output HTML file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Build a follow-up quiz from the incorrectly answered questions
    Retry {
        /// Quiz file (.toml or .json)
        #[arg(long)]
        quiz: PathBuf,

        /// Session report JSON
        #[arg(long)]
        report: PathBuf,

        /// Output TOML file (prints to stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Compare two session reports
    Compare {
        /// Baseline report JSON
        #[arg(long)]
        baseline: PathBuf,

        /// Current report JSON
        #[arg(long)]
        current: PathBuf,

        /// Exit code 1 if a question went from correct to incorrect
        #[arg(long)]
        fail_on_regression: bool,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Create starter config, example quiz and answer sheet
    Init,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("quizify={level}").parse().unwrap()),
        )
        .init();

    let config = cli.config;
    let result = match cli.command {
        Commands::Segment {
            text,
            display,
            format,
        } => commands::segment::execute(text, display, format),
        Commands::Validate { quiz } => commands::validate::execute(quiz),
        Commands::Grade {
            quiz,
            answers,
            output,
            format,
        } => commands::grade::execute(quiz, answers, output, format, config),
        Commands::Render {
            quiz,
            report,
            output,
        } => commands::render::execute(quiz, report, output, config),
        Commands::Retry {
            quiz,
            report,
            output,
        } => commands::retry::execute(quiz, report, output),
        Commands::Compare {
            baseline,
            current,
            fail_on_regression,
            format,
        } => commands::compare::execute(baseline, current, fail_on_regression, format),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
