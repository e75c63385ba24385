//! quizify-report — Math rendering and HTML pages.
//!
//! Everything that turns quiz text into markup lives here: the
//! [`TrustedHtml`] type, the pluggable [`MathRenderer`] backends, the render
//! configuration and the quiz/result page generators.

pub mod config;
pub mod html;
pub mod markup;
pub mod math;

pub use config::{create_math_renderer, load_config, load_config_from, QuizifyConfig};
pub use markup::TrustedHtml;
pub use math::{render_rich_text, MathRenderer, SourceMathRenderer};
