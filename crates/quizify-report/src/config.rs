//! Rendering configuration and math renderer factory.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::math::{MathRenderer, SourceMathRenderer};

/// Which math renderer to use for HTML output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MathRendererKind {
    /// Escaped TeX rendered in the browser.
    #[default]
    Source,
    /// Server-side KaTeX (requires the `katex` feature).
    Katex,
}

impl fmt::Display for MathRendererKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MathRendererKind::Source => f.write_str("source"),
            MathRendererKind::Katex => f.write_str("katex"),
        }
    }
}

impl FromStr for MathRendererKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "source" => Ok(MathRendererKind::Source),
            "katex" => Ok(MathRendererKind::Katex),
            other => anyhow::bail!("unknown math renderer '{other}' (expected source or katex)"),
        }
    }
}

/// KaTeX options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KatexConfig {
    /// Color for expressions KaTeX could not parse.
    #[serde(default = "default_error_color")]
    pub error_color: String,
}

fn default_error_color() -> String {
    "#cc0000".to_string()
}

impl Default for KatexConfig {
    fn default() -> Self {
        Self {
            error_color: default_error_color(),
        }
    }
}

/// Top-level quizify configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizifyConfig {
    /// Math renderer for HTML output.
    #[serde(default)]
    pub math_renderer: MathRendererKind,
    #[serde(default)]
    pub katex: KatexConfig,
    /// Output directory for session reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Report format written by `grade` when none is given.
    #[serde(default = "default_format")]
    pub default_format: String,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./quizify-results")
}
fn default_format() -> String {
    "json".to_string()
}

impl Default for QuizifyConfig {
    fn default() -> Self {
        Self {
            math_renderer: MathRendererKind::default(),
            katex: KatexConfig::default(),
            output_dir: default_output_dir(),
            default_format: default_format(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + len];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + len + 1..];
    }
    result.push_str(rest);
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizify.toml` in the current directory
/// 2. `~/.config/quizify/config.toml`
///
/// `QUIZIFY_MATH_RENDERER` overrides the configured renderer.
pub fn load_config() -> Result<QuizifyConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizifyConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizify.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizifyConfig::default(),
    };

    if let Ok(kind) = std::env::var("QUIZIFY_MATH_RENDERER") {
        config.math_renderer = kind
            .parse()
            .context("invalid QUIZIFY_MATH_RENDERER")?;
    }

    Ok(config)
}

/// Parse a config document and expand `${VAR}` references in string fields.
pub fn parse_config_str(content: &str) -> Result<QuizifyConfig> {
    let mut config: QuizifyConfig = toml::from_str(content)?;
    config.katex.error_color = resolve_env_vars(&config.katex.error_color);
    config.default_format = resolve_env_vars(&config.default_format);
    if let Some(dir) = config.output_dir.to_str() {
        config.output_dir = PathBuf::from(resolve_env_vars(dir));
    }
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizify"))
}

/// Create the configured math renderer.
pub fn create_math_renderer(config: &QuizifyConfig) -> Result<Box<dyn MathRenderer>> {
    match config.math_renderer {
        MathRendererKind::Source => Ok(Box::new(SourceMathRenderer)),
        #[cfg(feature = "katex")]
        MathRendererKind::Katex => Ok(Box::new(crate::math::KatexMathRenderer::new(
            config.katex.error_color.clone(),
        ))),
        #[cfg(not(feature = "katex"))]
        MathRendererKind::Katex => {
            anyhow::bail!("math_renderer = \"katex\" requires building with the `katex` feature")
        }
    }
}
