//! Math rendering.
//!
//! Segments text with the core segmenter and hands math expressions to a
//! [`MathRenderer`]. Renderers never fail: a malformed expression comes back
//! as flagged, escaped source.

use quizify_core::segment::{Segment, SegmentOptions, Segmenter};

use crate::markup::{html_escape, TrustedHtml};

/// Turns one math expression into markup.
pub trait MathRenderer: Send + Sync {
    /// Short renderer name (e.g. "source").
    fn name(&self) -> &str;

    /// Render `expr` inline, or as a block when `display` is set.
    fn render(&self, expr: &str, display: bool) -> TrustedHtml;

    /// Markup for the page `<head>` (stylesheets, scripts).
    fn head(&self) -> TrustedHtml {
        TrustedHtml::default()
    }
}

const KATEX_CDN: &str = "https://cdn.jsdelivr.net/npm/katex@0.16.11/dist";

/// Emits escaped TeX in `span.math` elements for client-side rendering.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceMathRenderer;

impl SourceMathRenderer {
    /// Escaped source flagged as unrenderable.
    pub fn error(expr: &str, display: bool, reason: &str) -> TrustedHtml {
        let class = if display {
            "math math-display math-error"
        } else {
            "math math-inline math-error"
        };
        TrustedHtml::from_trusted(format!(
            "<span class=\"{class}\" title=\"{}\">{}</span>",
            html_escape(reason),
            html_escape(expr)
        ))
    }
}

impl MathRenderer for SourceMathRenderer {
    fn name(&self) -> &str {
        "source"
    }

    fn render(&self, expr: &str, display: bool) -> TrustedHtml {
        let class = if display {
            "math math-display"
        } else {
            "math math-inline"
        };
        TrustedHtml::from_trusted(format!(
            "<span class=\"{class}\">{}</span>",
            html_escape(expr)
        ))
    }

    /// Typesets exactly the `span.math` elements this renderer emitted.
    ///
    /// Literal text is never scanned for delimiters, so `\(x\)` typed by a
    /// user stays text.
    fn head(&self) -> TrustedHtml {
        TrustedHtml::from_trusted(format!(
            concat!(
                "<link rel=\"stylesheet\" href=\"{cdn}/katex.min.css\">\n",
                "<script defer src=\"{cdn}/katex.min.js\" ",
                "onload=\"document.querySelectorAll('span.math:not(.math-error)')",
                ".forEach(el => katex.render(el.textContent, el, {{",
                "displayMode: el.classList.contains('math-display'), ",
                "throwOnError: false, strict: 'ignore'}}));\"></script>\n"
            ),
            cdn = KATEX_CDN
        ))
    }
}

/// Server-side KaTeX rendering.
#[cfg(feature = "katex")]
#[derive(Debug, Clone)]
pub struct KatexMathRenderer {
    error_color: String,
}

#[cfg(feature = "katex")]
impl KatexMathRenderer {
    pub fn new(error_color: impl Into<String>) -> Self {
        Self {
            error_color: error_color.into(),
        }
    }

    fn try_render(&self, expr: &str, display: bool) -> Result<String, String> {
        let opts = katex::Opts::builder()
            .display_mode(display)
            .throw_on_error(false)
            .error_color(self.error_color.clone())
            .build()
            .map_err(|e| e.to_string())?;
        katex::render_with_opts(expr, &opts).map_err(|e| e.to_string())
    }
}

#[cfg(feature = "katex")]
impl MathRenderer for KatexMathRenderer {
    fn name(&self) -> &str {
        "katex"
    }

    fn render(&self, expr: &str, display: bool) -> TrustedHtml {
        match self.try_render(expr, display) {
            Ok(markup) => TrustedHtml::from_trusted(markup),
            Err(reason) => {
                tracing::warn!(expr, %reason, "KaTeX failed, falling back to source");
                SourceMathRenderer::error(expr, display, &reason)
            }
        }
    }

    fn head(&self) -> TrustedHtml {
        TrustedHtml::from_trusted(format!(
            "<link rel=\"stylesheet\" href=\"{KATEX_CDN}/katex.min.css\">\n"
        ))
    }
}

/// Render already-segmented text.
pub fn render_segments(segments: &[Segment], renderer: &dyn MathRenderer) -> TrustedHtml {
    segments
        .iter()
        .map(|segment| match segment {
            Segment::Text { value } => TrustedHtml::escape(value),
            Segment::Math { value, display } => renderer.render(value, *display),
        })
        .collect()
}

/// Segment `text` and render it: text escaped, math through `renderer`.
pub fn render_rich_text(text: &str, renderer: &dyn MathRenderer) -> TrustedHtml {
    render_rich_text_with(text, SegmentOptions::default(), renderer)
}

/// Like [`render_rich_text`], honoring segmentation `options`.
pub fn render_rich_text_with(
    text: &str,
    options: SegmentOptions,
    renderer: &dyn MathRenderer,
) -> TrustedHtml {
    let segments = quizify_core::segment::segment_with(text, options);
    render_segments(&segments, renderer)
}

/// Rich-text rendering bound to one renderer and segmenter.
pub struct RichText<'a> {
    segmenter: Segmenter,
    renderer: &'a dyn MathRenderer,
}

impl<'a> RichText<'a> {
    pub fn new(renderer: &'a dyn MathRenderer) -> Self {
        Self {
            segmenter: Segmenter::new(),
            renderer,
        }
    }

    pub fn renderer(&self) -> &dyn MathRenderer {
        self.renderer
    }

    pub fn render(&self, text: &str) -> TrustedHtml {
        render_segments(&self.segmenter.segment(text), self.renderer)
    }
}
