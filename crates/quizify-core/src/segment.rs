//! Math/text segmentation.
//!
//! Splits a user-visible string into literal text and math expressions:
//! `$...$` is inline math, `$$...$$` is display math, and currency such as
//! `$1,200.50` stays literal. Unterminated delimiters are never an error;
//! whatever follows them is kept as text.

use std::ops::Range;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::currency::{CurrencyProtector, Protected};

const DELIMITER: u8 = b'$';
const ESCAPE: u8 = b'\\';

/// One piece of segmented text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Segment {
    /// Literal text, rendered verbatim.
    Text { value: String },
    /// A math expression. `display` renders it as a standalone block.
    Math { value: String, display: bool },
}

impl Segment {
    pub fn text(value: impl Into<String>) -> Self {
        Segment::Text {
            value: value.into(),
        }
    }

    pub fn inline(value: impl Into<String>) -> Self {
        Segment::Math {
            value: value.into(),
            display: false,
        }
    }

    pub fn display(value: impl Into<String>) -> Self {
        Segment::Math {
            value: value.into(),
            display: true,
        }
    }

    /// The segment's text or expression.
    pub fn value(&self) -> &str {
        match self {
            Segment::Text { value } | Segment::Math { value, .. } => value,
        }
    }

    pub fn is_math(&self) -> bool {
        matches!(self, Segment::Math { .. })
    }

    /// Re-wrap the segment in its delimiters.
    pub fn to_source(&self) -> String {
        match self {
            Segment::Text { value } => value.clone(),
            Segment::Math {
                value,
                display: true,
            } => format!("$${value}$$"),
            Segment::Math {
                value,
                display: false,
            } => format!("${value}$"),
        }
    }
}

/// How a scan ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScanOutcome {
    /// Every delimiter was closed.
    Complete,
    /// Input ran out inside an expression; the rest was kept as text.
    Unterminated { display: bool },
}

/// Segments together with the scan outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scan {
    pub segments: Vec<Segment>,
    pub outcome: ScanOutcome,
}

/// Options for [`Segmenter::segment_with`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SegmentOptions {
    /// Treat the whole input as one display expression, without scanning.
    pub force_display: bool,
}

/// Reusable segmenter. Holds the compiled currency pattern.
#[derive(Debug, Clone, Default)]
pub struct Segmenter {
    currency: CurrencyProtector,
}

impl Segmenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split `text` into ordered text and math segments.
    pub fn segment(&self, text: &str) -> Vec<Segment> {
        self.scan(text).segments
    }

    /// Like [`Segmenter::segment`], honoring `options`.
    pub fn segment_with(&self, text: &str, options: SegmentOptions) -> Vec<Segment> {
        if options.force_display {
            if text.is_empty() {
                return Vec::new();
            }
            return vec![Segment::display(text)];
        }
        self.segment(text)
    }

    /// Segment `text` and report whether every delimiter was closed.
    pub fn scan(&self, text: &str) -> Scan {
        let protected = self.currency.protect(text);
        let mut scanner = Scanner {
            protected: &protected,
            segments: Vec::new(),
        };
        let outcome = scanner.run();
        if let ScanOutcome::Unterminated { display: block } = outcome {
            tracing::trace!(display = block, "unterminated math delimiter kept as text");
        }
        Scan {
            segments: scanner.segments,
            outcome,
        }
    }
}

fn shared() -> &'static Segmenter {
    static SEGMENTER: OnceLock<Segmenter> = OnceLock::new();
    SEGMENTER.get_or_init(Segmenter::new)
}

/// Split `text` into ordered text and math segments.
///
/// ```
/// use quizify_core::segment::{segment, Segment};
///
/// assert_eq!(
///     segment("area $\\pi r^2$"),
///     vec![Segment::text("area "), Segment::inline("\\pi r^2")]
/// );
/// ```
pub fn segment(text: &str) -> Vec<Segment> {
    shared().segment(text)
}

/// Split `text`, optionally forcing the whole input into one display block.
pub fn segment_with(text: &str, options: SegmentOptions) -> Vec<Segment> {
    shared().segment_with(text, options)
}

/// Segment `text` and report the scan outcome.
pub fn scan(text: &str) -> Scan {
    shared().scan(text)
}

/// Single pass over currency-protected text.
struct Scanner<'a> {
    protected: &'a Protected<'a>,
    segments: Vec<Segment>,
}

impl Scanner<'_> {
    fn run(&mut self) -> ScanOutcome {
        let protected = self.protected;
        let src: &str = &protected.text;
        let bytes = src.as_bytes();
        // Start of the pending text run.
        let mut run_start = 0;
        let mut pos = 0;

        // Only ASCII bytes are inspected, so stepping one byte at a time never
        // mistakes part of a multi-byte character for a delimiter, and every
        // slice boundary below sits on a `$`.
        while pos < bytes.len() {
            if bytes[pos] != DELIMITER {
                pos += 1;
                continue;
            }

            let display = bytes.get(pos + 1) == Some(&DELIMITER);
            let open_len = if display { 2 } else { 1 };
            let body_start = pos + open_len;
            let close = if display {
                find_block_close(src, body_start)
            } else {
                find_inline_close(bytes, body_start)
            };

            let Some(close) = close else {
                self.push_text(run_start..src.len());
                return ScanOutcome::Unterminated { display };
            };

            let resume = close + open_len;
            let body = &src[body_start..close];
            let expr = body.trim();
            if expr.is_empty() {
                // `$$$$` or `$ $`: nothing to render, keep it as text.
                pos = resume;
                continue;
            }
            let expr_start = body_start + (body.len() - body.trim_start().len());

            self.push_text(run_start..pos);
            self.segments.push(Segment::Math {
                value: protected
                    .restore(expr_start..expr_start + expr.len())
                    .into_owned(),
                display,
            });
            pos = resume;
            run_start = resume;
        }

        self.push_text(run_start..src.len());
        ScanOutcome::Complete
    }

    /// Push `range` of the protected text as a text segment, if non-empty.
    fn push_text(&mut self, range: Range<usize>) {
        if !range.is_empty() {
            self.segments
                .push(Segment::text(self.protected.restore(range)));
        }
    }
}

/// Position of the next `$$` at or after `from`.
fn find_block_close(src: &str, from: usize) -> Option<usize> {
    src[from..].find("$$").map(|i| from + i)
}

/// Position of the next `$` at or after `from` that is not escaped.
fn find_inline_close(bytes: &[u8], from: usize) -> Option<usize> {
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            ESCAPE => i += 2,
            DELIMITER => return Some(i),
            _ => i += 1,
        }
    }
    None
}
