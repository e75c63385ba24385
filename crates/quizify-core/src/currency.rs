//! Currency protection.
//!
//! Dollar-prefixed numerals such as `$1,200.50` share their leading character
//! with the math delimiter. Before scanning for math, every currency token is
//! swapped for an opaque placeholder. The byte span of each placeholder in the
//! protected text is recorded, and originals are spliced back by position, so
//! user text that happens to look like a placeholder is never rewritten.

use std::borrow::Cow;
use std::ops::Range;

use regex::Regex;

/// Marks the start of a placeholder. Private-use code point, never a delimiter.
const PLACEHOLDER_OPEN: char = '\u{E000}';
/// Marks the end of a placeholder.
const PLACEHOLDER_CLOSE: char = '\u{E001}';

const DELIMITER: u8 = b'$';
const ESCAPE: u8 = b'\\';

/// `$`, digits, optional `,ddd` groups, optional decimal part, anchored at
/// the candidate `$`.
///
/// The "not followed by a letter" rule is checked by hand since `regex` has
/// no lookaround.
const CURRENCY_PATTERN: &str = r"^\$\d+(?:,\d{3})*(?:\.\d+)?";

/// Delimiter context at the current position, as the scanner will see it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    Text,
    Inline,
    Display,
}

/// Finds currency tokens and replaces them with placeholders.
#[derive(Debug, Clone)]
pub struct CurrencyProtector {
    pattern: Regex,
}

impl Default for CurrencyProtector {
    fn default() -> Self {
        Self::new()
    }
}

impl CurrencyProtector {
    /// Compile the currency pattern.
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(CURRENCY_PATTERN).expect("currency pattern is a valid regex"),
        }
    }

    /// Length of the currency token starting at byte `pos`, if any.
    ///
    /// A match is rejected when a letter immediately follows the numeric run
    /// (`$5M`).
    fn currency_at(&self, text: &str, pos: usize) -> Option<usize> {
        let m = self.pattern.find(&text[pos..])?;
        let followed_by_letter = text[pos + m.end()..]
            .chars()
            .next()
            .is_some_and(char::is_alphabetic);
        (!followed_by_letter).then_some(m.end())
    }

    /// Replace every currency token in `text` with a unique placeholder.
    ///
    /// Delimiters are tracked the same way the scanner reads them, so the `$`
    /// that closes `$x$` or the second `$` of a `$$` opener never starts a
    /// currency token, while `$5` right after a closed expression still does.
    pub fn protect<'a>(&self, text: &'a str) -> Protected<'a> {
        let bytes = text.as_bytes();
        let mut placeholders = PlaceholderMap::default();
        let mut out = String::new();
        let mut last = 0;
        let mut context = Context::Text;
        let mut pos = 0;

        while pos < bytes.len() {
            match bytes[pos] {
                ESCAPE if context == Context::Inline => {
                    pos += 2;
                    continue;
                }
                DELIMITER => {}
                _ => {
                    pos += 1;
                    continue;
                }
            }

            let double = bytes.get(pos + 1) == Some(&DELIMITER);
            if context == Context::Display && double {
                context = Context::Text;
                pos += 2;
                continue;
            }

            if let Some(len) = self.currency_at(text, pos) {
                out.push_str(&text[last..pos]);
                placeholders.insert(&mut out, &text[pos..pos + len]);
                pos += len;
                last = pos;
                continue;
            }

            match context {
                Context::Text if double => {
                    context = Context::Display;
                    pos += 2;
                }
                Context::Text => {
                    context = Context::Inline;
                    pos += 1;
                }
                Context::Inline => {
                    context = Context::Text;
                    pos += 1;
                }
                Context::Display => pos += 1,
            }
        }

        if placeholders.is_empty() {
            return Protected {
                text: Cow::Borrowed(text),
                placeholders,
            };
        }

        out.push_str(&text[last..]);
        Protected {
            text: Cow::Owned(out),
            placeholders,
        }
    }
}

/// Text with its currency tokens swapped out, plus the mapping to undo it.
#[derive(Debug, Clone)]
pub struct Protected<'a> {
    /// The rewritten text. Borrowed when nothing was replaced.
    pub text: Cow<'a, str>,
    /// Placeholder spans and original substrings, in order of appearance.
    pub placeholders: PlaceholderMap,
}

impl Protected<'_> {
    /// The original text of `range` of the protected text.
    pub fn restore(&self, range: Range<usize>) -> Cow<'_, str> {
        self.placeholders.restore(&self.text, range)
    }
}

/// Call-scoped mapping from placeholder span to original currency text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderMap {
    /// Sorted by span start; spans never overlap.
    entries: Vec<(Range<usize>, String)>,
}

impl PlaceholderMap {
    /// Append a placeholder for `original` to `out` and record its span.
    fn insert(&mut self, out: &mut String, original: &str) {
        let start = out.len();
        out.push(PLACEHOLDER_OPEN);
        out.push_str(&self.entries.len().to_string());
        out.push(PLACEHOLDER_CLOSE);
        self.entries.push((start..out.len(), original.to_string()));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate `(span in protected text, original)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (Range<usize>, &str)> {
        self.entries.iter().map(|(s, o)| (s.clone(), o.as_str()))
    }

    /// Rebuild `protected[range]` with the original currency text spliced
    /// back in place of every placeholder lying inside `range`.
    ///
    /// Anything outside a recorded span is copied verbatim, including
    /// characters that merely look like a placeholder.
    pub fn restore<'a>(&self, protected: &'a str, range: Range<usize>) -> Cow<'a, str> {
        let first = self
            .entries
            .partition_point(|(span, _)| span.start < range.start);
        let mut inside = self.entries[first..]
            .iter()
            .take_while(|(span, _)| span.end <= range.end)
            .peekable();

        if inside.peek().is_none() {
            return Cow::Borrowed(&protected[range]);
        }

        let mut restored = String::with_capacity(range.len());
        let mut last = range.start;
        for (span, original) in inside {
            restored.push_str(&protected[last..span.start]);
            restored.push_str(original);
            last = span.end;
        }
        restored.push_str(&protected[last..range.end]);
        Cow::Owned(restored)
    }
}
