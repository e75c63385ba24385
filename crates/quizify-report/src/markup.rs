//! Trusted HTML.
//!
//! User text only becomes markup by being escaped. Raw markup can only be
//! built inside this crate, by a [`MathRenderer`](crate::math::MathRenderer)
//! or by the page generators around already-trusted fragments.

use std::fmt;

/// HTML that is safe to insert into a page as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrustedHtml(String);

impl TrustedHtml {
    /// Escape plain text.
    pub fn escape(text: &str) -> Self {
        Self(html_escape(text))
    }

    /// Wrap markup produced by this crate.
    pub(crate) fn from_trusted(markup: String) -> Self {
        Self(markup)
    }

    pub fn push(&mut self, other: &TrustedHtml) {
        self.0.push_str(&other.0);
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for TrustedHtml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromIterator<TrustedHtml> for TrustedHtml {
    fn from_iter<I: IntoIterator<Item = TrustedHtml>>(iter: I) -> Self {
        let mut out = TrustedHtml::default();
        for html in iter {
            out.push(&html);
        }
        out
    }
}

/// Escape a string for safe HTML insertion.
pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_neutralizes_tags() {
        let html = TrustedHtml::escape("<script>alert('x')</script> & \"more\"");
        assert_eq!(
            html.as_str(),
            "&lt;script&gt;alert(&#x27;x&#x27;)&lt;/script&gt; &amp; &quot;more&quot;"
        );
    }

    #[test]
    fn collect_concatenates() {
        let html: TrustedHtml = ["a", "<b>"].iter().map(|s| TrustedHtml::escape(s)).collect();
        assert_eq!(html.to_string(), "a&lt;b&gt;");
    }
}
