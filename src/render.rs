//! Text rendering: inline HTML for on-screen answers, and fixed-page
//! layout for exports.
mod inline;
mod metrics;
mod paginate;

pub use inline::inline_format;
pub use metrics::{Helvetica, TextMeasure};
pub use paginate::{
    DEFAULT_FONT_SIZE, Document, DrawOp, LayoutWriter, PageGeometry, TextRun, paginate,
};

/// Escapes text for inclusion in HTML element content or attribute values.
pub(crate) fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_html_covers_markup_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn escape_html_leaves_plain_text() {
        assert_eq!(escape_html("Doe J, Smith A"), "Doe J, Smith A");
    }
}
