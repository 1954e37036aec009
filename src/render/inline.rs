use std::sync::LazyLock;

use regex::Regex;

/// Non-greedy `**bold**` span within one line.
pub(super) static BOLD_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("bold span pattern is valid"));

/// Converts markdown-like answer text into inline HTML for on-screen display.
///
/// Works line by line so produced markup is never re-matched:
/// - `### heading` lines become `<strong>heading</strong>`
/// - `- item` and `* item` lines become `<li>item</li>` and absorb their line break
/// - `**bold**` spans become `<strong>bold</strong>`
/// - every other line break becomes `<br>`
///
/// # Examples
///
/// ```
/// use dietnerd::render::inline_format;
///
/// assert_eq!(
///     inline_format("### Summary\nEat **more** fiber\n- oats\n- beans"),
///     "<strong>Summary</strong><br>Eat <strong>more</strong> fiber<br><li>oats</li><li>beans</li>"
/// );
/// ```
pub fn inline_format(text: &str) -> String {
    let lines: Vec<&str> = text
        .split('\n')
        .map(|line| line.trim_end_matches('\r'))
        .collect();
    let last = lines.len().saturating_sub(1);
    let mut html = String::with_capacity(text.len() + lines.len() * 4);

    for (i, line) in lines.iter().enumerate() {
        let trimmed = line.trim_start();
        if let Some(heading) = trimmed.strip_prefix("### ") {
            html.push_str("<strong>");
            html.push_str(&bold_spans(heading));
            html.push_str("</strong>");
        } else if let Some(item) = list_item(trimmed) {
            html.push_str("<li>");
            html.push_str(&bold_spans(item));
            html.push_str("</li>");
            continue;
        } else {
            html.push_str(&bold_spans(line));
        }

        if i < last {
            html.push_str("<br>");
        }
    }

    html
}

fn list_item(line: &str) -> Option<&str> {
    line.strip_prefix("- ").or_else(|| line.strip_prefix("* "))
}

fn bold_spans(line: &str) -> std::borrow::Cow<'_, str> {
    BOLD_SPAN.replace_all(line, "<strong>$1</strong>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_only_gains_line_breaks() {
        let text = "Line one\nLine two\n\nLine four";
        assert_eq!(inline_format(text), text.replace('\n', "<br>"));
    }

    #[test]
    fn crlf_line_endings_match_lf() {
        let lf = "### Title\nIntro\n- oats\n- beans\nEnd";
        let crlf = lf.replace('\n', "\r\n");
        assert_eq!(inline_format(&crlf), inline_format(lf));
        assert!(!inline_format(&crlf).contains('\r'));
    }

    #[test]
    fn bold_asterisks_are_not_list_markers() {
        assert_eq!(
            inline_format("**Key point** stays a paragraph"),
            "<strong>Key point</strong> stays a paragraph"
        );
    }

    #[test]
    fn hyphen_inside_line_is_not_a_list_item() {
        assert_eq!(inline_format("well - known fact"), "well - known fact");
    }

    #[test]
    fn star_list_items_are_supported() {
        assert_eq!(inline_format("* a\n* b"), "<li>a</li><li>b</li>");
    }

    #[test]
    fn bold_inside_list_item() {
        assert_eq!(
            inline_format("- **Oats**: soluble fiber"),
            "<li><strong>Oats</strong>: soluble fiber</li>"
        );
    }

    #[test]
    fn heading_at_end_of_text() {
        assert_eq!(inline_format("intro\n### End"), "intro<br><strong>End</strong>");
    }

    #[test]
    fn unmatched_bold_marker_is_left_alone() {
        assert_eq!(inline_format("a ** b"), "a ** b");
    }

    #[test]
    fn empty_input() {
        assert_eq!(inline_format(""), "");
    }
}
