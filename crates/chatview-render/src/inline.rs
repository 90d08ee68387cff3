//! Inline markdown transforms applied to a single prose line.
//!
//! The input line is already HTML-escaped. Inline code and inline math are
//! rewritten first and their payloads lifted into base64, so none of the
//! later passes can rewrite text the user typed inside backticks or math
//! delimiters.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::escape::encode_base64;

static INLINE_CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`]+)`").unwrap());

static INLINE_MATH_DOLLAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$([^$]+?)\$").unwrap());

static INLINE_MATH_PAREN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\\((.+?)\\\)").unwrap());

// Headings shift down one level so a top-level `#` never competes with the
// panel's own h1.
static HEADING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#{1,6})\s+(.*)$").unwrap());

static BULLET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[*+\-]\s+").unwrap());

static RULE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*[-*_]{3,}\s*$").unwrap());

static BOLD_ITALIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*\*(.+?)\*\*\*").unwrap());

static BOLD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());

static ITALIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.+?)\*").unwrap());

static STRIKE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"~~(.+?)~~").unwrap());

fn math_span(content: &str) -> String {
    format!(
        "<span class=\"inline-math\">{}</span>",
        encode_base64(content)
    )
}

/// Transforms one already-escaped prose line into HTML and appends the
/// trailing `<br>` that stands in for the newline.
pub fn transform_inline(escaped: &str) -> String {
    let mut text = INLINE_CODE_RE
        .replace_all(escaped, |caps: &regex::Captures| {
            format!(
                "<code class=\"inline-code\">{}</code>",
                encode_base64(&caps[1])
            )
        })
        .to_string();

    text = INLINE_MATH_DOLLAR_RE
        .replace_all(&text, |caps: &regex::Captures| math_span(&caps[1]))
        .to_string();
    text = INLINE_MATH_PAREN_RE
        .replace_all(&text, |caps: &regex::Captures| math_span(&caps[1]))
        .to_string();

    if let Some(caps) = HEADING_RE.captures(&text) {
        // `#` renders as h2 and the deeper levels follow, capped at h6.
        let level = (caps[1].len() + 1).min(6);
        text = format!("<h{level}>{}</h{level}>", &caps[2]);
    } else if RULE_RE.is_match(&text) {
        text = "<hr>".to_string();
    } else {
        text = BULLET_RE.replace(&text, "\u{2022} ").to_string();
    }

    text = BOLD_ITALIC_RE
        .replace_all(&text, "<b><i>$1</i></b>")
        .to_string();
    text = BOLD_RE.replace_all(&text, "<b>$1</b>").to_string();
    text = ITALIC_RE.replace_all(&text, "<i>$1</i>").to_string();
    text = STRIKE_RE.replace_all(&text, "<s>$1</s>").to_string();

    text.push_str("<br>");
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::escape::escape_html;

    #[test]
    fn test_headings_shift_down_one_level() {
        assert_eq!(transform_inline("# Title"), "<h2>Title</h2><br>");
        assert_eq!(transform_inline("### Sub"), "<h4>Sub</h4><br>");
        assert_eq!(transform_inline("###### Deep"), "<h6>Deep</h6><br>");
    }

    #[test]
    fn test_seven_hashes_is_not_a_heading() {
        // Only up to six leading hashes count; more is left as prose.
        assert_eq!(transform_inline("####### nope"), "####### nope<br>");
    }

    #[test]
    fn test_inline_code_payload_is_base64() {
        let escaped = escape_html("run `ls -la` now");
        let html = transform_inline(&escaped);
        assert_eq!(
            html,
            "run <code class=\"inline-code\">bHMgLWxh</code> now<br>"
        );
    }

    #[test]
    fn test_inline_code_encodes_the_escaped_form() {
        // `<b>` inside backticks arrives here as &lt;b&gt; and that is what
        // gets encoded, so the client decodes entity text, not live markup.
        let escaped = escape_html("`<b>`");
        let html = transform_inline(&escaped);
        assert_eq!(
            html,
            format!(
                "<code class=\"inline-code\">{}</code><br>",
                encode_base64("&lt;b&gt;")
            )
        );
    }

    #[test]
    fn test_inline_math_dollar_and_paren_forms() {
        assert_eq!(
            transform_inline("$x^2$"),
            "<span class=\"inline-math\">eF4y</span><br>"
        );
        assert_eq!(
            transform_inline(r"\(x^2\)"),
            "<span class=\"inline-math\">eF4y</span><br>"
        );
    }

    #[test]
    fn test_bullet_marker_becomes_dot() {
        assert_eq!(transform_inline("- item"), "\u{2022} item<br>");
        assert_eq!(transform_inline("* item"), "\u{2022} item<br>");
        assert_eq!(transform_inline("+ item"), "\u{2022} item<br>");
    }

    #[test]
    fn test_horizontal_rule() {
        assert_eq!(transform_inline("---"), "<hr><br>");
        assert_eq!(transform_inline("  *****  "), "<hr><br>");
        // Spaced dashes are a bullet line, not a rule.
        assert_eq!(transform_inline("- - -"), "\u{2022} - -<br>");
    }

    #[test]
    fn test_emphasis_ordering() {
        assert_eq!(
            transform_inline("***both*** **bold** *italic* ~~gone~~"),
            "<b><i>both</i></b> <b>bold</b> <i>italic</i> <s>gone</s><br>"
        );
    }

    #[test]
    fn test_emphasis_inside_heading() {
        assert_eq!(
            transform_inline("## A **strong** point"),
            "<h3>A <b>strong</b> point</h3><br>"
        );
    }

    #[test]
    fn test_code_payload_shields_emphasis_markers() {
        let html = transform_inline("`**not bold**`");
        assert_eq!(
            html,
            format!(
                "<code class=\"inline-code\">{}</code><br>",
                encode_base64("**not bold**")
            )
        );
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_plain_line_gets_trailing_break() {
        assert_eq!(transform_inline("hello"), "hello<br>");
        assert_eq!(transform_inline(""), "<br>");
    }
}
