//! Wrapper markup for multi-line constructs: fenced code, block math,
//! thinking sections, and blockquotes.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::escape::encode_base64;

/// Language tag that swaps the review button for the apply-patch button.
pub const DIFF_LANGUAGE: &str = "diff";

// Callback identifiers the host page wires up before any message renders.
const COPY_CALLBACK: &str = "copyCode";
const REPLACE_CALLBACK: &str = "replaceSelection";
const REVIEW_CALLBACK: &str = "reviewChanges";
const APPLY_CALLBACK: &str = "applyPatch";

const HIDDEN_STYLE: &str = " style=\"display:none\"";

static AFTER_SUMMARY_BREAKS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"</summary>(?:\s*<br>)+").unwrap());
static AFTER_DETAILS_BREAKS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"</details>(?:\s*<br>)+").unwrap());

/// Identity of one fenced code block, captured when its opening fence is
/// scanned. The id lands in the DOM so button callbacks can find the block.
#[derive(Debug, Clone)]
pub struct CodeBlockContext {
    pub language: String,
    pub block_id: String,
}

impl CodeBlockContext {
    pub fn new(language: &str, index: usize) -> Self {
        Self {
            language: language.to_string(),
            block_id: format!("code-block-{index}"),
        }
    }

    pub fn is_diff(&self) -> bool {
        self.language == DIFF_LANGUAGE
    }
}

fn action_button(callback: &str, label: &str, block_id: &str, hidden: bool) -> String {
    let style = if hidden { HIDDEN_STYLE } else { "" };
    format!(
        "<button class=\"code-action-btn\"{style} onclick=\"{callback}('{block_id}')\">{label}</button>"
    )
}

/// Opening markup for a code block: optional action buttons followed by the
/// `<pre>` container carrying the language and block id.
pub fn code_block_open(ctx: &CodeBlockContext, include_buttons: bool) -> String {
    let mut html = String::new();
    if include_buttons {
        // A diff payload gets the apply button, everything else gets
        // review. Both stay in the DOM so the host can flip them later.
        let diff = ctx.is_diff();
        html.push_str("<div class=\"code-actions\">");
        html.push_str(&action_button(COPY_CALLBACK, "Copy", &ctx.block_id, false));
        html.push_str(&action_button(
            REPLACE_CALLBACK,
            "Replace",
            &ctx.block_id,
            false,
        ));
        html.push_str(&action_button(REVIEW_CALLBACK, "Review", &ctx.block_id, diff));
        html.push_str(&action_button(APPLY_CALLBACK, "Apply", &ctx.block_id, !diff));
        html.push_str("</div>");
    }
    html.push_str(&format!(
        "<pre class=\"code-block\" lang=\"{}\" id=\"{}\">",
        ctx.language, ctx.block_id
    ));
    html
}

pub fn code_block_close() -> &'static str {
    "</pre>"
}

/// Wraps the accumulated latex buffer as a single base64 math span.
pub fn math_block(content: &str) -> String {
    format!(
        "<span class=\"block-math\">{}</span>",
        encode_base64(content)
    )
}

pub fn thinking_open() -> &'static str {
    "<details class=\"thinking\"><summary>Thinking\u{2026}</summary>"
}

pub fn thinking_close() -> &'static str {
    "</details>"
}

pub fn blockquote_open() -> &'static str {
    "<blockquote>"
}

pub fn blockquote_close() -> &'static str {
    "</blockquote>"
}

/// Drops the line-break markers that pile up right after a thinking summary
/// or section close, so collapsed sections do not carry stray blank lines.
pub fn trim_thinking_spacing(html: &str) -> String {
    let html = AFTER_SUMMARY_BREAKS_RE.replace_all(html, "</summary>");
    AFTER_DETAILS_BREAKS_RE
        .replace_all(&html, "</details>")
        .to_string()
}
