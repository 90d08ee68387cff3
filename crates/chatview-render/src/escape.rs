//! Escaping and encoding layers.
//!
//! Three transforms for three different consumers: HTML entity escaping for
//! text that is displayed directly, base64 for content the panel script
//! decodes before display, and string-literal escaping for embedding the
//! finished fragment inside one quoted script argument. Each layer is
//! independent and applied at a different stage of the render pass.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Escape HTML-sensitive characters so message text cannot inject markup.
///
/// The ampersand is replaced first so already-produced entities are not
/// double-escaped.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Double every backslash in a raw code block line.
///
/// Code content is displayed as literal monospace text; doubling keeps the
/// backslashes intact through the final literal escape, which rewrites the
/// surrounding newlines into `\n` sequences.
pub fn double_backslashes(text: &str) -> String {
    text.replace('\\', "\\\\")
}

/// Base64-encode a payload for an inline span or math block.
///
/// The encoded form contains no quotes, newlines, or markdown punctuation,
/// so neither the emphasis passes nor the final literal escape can corrupt
/// it. The panel script decodes it before display.
pub fn encode_base64(text: &str) -> String {
    STANDARD.encode(text)
}

/// Escape a rendered HTML fragment for embedding as a single quoted string
/// argument of a script call: carriage returns are dropped, then double
/// quotes, single quotes, and newlines are escaped.
///
/// Backslashes are left alone; code block lines had theirs doubled upstream
/// and everything else is entity-escaped prose.
pub fn escape_for_script_literal(html: &str) -> String {
    html.replace('\r', "")
        .replace('"', "\\\"")
        .replace('\'', "\\'")
        .replace('\n', "\\n")
}
