use anyhow::Result;
use tracing::debug;

pub fn run(text: &str, raw: bool, include_buttons: bool) -> Result<()> {
    debug!("Rendering {} bytes (raw: {raw})", text.len());
    println!("{}", render_text(text, raw, include_buttons));
    Ok(())
}

/// Render the whole input in one call. `raw` skips the script-literal
/// escaping so the plain HTML fragment can be inspected.
fn render_text(text: &str, raw: bool, include_buttons: bool) -> String {
    if raw {
        chatview_render::render_html(text, include_buttons)
    } else {
        chatview_render::render(text, include_buttons)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_keeps_real_newlines() {
        let text = "```\na\n```";
        let raw = render_text(text, true, false);
        let escaped = render_text(text, false, false);

        assert!(raw.contains("a\n</pre>"));
        assert!(!escaped.contains('\n'));
        assert!(escaped.contains("a\\n</pre>"));
    }

    #[test]
    fn test_escaped_output_quotes_attributes_for_splicing() {
        let escaped = render_text("```python\nprint(1)\n```", false, false);
        assert!(escaped.contains("lang=\\\"python\\\""));
    }
}
