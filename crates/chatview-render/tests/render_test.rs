use chatview_render::escape::encode_base64;
use chatview_render::{render, render_html};

/// Fails if the output could terminate the quoted script argument it gets
/// embedded into.
fn assert_script_literal_safe(output: &str) {
    assert!(
        !output.contains('\n') && !output.contains('\r'),
        "raw line ending in output: {output:?}"
    );
    let without_escaped = output.replace("\\\"", "").replace("\\'", "");
    assert!(
        !without_escaped.contains('"'),
        "unescaped double quote in output: {output:?}"
    );
    assert!(
        !without_escaped.contains('\''),
        "unescaped single quote in output: {output:?}"
    );
}

#[test]
fn test_python_block_scenario_without_buttons() {
    let html = render_html("before\n```python\nprint(1)\n```\nafter", false);
    eprintln!("python scenario: {html}");
    assert_eq!(
        html,
        "before<br><pre class=\"code-block\" lang=\"python\" id=\"code-block-0\">print(1)\n</pre>after<br>"
    );
    assert!(!html.contains("code-action"), "buttons were disabled");
}

#[test]
fn test_emphasis_and_inline_code_scenario() {
    let html = render_html("**bold** and *italic* and `code`", false);
    assert_eq!(
        html,
        "<b>bold</b> and <i>italic</i> and <code class=\"inline-code\">Y29kZQ==</code><br>"
    );
}

#[test]
fn test_block_latex_fixture_decodes_with_newline() {
    let html = render_html("$$\nx^2\n$$", false);
    // eF4yCg== is "x^2\n": the accumulator keeps the line terminator.
    assert_eq!(html, "<span class=\"block-math\">eF4yCg==</span>");
}

#[test]
fn test_idempotence_on_static_input() {
    let input = "# Title\n> quoted `x`\n```diff\n-a\n+b\n```\n$$\ny\n$$\n<thinking>\nhmm\n</thinking>\ndone";
    let first = render(input, true);
    let second = render(input, true);
    assert_eq!(first, second);
}

#[test]
fn test_odd_fence_count_closes_exactly_once_at_end() {
    let html = render_html("```\na\n```\n```\nb", false);
    assert_eq!(html.matches("<pre").count(), 2);
    assert_eq!(html.matches("</pre>").count(), 2);
    assert!(
        html.ends_with("b\n</pre>"),
        "trailing code should end with the auto-close: {html}"
    );
}

#[test]
fn test_prose_escaping_survives_literal_embedding() {
    let input = "a < b & c > d\nshe said \"hi\" and 'bye'";
    let escaped = render(input, false);
    eprintln!("escaped output: {escaped}");
    assert!(escaped.contains("a &lt; b &amp; c &gt; d"));
    assert!(escaped.contains("&quot;hi&quot;"));
    assert!(escaped.contains("&#x27;bye&#x27;"));
    assert_script_literal_safe(&escaped);
}

#[test]
fn test_code_block_content_is_escaped_and_backslash_doubled() {
    let html = render_html("```c\nif (a < b && p != NULL) \\\n```", false);
    assert!(
        html.contains("if (a &lt; b &amp;&amp; p != NULL) \\\\\n"),
        "code line should be entity-escaped with doubled backslashes: {html}"
    );
}

#[test]
fn test_prose_backslashes_are_not_doubled() {
    let html = render_html("path is C:\\temp", false);
    assert!(html.contains("C:\\temp<br>"), "got: {html}");
}

#[test]
fn test_markdown_inside_code_span_stays_literal() {
    let html = render_html("use `**stars**` here", false);
    assert!(!html.contains("<b>"));
    assert!(html.contains(&encode_base64("**stars**")));
}

#[test]
fn test_diff_block_swaps_review_for_apply() {
    let diff = render_html("```diff\n-old\n+new\n```", true);
    let rust = render_html("```rust\nfn main() {}\n```", true);
    eprintln!("diff buttons: {diff}");
    assert!(diff.contains("style=\"display:none\" onclick=\"reviewChanges"));
    assert!(diff.contains("<button class=\"code-action-btn\" onclick=\"applyPatch"));
    assert!(rust.contains("<button class=\"code-action-btn\" onclick=\"reviewChanges"));
    assert!(rust.contains("style=\"display:none\" onclick=\"applyPatch"));
}

#[test]
fn test_full_message_with_every_construct() {
    let input = "# Plan\n<thinking>\nweigh options\n</thinking>\nUse `rg` over *plain* grep.\n> tip\n>> nested tip\n```bash\nrg -n \"todo\"\n```\nInline $x_i$ then a block:\n$$\n\\sum x_i\n$$\ndone";
    let html = render_html(input, true);
    eprintln!("full message: {html}");

    assert!(html.contains("<h2>Plan</h2>"));
    assert!(html.contains("<details class=\"thinking\"><summary>"));
    assert!(html.contains("<code class=\"inline-code\">cmc=</code>"));
    assert!(html.contains("<i>plain</i>"));
    assert!(html.contains("<blockquote>tip<br><blockquote>nested tip<br></blockquote></blockquote>"));
    assert!(html.contains("lang=\"bash\""));
    assert!(html.contains("<span class=\"inline-math\">eF9p</span>"));
    assert!(html.contains(&format!(
        "<span class=\"block-math\">{}</span>",
        encode_base64("\\sum x_i\n")
    )));
    // The open/close pair counted twice, so the drain appends two closes.
    assert!(html.ends_with("done<br></details></details>"));

    assert_script_literal_safe(&render(input, true));
}

#[test]
fn test_quote_tags_always_net_to_zero() {
    let fixtures = [
        "> a\n>> b\n> c\nd",
        ">>> deep only",
        "plain\n> one\nplain again",
        "> unclosed at end",
    ];
    for input in fixtures {
        let html = render_html(input, false);
        assert_eq!(
            html.matches("<blockquote>").count(),
            html.matches("</blockquote>").count(),
            "unbalanced quotes for {input:?}: {html}"
        );
    }
}
