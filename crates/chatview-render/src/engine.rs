//! Line-oriented block-state scanner at the heart of the renderer.
//!
//! Every call re-parses the entire accumulated buffer from the first line.
//! No parser state survives between calls; an open code block exists only
//! because the buffer contains an odd number of fence lines. The caller
//! appends streamed text and renders again with the grown buffer.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::blocks::{self, CodeBlockContext};
use crate::escape::{double_backslashes, escape_for_script_literal, escape_html};
use crate::inline::transform_inline;

const THINKING_OPEN_MARKER: &str = "<thinking>";
const THINKING_CLOSE_MARKER: &str = "</thinking>";

// A fence is backticks plus an optional bare language tag, nothing else.
static FENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*`{3,}([A-Za-z0-9_+\-]*)\s*$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockState {
    None,
    InCodeBlock,
    InLatexBlock,
}

/// Renders the full message buffer and escapes the result so it can sit
/// inside one quoted argument of a script-execution call.
pub fn render(raw: &str, include_code_buttons: bool) -> String {
    escape_for_script_literal(&render_html(raw, include_code_buttons))
}

/// Renders the full message buffer to an HTML fragment, without the final
/// literal-escape pass.
pub fn render_html(raw: &str, include_code_buttons: bool) -> String {
    Renderer::new(include_code_buttons).run(raw)
}

struct Renderer {
    include_code_buttons: bool,
    block_state: BlockState,
    quote_depth: usize,
    thinking_blocks: usize,
    latex_buffer: String,
    next_block_id: usize,
    out: String,
}

impl Renderer {
    fn new(include_code_buttons: bool) -> Self {
        Self {
            include_code_buttons,
            block_state: BlockState::None,
            quote_depth: 0,
            thinking_blocks: 0,
            latex_buffer: String::new(),
            next_block_id: 0,
            out: String::new(),
        }
    }

    fn run(mut self, raw: &str) -> String {
        let text = raw.replace('\r', "");
        let text = text.trim_start_matches(' ');
        for line in text.split('\n') {
            match self.block_state {
                BlockState::None => self.scan_line(line),
                BlockState::InCodeBlock => self.code_line(line),
                BlockState::InLatexBlock => self.latex_line(line),
            }
        }
        self.finish();
        blocks::trim_thinking_spacing(&self.out)
    }

    fn scan_line(&mut self, line: &str) {
        let line = self.take_thinking_markers(line);
        let content = self.step_quote_depth(&line);

        if let Some(caps) = FENCE_RE.captures(&content) {
            let ctx = CodeBlockContext::new(&caps[1], self.next_block_id);
            self.next_block_id += 1;
            let open = blocks::code_block_open(&ctx, self.include_code_buttons);
            self.out.push_str(&open);
            self.block_state = BlockState::InCodeBlock;
            return;
        }

        if self.try_latex_open(&content) {
            return;
        }

        let escaped = escape_html(&content);
        self.out.push_str(&transform_inline(&escaped));
    }

    /// Strips every thinking marker from the line, emitting wrapper markup
    /// as each is found. Both marker kinds increment the counter; the
    /// end-of-input drain emits one closing tag per count.
    fn take_thinking_markers(&mut self, line: &str) -> String {
        if !line.contains('<') {
            return line.to_string();
        }
        let mut rest = line.to_string();
        loop {
            let open = rest.find(THINKING_OPEN_MARKER);
            let close = rest.find(THINKING_CLOSE_MARKER);
            let (at, len, markup) = match (open, close) {
                (Some(o), Some(c)) if o < c => {
                    (o, THINKING_OPEN_MARKER.len(), blocks::thinking_open())
                }
                (Some(o), None) => (o, THINKING_OPEN_MARKER.len(), blocks::thinking_open()),
                (_, Some(c)) => (c, THINKING_CLOSE_MARKER.len(), blocks::thinking_close()),
                (None, None) => break,
            };
            self.out.push_str(markup);
            self.thinking_blocks += 1;
            rest.replace_range(at..at + len, "");
        }
        rest
    }

    /// Counts leading `>` markers, emits blockquote tags to step from the
    /// previous depth to this line's depth, and returns the line with its
    /// quote markers stripped.
    fn step_quote_depth(&mut self, line: &str) -> String {
        let mut rest = line.trim_start();
        let mut depth = 0usize;
        while let Some(stripped) = rest.strip_prefix('>') {
            depth += 1;
            rest = stripped.strip_prefix(' ').unwrap_or(stripped);
        }
        while self.quote_depth > depth {
            self.out.push_str(blocks::blockquote_close());
            self.quote_depth -= 1;
        }
        while self.quote_depth < depth {
            self.out.push_str(blocks::blockquote_open());
            self.quote_depth += 1;
        }
        if depth > 0 {
            rest.to_string()
        } else {
            line.to_string()
        }
    }

    /// Handles a line that starts a latex block. Returns false when the
    /// line is not a latex opener at all.
    fn try_latex_open(&mut self, line: &str) -> bool {
        let trimmed = line.trim_start();
        let (remainder, closer) = if let Some(rest) = trimmed.strip_prefix("$$") {
            (rest, "$$")
        } else if let Some(rest) = trimmed.strip_prefix("\\[") {
            (rest, "\\]")
        } else {
            return false;
        };
        if let Some(end) = remainder.find(closer) {
            // Opened and closed on one line; anything past the closer is
            // dropped.
            self.latex_buffer.push_str(&remainder[..end]);
            self.flush_latex();
        } else {
            if !remainder.is_empty() {
                self.latex_buffer.push_str(remainder);
                self.latex_buffer.push('\n');
            }
            self.block_state = BlockState::InLatexBlock;
        }
        true
    }

    fn latex_line(&mut self, line: &str) {
        let dollar = line.find("$$");
        let bracket = line.find("\\]");
        let at = match (dollar, bracket) {
            (Some(d), Some(b)) => Some(d.min(b)),
            (Some(d), None) => Some(d),
            (None, Some(b)) => Some(b),
            (None, None) => None,
        };
        match at {
            Some(at) => {
                self.latex_buffer.push_str(&line[..at]);
                self.flush_latex();
                self.block_state = BlockState::None;
            }
            None => {
                self.latex_buffer.push_str(line);
                self.latex_buffer.push('\n');
            }
        }
    }

    fn flush_latex(&mut self) {
        let span = blocks::math_block(&self.latex_buffer);
        self.out.push_str(&span);
        self.latex_buffer.clear();
    }

    fn code_line(&mut self, line: &str) {
        if FENCE_RE.is_match(line) {
            self.out.push_str(blocks::code_block_close());
            self.block_state = BlockState::None;
            return;
        }
        let escaped = escape_html(line);
        self.out.push_str(&double_backslashes(&escaped));
        self.out.push('\n');
    }

    fn finish(&mut self) {
        if self.block_state == BlockState::InCodeBlock {
            self.out.push_str(blocks::code_block_close());
        }
        // An unterminated latex block is withheld for this call; the next
        // call re-scans the buffer with the closer included.
        while self.quote_depth > 0 {
            self.out.push_str(blocks::blockquote_close());
            self.quote_depth -= 1;
        }
        while self.thinking_blocks > 0 {
            self.out.push_str(blocks::thinking_close());
            self.thinking_blocks -= 1;
        }
    }
}
