//! Review-changes support: unified diff between the current selection and a
//! replacement block from the message.

use std::io::Write;
use std::process::Command;

use anyhow::{bail, Context, Result};
use tracing::debug;

/// Diffs `original` against `replacement` with `git diff --no-index`.
///
/// Returns the unified diff with the temp-file headers rewritten to stable
/// `a/selection` and `b/replacement` names. An empty string means the two
/// texts are identical.
pub fn diff_against_selection(original: &str, replacement: &str) -> Result<String> {
    debug!(
        "Diffing selection ({} bytes) against replacement ({} bytes)",
        original.len(),
        replacement.len()
    );

    let mut original_file =
        tempfile::NamedTempFile::new().context("Failed to create temp file for selection")?;
    original_file
        .write_all(original.as_bytes())
        .context("Failed to write selection temp file")?;

    let mut replacement_file =
        tempfile::NamedTempFile::new().context("Failed to create temp file for replacement")?;
    replacement_file
        .write_all(replacement.as_bytes())
        .context("Failed to write replacement temp file")?;

    let output = Command::new("git")
        .args(["diff", "--no-index"])
        .arg(original_file.path())
        .arg(replacement_file.path())
        .output()
        .context("Failed to run git diff")?;

    // --no-index exits 1 when the files differ; anything else is a failure.
    match output.status.code() {
        Some(0) => return Ok(String::new()),
        Some(1) => {}
        _ => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("git diff failed: {}", stderr);
        }
    }

    let raw = String::from_utf8_lossy(&output.stdout);
    Ok(rewrite_headers(&raw))
}

/// Replaces the throwaway temp-file names in the diff header with names the
/// panel can display.
fn rewrite_headers(diff: &str) -> String {
    // Both file headers precede the first hunk, so only the first match of
    // each is a header; later ones are removed content lines.
    let mut minus_seen = false;
    let mut plus_seen = false;
    let mut lines = Vec::new();
    for line in diff.lines() {
        if line.starts_with("diff --git ") {
            lines.push("diff --git a/selection b/replacement".to_string());
        } else if !minus_seen && line.starts_with("--- ") {
            minus_seen = true;
            lines.push("--- a/selection".to_string());
        } else if !plus_seen && line.starts_with("+++ ") {
            plus_seen = true;
            lines.push("+++ b/replacement".to_string());
        } else {
            lines.push(line.to_string());
        }
    }
    let mut result = lines.join("\n");
    if diff.ends_with('\n') {
        result.push('\n');
    }
    result
}
