//! Assistant reply clean-up.
//!
//! Replies arrive with markdown emphasis and JSON-escaped newlines that the
//! panel cannot render. The rewrite order is fixed: `\n` escapes must become
//! real newlines before stray backslashes are dropped.

/// Strip emphasis markers and escapes from an assistant reply.
///
/// Every backslash left after newline un-escaping is removed, including ones
/// that were never part of an escape sequence. Trimming uses the Unicode
/// `White_Space` set (`str::trim`): U+0085 is trimmed, U+FEFF is kept.
#[must_use]
pub fn format_reply(text: &str) -> String {
    text.replace("**", "")
        .replace('*', "")
        .replace("\\n", "\n")
        .replace('\\', "")
        .trim()
        .to_owned()
}

#[cfg(test)]
#[path = "format_test.rs"]
mod tests;
