//! `Content-Disposition` filename extraction.
//!
//! The conversion server names its payload through the header, either quoted
//! (`attachment; filename="chat-123.pdf"`) or bare
//! (`attachment;filename=gemini-chat-abc.pdf`). Anything that does not carry
//! the `attachment` disposition, or that yields an empty name, falls back to
//! the configured default.

use once_cell::sync::Lazy;
use regex::Regex;

/// `filename[^;=\n]*=((['"]).*?\2|[^;\n]*)` without the backreference the
/// `regex` crate does not support: each quote style is its own alternative,
/// tried before the bare form.
static FILENAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"filename[^;=\n]*=("[^"\n]*"|'[^'\n]*'|[^;\n]*)"#).unwrap()
});

/// Pull the suggested filename out of a `Content-Disposition` value.
///
/// Returns `None` when the header is not an attachment, has no `filename`
/// parameter, or the parameter is empty once quotes are stripped.
pub fn filename_from_disposition(header: &str) -> Option<String> {
    if !header.contains("attachment") {
        return None;
    }
    let raw = FILENAME_RE.captures(header)?.get(1)?.as_str();
    let name: String = raw.chars().filter(|c| !matches!(c, '"' | '\'')).collect();
    let name = name.trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Resolve the download name: header suggestion if any, else `default`.
pub fn resolve_filename(header: Option<&str>, default: &str) -> String {
    header
        .and_then(filename_from_disposition)
        .unwrap_or_else(|| default.to_string())
}
