// ============================================================================
// Log Sanitization - Safe Rendering of Form Input in Logs
// ============================================================================
//
// Descriptions, identifiers and server messages all originate outside this
// process. Before any of them reaches a `tracing` event they pass through
// `sanitize_for_log`, which strips newlines, ANSI escapes and other control
// characters and caps the length, so one field can never forge a log line.
//
// Bearer tokens are never logged; `redact_sensitive` keeps only their length.
//
// ============================================================================

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum number of characters kept from a logged value.
const MAX_LOG_LENGTH: usize = 200;

/// Characters of a description shown in request logs.
const DESCRIPTION_PREVIEW_LENGTH: usize = 40;

static ANSI_ESCAPE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\x1b\[[0-9;]*[a-zA-Z]").expect("ANSI escape pattern is valid")
});

/// Sanitize user-provided text for a single log line.
///
/// ```
/// use inquiry_pipeline::utils::log_sanitizer::sanitize_for_log;
///
/// assert_eq!(sanitize_for_log("b1\nINFO: forged"), "b1 INFO: forged");
/// assert_eq!(sanitize_for_log("p1\x1b[31m"), "p1");
/// ```
pub fn sanitize_for_log(input: &str) -> String {
    truncate_chars(&strip_control(input), MAX_LOG_LENGTH)
}

/// Short, single-line preview of an inquiry description.
pub fn description_preview(description: &str) -> String {
    truncate_chars(&strip_control(description.trim()), DESCRIPTION_PREVIEW_LENGTH)
}

/// Never log secrets in full; only their length.
pub fn redact_sensitive(input: &str) -> String {
    format!("[REDACTED-{}]", input.len())
}

fn strip_control(input: &str) -> String {
    ANSI_ESCAPE_REGEX
        .replace_all(input, "")
        .chars()
        .filter_map(|c| match c {
            '\n' | '\r' | '\t' => Some(' '),
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect()
}

// Counts characters, not bytes, so multi-byte input never splits mid-char.
fn truncate_chars(input: &str, max: usize) -> String {
    match input.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &input[..cut]),
        None => input.to_string(),
    }
}
