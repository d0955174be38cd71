//! Text-cleaning stages applied to raw model output before parsing.
//!
//! Each stage is idempotent: running it twice yields the same text as running it once.

use once_cell::sync::Lazy;
use regex::Regex;

const FENCE: &str = "```";

static LINE_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)//.*$").expect("line comment pattern is valid"));

static TRAILING_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:,\s*)+([\]}])").expect("trailing comma pattern is valid"));

/// Strips a wrapping ```json ... ``` or ``` ... ``` fence.
///
/// Tolerant: a fence on only one side is removed without complaint; whatever
/// is left will fail to parse later if it is not JSON.
pub fn strip_fences(text: &str) -> &str {
    let mut body = text.trim();

    if let Some(rest) = body.strip_prefix(FENCE) {
        body = strip_language_tag(rest).trim_start();
    }
    if let Some(rest) = body.strip_suffix(FENCE) {
        body = rest;
    }

    body.trim()
}

/// Drops a leading `json` tag (any case) left behind after the opening fence.
fn strip_language_tag(text: &str) -> &str {
    match text.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => &text[4..],
        _ => text,
    }
}

/// Removes `//` comments through end of line.
///
/// Line-scoped heuristic: a `//` inside a string literal (a URL, say) is
/// treated as a comment too.
pub fn strip_line_comments(text: &str) -> String {
    LINE_COMMENT.replace_all(text, "").into_owned()
}

/// Removes a run of commas sitting directly before `}` or `]`, whitespace allowed in between.
pub fn repair_trailing_commas(text: &str) -> String {
    TRAILING_COMMA.replace_all(text, "$1").into_owned()
}
