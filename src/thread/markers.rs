//! Thread marker normalization.
//!
//! Content that comes back from a refinement pass can still carry markers from
//! an earlier split ("Thread 1/3", "(2/3)", a leading "1/3:"). They are removed
//! before planning so re-splitting never nests or miscounts markers.

use regex::Regex;

static MARKER_PATTERNS: std::sync::LazyLock<Vec<Regex>> = std::sync::LazyLock::new(|| {
    vec![
        // **Thread 1/3*** or **Thread 1/3**
        Regex::new(r"(?i)\*\*Thread\s+\d+/\d+\*\*\*?").unwrap(),
        // Thread 1/3: or Thread 1/3
        Regex::new(r"(?i)Thread\s+\d+/\d+:?").unwrap(),
        // (1/3) anywhere
        Regex::new(r"\(\d+/\d+\)").unwrap(),
        // 1/3: or 1/3 at the start
        Regex::new(r"^\d+/\d+:?\s*").unwrap(),
    ]
});

static WHITESPACE: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Collapse every whitespace run to a single space and trim the ends.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

fn strip_once(text: &str) -> String {
    let mut cleaned = collapse_whitespace(text);
    for pattern in MARKER_PATTERNS.iter() {
        cleaned = pattern.replace_all(&cleaned, "").into_owned();
    }
    collapse_whitespace(&cleaned)
}

/// Remove existing thread markers, collapse whitespace and trim.
///
/// Stripping a marker can expose another one (for example a leading "1/3:"
/// hidden behind indentation, or "((1/2)1/2)"), so the pass repeats until the
/// text stops changing. Every pass either shrinks the text or ends the loop,
/// which makes the result idempotent.
#[must_use]
pub fn strip_thread_markers(text: &str) -> String {
    let mut current = strip_once(text);
    loop {
        let next = strip_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Whether the text still contains a parenthesised position marker.
#[must_use]
pub fn contains_marker(text: &str) -> bool {
    MARKER_PATTERNS[2].is_match(text)
}

/// Format the `(i/total) ` prefix for a segment.
#[must_use]
pub fn marker_prefix(index: usize, total: usize) -> String {
    format!("({index}/{total}) ")
}
