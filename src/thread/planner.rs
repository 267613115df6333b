//! Segment planning for threaded posts.
//!
//! Planning works in four passes over the normalized text:
//!
//! 1. Greedy sentence packing against the effective limit (the platform limit
//!    minus [`RESERVED_MARKER_WIDTH`]).
//! 2. Short-tail repair: a final segment under [`MIN_TAIL_LENGTH`] is merged
//!    with its predecessor and re-split at the most balanced word boundary.
//! 3. Density repair: plans with more than [`DENSITY_SEGMENT_THRESHOLD`]
//!    segments where any segment is under [`DENSITY_MIN_LENGTH`] are replaced
//!    by pure word packing when that yields strictly fewer segments.
//! 4. Marker injection for multi-segment plans.
//!
//! Lengths are counted in Unicode scalar values. Content is never truncated:
//! a sentence (or word) longer than the effective limit becomes its own
//! oversized segment.

use tracing::{debug, warn};

use super::markers::{marker_prefix, strip_thread_markers};
use super::{PlanError, ThreadPlan, ThreadSegment};

/// Characters reserved for the `(NN/NN) ` marker prefix.
pub const RESERVED_MARKER_WIDTH: usize = 8;

/// Final segments shorter than this trigger short-tail repair.
pub const MIN_TAIL_LENGTH: usize = 50;

/// Density repair applies to plans with more segments than this.
pub const DENSITY_SEGMENT_THRESHOLD: usize = 3;

/// Density repair applies when any segment is shorter than this.
pub const DENSITY_MIN_LENGTH: usize = 100;

/// How many words either side of the midpoint short-tail repair considers.
const REBALANCE_WINDOW: usize = 10;

pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Split text into a plan of segments that each fit within `limit`.
///
/// # Errors
///
/// Returns [`PlanError::InvalidLimit`] if `limit` is zero.
pub fn plan_thread(text: &str, limit: usize) -> Result<ThreadPlan, PlanError> {
    if limit == 0 {
        return Err(PlanError::InvalidLimit(limit));
    }

    let normalized = strip_thread_markers(text);
    let length = char_len(&normalized);

    if length <= limit {
        debug!(length, limit, "Content fits in a single post");
        return Ok(ThreadPlan::single(normalized, limit));
    }

    let effective = limit.saturating_sub(RESERVED_MARKER_WIDTH);

    let mut segments = split_by_sentences(&normalized, effective);

    if segments.len() > 1 && segments.last().is_some_and(|s| char_len(s) < MIN_TAIL_LENGTH) {
        segments = rebalance_short_tail(segments, effective);
    }

    if segments.len() > DENSITY_SEGMENT_THRESHOLD
        && segments.iter().any(|s| char_len(s) < DENSITY_MIN_LENGTH)
    {
        let by_words = split_by_words(&normalized, effective);
        if by_words.len() < segments.len() {
            debug!(
                sentence_segments = segments.len(),
                word_segments = by_words.len(),
                "Word packing produced fewer segments"
            );
            segments = by_words;
        }
    }

    let plan = inject_markers(segments, limit);
    for segment in plan.segments() {
        if !segment.fits(limit) {
            warn!(
                index = segment.index,
                total = segment.total,
                length = segment.display_len(),
                limit,
                "Segment exceeds the platform limit"
            );
        }
    }

    Ok(plan)
}

/// Greedily pack sentences (split on `". "`) into segments of at most
/// `max_length` characters.
#[must_use]
pub fn split_by_sentences(content: &str, max_length: usize) -> Vec<String> {
    let parts: Vec<&str> = content.split(". ").collect();
    let last = parts.len().saturating_sub(1);
    let sentences = parts.iter().enumerate().map(|(i, part)| {
        if i < last {
            format!("{part}.")
        } else {
            (*part).to_string()
        }
    });
    pack(sentences, max_length)
}

/// Greedily pack whitespace-separated words into segments of at most
/// `max_length` characters.
#[must_use]
pub fn split_by_words(content: &str, max_length: usize) -> Vec<String> {
    pack(content.split_whitespace().map(str::to_string), max_length)
}

fn pack(units: impl Iterator<Item = String>, max_length: usize) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for unit in units {
        let unit_len = char_len(&unit);
        let separator = usize::from(!current.is_empty());
        if current_len + separator + unit_len <= max_length {
            if separator == 1 {
                current.push(' ');
            }
            current.push_str(&unit);
            current_len += separator + unit_len;
        } else {
            if !current.is_empty() {
                segments.push(current.trim().to_string());
            }
            current = unit;
            current_len = unit_len;
        }
    }

    if !current.is_empty() {
        segments.push(current.trim().to_string());
    }

    segments
}

/// Merge the last two segments and re-split them at the word boundary near
/// the midpoint that maximizes the shorter half.
///
/// The original pair is kept when no legal split beats its balance.
#[must_use]
pub fn rebalance_short_tail(mut segments: Vec<String>, max_length: usize) -> Vec<String> {
    if segments.len() < 2 {
        return segments;
    }
    let (Some(last), Some(second_last)) = (segments.pop(), segments.pop()) else {
        return segments;
    };

    let old_min = char_len(&second_last).min(char_len(&last));
    let combined = format!("{second_last} {last}");
    let words: Vec<&str> = combined.split_whitespace().collect();
    let mid = words.len() / 2;
    let window = REBALANCE_WINDOW.min(words.len() / 4);

    let mut best: Option<(usize, String, String)> = None;
    for idx in mid.saturating_sub(window)..=mid + window {
        if idx == 0 || idx >= words.len() {
            continue;
        }
        let first = words[..idx].join(" ");
        let second = words[idx..].join(" ");
        let (first_len, second_len) = (char_len(&first), char_len(&second));
        if first_len > max_length || second_len > max_length {
            continue;
        }
        let balance = first_len.min(second_len);
        if best.as_ref().map_or(true, |(b, _, _)| balance > *b) {
            best = Some((balance, first, second));
        }
    }

    match best {
        Some((balance, first, second)) if balance > old_min => {
            debug!(old_min, new_min = balance, "Rebalanced short final segment");
            segments.push(first);
            segments.push(second);
        }
        _ => {
            segments.push(second_last);
            segments.push(last);
        }
    }
    segments
}

fn inject_markers(raw_segments: Vec<String>, limit: usize) -> ThreadPlan {
    let total = raw_segments.len();
    if total == 1 {
        let raw = raw_segments.into_iter().next().unwrap_or_default();
        return ThreadPlan::single(raw, limit);
    }
    let segments = raw_segments
        .into_iter()
        .enumerate()
        .map(|(i, raw)| {
            let index = i + 1;
            ThreadSegment {
                index,
                total,
                text: format!("{}{raw}", marker_prefix(index, total)),
                raw,
            }
        })
        .collect();
    ThreadPlan::new(segments, limit)
}
