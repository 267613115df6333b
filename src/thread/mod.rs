//! Long-content threading: marker normalization, segment planning and
//! reply-chain posting.

pub mod markers;
mod planner;
mod poster;

pub use markers::strip_thread_markers;
pub use planner::{
    plan_thread, rebalance_short_tail, split_by_sentences, split_by_words, DENSITY_MIN_LENGTH,
    DENSITY_SEGMENT_THRESHOLD, MIN_TAIL_LENGTH, RESERVED_MARKER_WIDTH,
};
pub use poster::{
    LinkedPoster, PostLink, PostRef, PublishOutcome, PublishStatus, ReplyRef, ThreadPoster,
};

use serde::Serialize;
use thiserror::Error;

use planner::char_len;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("segment limit must be positive, got {0}")]
    InvalidLimit(usize),
}

/// One unit of a thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreadSegment {
    /// 1-based position in the thread.
    pub index: usize,
    /// Number of segments in the thread.
    pub total: usize,
    /// Text to post, including the `(i/total) ` prefix on multi-segment plans.
    pub text: String,
    /// Text without the marker.
    pub raw: String,
}

impl ThreadSegment {
    #[must_use]
    pub fn display_len(&self) -> usize {
        char_len(&self.text)
    }

    /// Whether the posted text fits within `limit` characters.
    #[must_use]
    pub fn fits(&self, limit: usize) -> bool {
        self.display_len() <= limit
    }
}

/// Ordered segments for one post or thread. Always holds at least one segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreadPlan {
    segments: Vec<ThreadSegment>,
    limit: usize,
}

impl ThreadPlan {
    pub(crate) fn new(segments: Vec<ThreadSegment>, limit: usize) -> Self {
        debug_assert!(!segments.is_empty());
        Self { segments, limit }
    }

    pub(crate) fn single(text: String, limit: usize) -> Self {
        Self::new(
            vec![ThreadSegment {
                index: 1,
                total: 1,
                text: text.clone(),
                raw: text,
            }],
            limit,
        )
    }

    #[must_use]
    pub fn segments(&self) -> &[ThreadSegment] {
        &self.segments
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether the plan needs a reply chain.
    #[must_use]
    pub fn is_thread(&self) -> bool {
        self.segments.len() > 1
    }

    /// The character limit the plan was built for.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Texts to post, in order.
    #[must_use]
    pub fn display_texts(&self) -> Vec<&str> {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    /// Segment texts without markers, in order.
    #[must_use]
    pub fn raw_texts(&self) -> Vec<&str> {
        self.segments.iter().map(|s| s.raw.as_str()).collect()
    }

    /// Segments whose posted text is longer than the plan's limit.
    #[must_use]
    pub fn oversized_segments(&self) -> Vec<&ThreadSegment> {
        self.segments
            .iter()
            .filter(|s| !s.fits(self.limit))
            .collect()
    }
}
