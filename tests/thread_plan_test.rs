//! Integration tests for thread planning.

use social_content_dashboard::thread::markers::contains_marker;
use social_content_dashboard::thread::{
    plan_thread, strip_thread_markers, RESERVED_MARKER_WIDTH,
};

fn words(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// A paragraph of varied sentences, roughly `n * 60` characters long.
fn article(n: usize) -> String {
    (0..n)
        .map(|i| {
            format!(
                "Sentence number {i} explains one more detail about async Rust{}.",
                " and executors".repeat(i % 3)
            )
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[test]
fn test_plan_preserves_every_word() {
    for n in [1, 5, 12, 30] {
        let text = article(n);
        let plan = plan_thread(&text, 300).expect("plan");
        let joined = plan.raw_texts().join(" ");
        assert_eq!(words(&joined), words(&text), "words lost for n={n}");
    }
}

#[test]
fn test_segments_fit_limit_and_are_numbered() {
    let text = article(30);
    let plan = plan_thread(&text, 300).expect("plan");

    assert!(plan.is_thread());
    assert!(plan.oversized_segments().is_empty());
    let total = plan.len();
    for (i, segment) in plan.segments().iter().enumerate() {
        assert_eq!(segment.index, i + 1);
        assert_eq!(segment.total, total);
        assert!(segment.text.starts_with(&format!("({}/{total}) ", i + 1)));
        assert!(segment.display_len() <= 300);
        assert!(segment.raw.chars().count() <= 300 - RESERVED_MARKER_WIDTH);
    }
}

#[test]
fn test_replanning_posted_text_is_stable() {
    let text = article(20);
    let first = plan_thread(&text, 300).expect("plan");

    // Feeding the marked thread back in must not nest markers.
    let marked = first.display_texts().join(" ");
    let second = plan_thread(&marked, 300).expect("replan");

    assert_eq!(first.raw_texts(), second.raw_texts());
    for segment in second.segments() {
        assert!(!contains_marker(&segment.raw));
    }
}

#[test]
fn test_strip_markers_is_idempotent() {
    let inputs = [
        "**Thread 1/3** Rust is great (1/3)",
        "1/2: First part\n\n  of the   post",
        "((1/2)1/2) nested",
        "Plain text with no markers.",
    ];
    for input in inputs {
        let once = strip_thread_markers(input);
        assert_eq!(strip_thread_markers(&once), once, "input: {input}");
        assert!(!once.contains("(1/"));
    }
}

#[test]
fn test_oversized_word_is_kept_whole() {
    let giant = "x".repeat(400);
    let text = format!("Intro sentence here. {giant} and a short ending.");
    let plan = plan_thread(&text, 300).expect("plan");

    let oversized = plan.oversized_segments();
    assert_eq!(oversized.len(), 1);
    assert!(oversized[0].raw.contains(&giant));
    assert_eq!(words(&plan.raw_texts().join(" ")), words(&text));
}

#[test]
fn test_small_limit_produces_many_segments() {
    let text = article(10);
    let plan = plan_thread(&text, 60).expect("plan");
    assert!(plan.len() >= 10);
    assert_eq!(plan.limit(), 60);
    assert_eq!(words(&plan.raw_texts().join(" ")), words(&text));
}

#[test]
fn test_multibyte_text_counts_characters() {
    // 290 characters but far more bytes.
    let text = "é".repeat(290);
    let plan = plan_thread(&text, 300).expect("plan");
    assert!(!plan.is_thread());
    assert_eq!(plan.segments()[0].text, text);
}
