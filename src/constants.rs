//! Shared constants used across the application.

/// User agent sent with outbound API requests.
pub const USER_AGENT: &str = concat!("social-content-dashboard/", env!("CARGO_PKG_VERSION"));

/// Number of rows shown on the history page.
pub const HISTORY_PAGE_SIZE: i64 = 50;

/// Content types offered on the generate form.
pub const CONTENT_TYPES: &[(&str, &str)] = &[
    ("trend_analysis", "Trend Analysis"),
    ("news_summary", "News Summary"),
    ("deep_dive", "Deep Dive"),
];

/// Tones offered on the generate form.
pub const TONES: &[&str] = &["Professional", "Casual", "Conversational", "Authoritative"];
