//! Per-platform content formatting.
//!
//! Generated text is cleaned of markdown, adjusted for the platform's tone,
//! tagged with hashtags and fitted to the platform's character limit. Bluesky
//! output is capped at 300 characters here, so threading only applies to
//! content that is edited or refined after formatting.

use std::sync::LazyLock;

use regex::Regex;

use crate::platforms::Platform;
use crate::thread::markers::collapse_whitespace;

static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());

static ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*(.*?)\*").unwrap());

static CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`(.*?)`").unwrap());

const ELLIPSIS: &str = "...";

/// Keyword to hashtag table, matched against lowercased words.
const HASHTAG_KEYWORDS: &[(&str, &str)] = &[
    ("ai", "#AI"),
    ("artificial", "#AI"),
    ("intelligence", "#AI"),
    ("machine", "#MachineLearning"),
    ("learning", "#MachineLearning"),
    ("technology", "#Technology"),
    ("tech", "#Tech"),
    ("data", "#Data"),
    ("analytics", "#DataAnalytics"),
    ("business", "#Business"),
    ("startup", "#Startup"),
    ("innovation", "#Innovation"),
    ("digital", "#Digital"),
    ("future", "#Future"),
    ("trends", "#Trends"),
    ("industry", "#Industry"),
    ("market", "#Market"),
    ("finance", "#Finance"),
    ("investment", "#Investment"),
    ("crypto", "#Crypto"),
    ("blockchain", "#Blockchain"),
    ("productivity", "#Productivity"),
    ("work", "#Work"),
    ("remote", "#RemoteWork"),
    ("social", "#SocialMedia"),
    ("marketing", "#Marketing"),
    ("content", "#Content"),
    ("strategy", "#Strategy"),
    ("growth", "#Growth"),
    ("leadership", "#Leadership"),
    ("management", "#Management"),
];

/// Style of the general hashtag added after keyword matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashtagStyle {
    Professional,
    Casual,
    Community,
}

impl HashtagStyle {
    const fn tag(self) -> &'static str {
        match self {
            Self::Professional => "#Business",
            Self::Casual => "#Tech",
            Self::Community => "#Community",
        }
    }
}

/// Format `content` for `platform`.
#[must_use]
pub fn format_for_platform(content: &str, platform: Platform, include_hashtags: bool) -> String {
    match platform {
        Platform::LinkedIn => format_long_form(content, platform, include_hashtags),
        Platform::Twitter | Platform::Threads => {
            format_short_form(content, platform, include_hashtags, HashtagStyle::Casual)
        }
        Platform::Bluesky => {
            format_short_form(content, platform, include_hashtags, HashtagStyle::Community)
        }
    }
}

fn format_long_form(content: &str, platform: Platform, include_hashtags: bool) -> String {
    let mut formatted = clean_content(content);
    if !formatted.ends_with('.') {
        formatted.push('.');
    }

    let sentences: Vec<&str> = formatted.split(". ").collect();
    if sentences.len() > 3 {
        formatted = sentences
            .chunks(2)
            .map(|pair| pair.join(". "))
            .collect::<Vec<_>>()
            .join("\n\n");
    }

    if include_hashtags {
        let hashtags = generate_hashtags(
            content,
            platform.profile().hashtag_limit,
            HashtagStyle::Professional,
        );
        if !hashtags.is_empty() {
            formatted.push_str("\n\n");
            formatted.push_str(&hashtags.join(" "));
        }
    }

    trim_to_limit(&formatted, platform.char_limit())
}

fn format_short_form(
    content: &str,
    platform: Platform,
    include_hashtags: bool,
    style: HashtagStyle,
) -> String {
    let mut formatted = make_conversational(&clean_content(content));

    let hashtags = if include_hashtags {
        generate_hashtags(content, platform.profile().hashtag_limit, style)
    } else {
        Vec::new()
    };
    let hashtag_text = hashtags.join(" ");
    let reserved = if hashtags.is_empty() {
        0
    } else {
        char_count(&hashtag_text) + 2
    };
    let available = platform.char_limit().saturating_sub(reserved);

    if char_count(&formatted) > available {
        let kept: String = formatted
            .chars()
            .take(available.saturating_sub(ELLIPSIS.len()))
            .collect();
        formatted = format!("{}{ELLIPSIS}", kept.trim());
    }

    if !hashtags.is_empty() {
        formatted.push(' ');
        formatted.push_str(&hashtag_text);
    }

    formatted
}

/// Collapse whitespace and strip bold, italic and inline-code markdown.
#[must_use]
pub fn clean_content(content: &str) -> String {
    let collapsed = collapse_whitespace(content);
    let unbolded = BOLD.replace_all(&collapsed, "$1");
    let unitalicized = ITALIC.replace_all(&unbolded, "$1");
    CODE.replace_all(&unitalicized, "$1").into_owned()
}

/// Turn a statement that asks about what/how/why into a question.
#[must_use]
pub fn make_conversational(content: &str) -> String {
    if content.ends_with('?') || content.ends_with('!') {
        return content.to_string();
    }
    let lower = content.to_lowercase();
    if ["what", "how", "why"].iter().any(|w| lower.contains(w)) {
        format!("{}?", content.trim_end_matches('.'))
    } else {
        content.to_string()
    }
}

/// Hashtags for `content`: keyword matches in first-seen order, then the
/// style tag, truncated to `limit`.
#[must_use]
pub fn generate_hashtags(content: &str, limit: usize, style: HashtagStyle) -> Vec<&'static str> {
    let mut tags: Vec<&'static str> = Vec::new();

    for word in content.to_lowercase().split_whitespace() {
        let clean: String = word
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '_')
            .collect();
        let found = HASHTAG_KEYWORDS
            .iter()
            .find(|(keyword, _)| *keyword == clean)
            .map(|(_, tag)| *tag);
        if let Some(tag) = found {
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
    }

    if !tags.contains(&style.tag()) {
        tags.push(style.tag());
    }

    tags.truncate(limit);
    tags
}

/// Trim to `limit` characters at a word boundary, ending in `...`.
#[must_use]
pub fn trim_to_limit(content: &str, limit: usize) -> String {
    if char_count(content) <= limit {
        return content.to_string();
    }

    let mut trimmed: String = content
        .chars()
        .take(limit.saturating_sub(ELLIPSIS.len()))
        .collect();
    if let Some(last_space) = trimmed.rfind(' ').filter(|&i| i > 0) {
        trimmed.truncate(last_space);
    }
    trimmed.push_str(ELLIPSIS);
    trimmed
}

fn char_count(s: &str) -> usize {
    s.chars().count()
}
