//! Publishing to connected platforms.

use std::collections::BTreeMap;

use maud::{html, Markup};

use crate::components::{Alert, BaseLayout, CharCountBadge, Flash, PublishBadge};
use crate::platforms::{Platform, BLUESKY_CHAR_LIMIT};
use crate::thread::{plan_thread, PublishOutcome};
use crate::workspace::Workspace;

/// Parameters for rendering the publish page.
pub struct PublishPageParams<'a> {
    pub workspace: &'a Workspace,
    pub connected: &'a [Platform],
    pub results: Option<&'a BTreeMap<Platform, PublishOutcome>>,
    pub flash: Option<&'a Flash>,
}

#[must_use]
pub fn render_publish_page(params: &PublishPageParams<'_>) -> Markup {
    let available: Vec<Platform> = params
        .workspace
        .platforms()
        .into_iter()
        .filter(|p| params.connected.contains(p))
        .collect();

    let content = html! {
        h1 { "Publish" }

        @if let Some(flash) = params.flash {
            (flash)
        }

        @if let Some(results) = params.results {
            (results_section(results))
        }

        @if params.workspace.is_empty() {
            p {
                "No content generated yet. "
                a href="/" { "Generate content first." }
            }
        } @else if params.connected.is_empty() {
            (Alert::warning("No social media accounts connected."))
            p { a href="/accounts" { "Connect accounts first." } }
        } @else if available.is_empty() {
            (Alert::info("No content available for connected platforms."))
        } @else {
            form method="post" action="/publish" {
                fieldset {
                    legend { "Select platforms to publish to" }
                    @for platform in &available {
                        @if let Some(entry) = params.workspace.get(*platform) {
                            label {
                                input type="checkbox" name="platform" value=(platform.as_str()) checked;
                                " " (platform.name()) " "
                                (CharCountBadge::for_text(&entry.formatted, platform.char_limit()))
                            }
                            @if let Some(note) = length_note(*platform, &entry.formatted) {
                                small { (note) }
                            }
                        }
                    }
                }
                button type="submit" { "Publish Now" }
            }
        }
    };

    BaseLayout::new("Publish").active("/publish").render(content)
}

/// Warning shown next to content that will not go out as a single post.
fn length_note(platform: Platform, content: &str) -> Option<String> {
    match platform {
        Platform::Bluesky => plan_thread(content, BLUESKY_CHAR_LIMIT)
            .ok()
            .filter(|plan| plan.is_thread())
            .map(|plan| format!("Content will be split into {} thread posts", plan.len())),
        _ if content.chars().count() > platform.char_limit() => Some(format!(
            "Content exceeds {} characters and may be rejected",
            platform.char_limit()
        )),
        _ => None,
    }
}

fn results_section(results: &BTreeMap<Platform, PublishOutcome>) -> Markup {
    let successful = results.values().filter(|o| o.success()).count();
    let summary = format!("{successful}/{} platforms published successfully", results.len());
    let summary_alert = if successful == results.len() {
        Alert::success(&summary)
    } else if successful == 0 {
        Alert::error(&summary)
    } else {
        Alert::warning(&summary)
    };

    html! {
        section id="results" {
            h2 { "Results" }
            (summary_alert)
            @for (platform, outcome) in results {
                div {
                    strong { (platform.name()) } " "
                    (PublishBadge(outcome.status))
                    p { (outcome.message) }
                    @if outcome.links.len() > 1 {
                        ol {
                            @for link in &outcome.links {
                                li { code { (link.post.uri) } }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_publish_without_content() {
        let workspace = Workspace::default();
        let html = render_publish_page(&PublishPageParams {
            workspace: &workspace,
            connected: &[],
            results: None,
            flash: None,
        })
        .into_string();
        assert!(html.contains("No content generated yet."));
    }

    #[test]
    fn test_render_publish_requires_connection() {
        let mut workspace = Workspace::default();
        workspace.insert(Platform::Twitter, String::new(), "Hello".to_string());
        let html = render_publish_page(&PublishPageParams {
            workspace: &workspace,
            connected: &[],
            results: None,
            flash: None,
        })
        .into_string();
        assert!(html.contains("No social media accounts connected."));
    }

    #[test]
    fn test_render_publish_form_with_thread_note() {
        let mut workspace = Workspace::default();
        workspace.insert(
            Platform::Bluesky,
            String::new(),
            "This is a sentence. ".repeat(40),
        );
        let html = render_publish_page(&PublishPageParams {
            workspace: &workspace,
            connected: &[Platform::Bluesky],
            results: None,
            flash: None,
        })
        .into_string();
        assert!(html.contains(r#"value="bluesky" checked"#));
        assert!(html.contains("Content will be split into 3 thread posts"));
    }

    #[test]
    fn test_render_results() {
        let mut results = BTreeMap::new();
        results.insert(Platform::Twitter, PublishOutcome::failed("Platform not connected", 1));
        let workspace = Workspace::default();
        let html = render_publish_page(&PublishPageParams {
            workspace: &workspace,
            connected: &[],
            results: Some(&results),
            flash: None,
        })
        .into_string();
        assert!(html.contains(
            r#"<article class="error">0/1 platforms published successfully</article>"#
        ));
        assert!(html.contains("Platform not connected"));
    }

    #[test]
    fn test_render_mixed_results_warns() {
        let mut results = BTreeMap::new();
        results.insert(Platform::Twitter, PublishOutcome::failed("Twitter/X post failed", 1));
        results.insert(Platform::Threads, PublishOutcome::complete("Posted to Threads", Vec::new()));
        let workspace = Workspace::default();
        let html = render_publish_page(&PublishPageParams {
            workspace: &workspace,
            connected: &[],
            results: Some(&results),
            flash: None,
        })
        .into_string();
        assert!(html.contains(
            r#"<article class="warning">1/2 platforms published successfully</article>"#
        ));
    }
}
