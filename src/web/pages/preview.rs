//! Per-platform preview with manual edit, LLM refinement and revert.

use maud::{html, Markup};

use crate::components::{BaseLayout, CharCountBadge, Flash};
use crate::platforms::{Platform, BLUESKY_CHAR_LIMIT};
use crate::thread::{plan_thread, ThreadPlan};
use crate::workspace::{GeneratedContent, Workspace};

/// One-click refinement requests.
const QUICK_REFINEMENTS: &[(&str, &str)] = &[
    ("Make more engaging", "Make this content more engaging and interactive"),
    ("Add statistics", "Add relevant statistics or data points to support the claims"),
    ("Make more casual", "Make the tone more casual and conversational"),
    ("Add call-to-action", "Add a compelling call-to-action to encourage engagement"),
];

#[must_use]
pub fn render_preview_page(workspace: &Workspace, flash: Option<&Flash>) -> Markup {
    let content = html! {
        h1 { "Preview & Edit" }

        @if let Some(flash) = flash {
            (flash)
        }

        @if workspace.is_empty() {
            p {
                "No content generated yet. "
                a href="/" { "Generate content first." }
            }
        } @else {
            p { "Review, edit, and refine your generated content before publishing." }
            @for (platform, entry) in workspace.entries() {
                (platform_section(platform, entry))
            }
        }
    };

    BaseLayout::new("Preview & Edit").active("/preview").render(content)
}

fn platform_section(platform: Platform, entry: &GeneratedContent) -> Markup {
    let slug = platform.as_str();
    let profile = platform.profile();
    let plan = if platform == Platform::Bluesky {
        plan_thread(&entry.formatted, BLUESKY_CHAR_LIMIT)
            .ok()
            .filter(ThreadPlan::is_thread)
    } else {
        None
    };

    html! {
        section id=(slug) {
            h2 {
                (profile.name) " "
                (CharCountBadge::for_text(&entry.formatted, profile.char_limit))
            }

            @if let Some(plan) = &plan {
                p { "This post will be published as a thread of " (plan.len()) " posts:" }
                @for segment in plan.segments() {
                    div class="segment" {
                        (segment.text)
                        " "
                        (CharCountBadge::for_text(&segment.text, plan.limit()))
                    }
                }
            } @else {
                div class="segment" { (entry.formatted) }
            }

            details {
                summary { "Manual edit" }
                form method="post" action={ "/preview/" (slug) "/edit" } {
                    textarea name="content" { (entry.formatted) }
                    button type="submit" { "Update " (profile.name) " content" }
                }
            }

            details {
                summary { "AI refinement" }
                @for (label, request) in QUICK_REFINEMENTS {
                    form method="post" action={ "/preview/" (slug) "/refine" } style="display:inline" {
                        input type="hidden" name="request" value=(request);
                        button type="submit" class="secondary" { (label) }
                    }
                }
                form method="post" action={ "/preview/" (slug) "/refine" } {
                    textarea name="request"
                        placeholder="e.g., Make it more professional, add examples, include a question" {}
                    button type="submit" { "Refine content" }
                }
            }

            @if !entry.refinements.is_empty() {
                details {
                    summary { "Refinement history (" (entry.refinements.len()) ")" }
                    @for (idx, refinement) in entry.refinements.iter().enumerate() {
                        div {
                            strong { "Refinement " (idx + 1) ": " }
                            (refinement.request)
                            br;
                            small { (refinement.at.format("%Y-%m-%d %H:%M:%S")) }
                            form method="post" action={ "/preview/" (slug) "/revert/" (idx) } {
                                button type="submit" class="secondary" { "Revert to this version" }
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
    use crate::workspace::GenerationSettings;

    #[test]
    fn test_render_empty_preview() {
        let html = render_preview_page(&Workspace::default(), None).into_string();
        assert!(html.contains("No content generated yet."));
    }

    #[test]
    fn test_render_bluesky_thread_preview() {
        let mut workspace = Workspace::default();
        workspace.start(GenerationSettings::default());
        workspace.insert(
            Platform::Bluesky,
            String::new(),
            "This is a sentence. ".repeat(40),
        );

        let html = render_preview_page(&workspace, None).into_string();
        assert!(html.contains("published as a thread of 3 posts"));
        assert!(html.contains("(1/3) "));
        assert!(html.contains(r#"action="/preview/bluesky/edit""#));
        assert!(html.contains(r#"action="/preview/bluesky/refine""#));
    }

    #[test]
    fn test_render_refinement_history() {
        let mut workspace = Workspace::default();
        workspace.insert(Platform::LinkedIn, String::new(), "Original".to_string());
        workspace.refine(Platform::LinkedIn, "shorter".to_string(), "Short".to_string());

        let html = render_preview_page(&workspace, None).into_string();
        assert!(html.contains("Refinement history (1)"));
        assert!(html.contains(r#"action="/preview/linkedin/revert/0""#));
    }
}
