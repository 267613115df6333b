//! Content generation form.

use maud::{html, Markup};

use crate::components::{BaseLayout, Flash};
use crate::constants::{CONTENT_TYPES, TONES};
use crate::platforms::Platform;
use crate::workspace::GenerationSettings;

/// Parameters for rendering the generate page.
#[derive(Debug, Default)]
pub struct GeneratePageParams<'a> {
    pub flash: Option<&'a Flash>,
    /// Settings of the last generation run, used to prefill the form.
    pub previous: Option<&'a GenerationSettings>,
    /// Platforms that received content in the last run.
    pub generated: &'a [Platform],
}

#[must_use]
pub fn render_generate_page(params: &GeneratePageParams<'_>) -> Markup {
    let topic = params.previous.map_or("", |s| s.topic.as_str());
    let tone = params.previous.map_or("professional", |s| s.tone.as_str());
    let include_hashtags = params.previous.map_or(true, |s| s.include_hashtags);

    let content = html! {
        h1 { "Generate Content" }
        p { "Create content for multiple social media platforms from a single topic." }

        @if let Some(flash) = params.flash {
            (flash)
        }

        @if !params.generated.is_empty() {
            p {
                "Generated for "
                @for (i, platform) in params.generated.iter().enumerate() {
                    @if i > 0 { ", " }
                    (platform.name())
                }
                ". "
                a href="/preview" { "Review it on the Preview & Edit page." }
            }
        }

        form method="post" action="/generate" {
            label for="topic" { "Topic" }
            input type="text" id="topic" name="topic" value=(topic)
                placeholder="e.g., Artificial Intelligence, Marketing Strategies" required;

            label for="content_type" { "Content Type" }
            select id="content_type" name="content_type" {
                @for (value, label) in CONTENT_TYPES {
                    option value=(value) { (label) }
                }
                option value="custom" { "Custom" }
            }

            label for="custom_content_type" { "Custom content type" }
            input type="text" id="custom_content_type" name="custom_content_type"
                placeholder="e.g., How-to guide, Case study, Product review";

            fieldset {
                legend { "Target Platforms" }
                @for platform in Platform::ALL {
                    label {
                        input type="checkbox" name="platform" value=(platform.as_str())
                            checked[matches!(platform, Platform::LinkedIn | Platform::Twitter)];
                        " " (platform.name())
                        small { " (" (platform.char_limit()) " chars)" }
                    }
                }
            }

            label for="tone" { "Tone" }
            select id="tone" name="tone" {
                @for choice in TONES {
                    option value=(choice.to_lowercase()) selected[choice.eq_ignore_ascii_case(tone)] {
                        (choice)
                    }
                }
            }

            label {
                input type="checkbox" name="include_hashtags" value="true" checked[include_hashtags];
                " Include hashtags"
            }

            button type="submit" { "Generate Content" }
        }
    };

    BaseLayout::new("Generate").active("/").render(content)
}
