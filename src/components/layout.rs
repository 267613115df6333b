//! Base page layout for the dashboard.

use maud::{html, Markup, PreEscaped, DOCTYPE};

/// Minimal inline styling so the dashboard renders without static assets.
const BASE_STYLE: &str = r"
body { font-family: system-ui, sans-serif; margin: 0; line-height: 1.5; }
.container { max-width: 960px; margin: 0 auto; padding: 0 1rem; }
nav ul { list-style: none; display: flex; gap: 1rem; padding: 0; }
article { border-left: 4px solid #888; padding: 0.5rem 1rem; margin: 1rem 0; }
article.success { border-color: #2e7d32; }
article.error { border-color: #c62828; }
article.warning { border-color: #ed6c02; }
article.info { border-color: #0277bd; }
.badge { border-radius: 4px; padding: 0 0.4rem; font-size: 0.85em; }
.badge-ok { background: #e8f5e9; }
.badge-over { background: #ffebee; }
.segment { white-space: pre-wrap; border: 1px solid #ddd; padding: 0.5rem; margin: 0.5rem 0; }
textarea { width: 100%; min-height: 8rem; }
";

/// Navigation entries as (href, label).
const NAV_LINKS: &[(&str, &str)] = &[
    ("/", "Generate"),
    ("/preview", "Preview & Edit"),
    ("/accounts", "Accounts"),
    ("/publish", "Publish"),
    ("/history", "History"),
];

/// Base page layout builder.
///
/// ```ignore
/// let page = BaseLayout::new("Preview").active("/preview").render(content);
/// ```
#[derive(Debug, Clone)]
pub struct BaseLayout<'a> {
    title: &'a str,
    active: Option<&'a str>,
}

impl<'a> BaseLayout<'a> {
    #[must_use]
    pub const fn new(title: &'a str) -> Self {
        Self {
            title,
            active: None,
        }
    }

    /// Mark the navigation entry with this href as the current page.
    #[must_use]
    pub const fn active(mut self, href: &'a str) -> Self {
        self.active = Some(href);
        self
    }

    /// Render the complete HTML page with `content` inside `<main>`.
    #[must_use]
    pub fn render(self, content: Markup) -> Markup {
        html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="UTF-8";
                    meta name="viewport" content="width=device-width, initial-scale=1.0";
                    meta name="robots" content="noindex";
                    title { (self.title) " - Social Content Dashboard" }
                    style { (PreEscaped(BASE_STYLE)) }
                }
                body {
                    (self.render_header())
                    main class="container" {
                        (content)
                    }
                    footer class="container" {
                        small { "Social Content Dashboard" }
                    }
                }
            }
        }
    }

    fn render_header(&self) -> Markup {
        html! {
            header class="container" {
                nav {
                    ul {
                        li { strong { "Content Dashboard" } }
                        @for (href, label) in NAV_LINKS {
                            @if self.active == Some(*href) {
                                li { a href=(href) aria-current="page" { (label) } }
                            } @else {
                                li { a href=(href) { (label) } }
                            }
                        }
                    }
                }
            }
        }
    }
}
