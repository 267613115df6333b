//! Small inline badges for character counts, connection state and publish results.

use maud::{html, Markup, Render};

use crate::thread::PublishStatus;

/// "123/300" character count, highlighted when over the limit.
#[derive(Debug, Clone, Copy)]
pub struct CharCountBadge {
    pub count: usize,
    pub limit: usize,
}

impl CharCountBadge {
    #[must_use]
    pub fn for_text(text: &str, limit: usize) -> Self {
        Self {
            count: text.chars().count(),
            limit,
        }
    }

    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.count > self.limit
    }
}

impl Render for CharCountBadge {
    fn render(&self) -> Markup {
        let class = if self.is_over() {
            "badge badge-over"
        } else {
            "badge badge-ok"
        };
        html! {
            span class=(class) title="Characters used / platform limit" {
                (self.count) "/" (self.limit)
            }
        }
    }
}

/// Connected / not connected indicator, with a demo marker.
#[derive(Debug, Clone, Copy)]
pub struct ConnectionBadge {
    pub connected: bool,
    pub demo: bool,
}

impl Render for ConnectionBadge {
    fn render(&self) -> Markup {
        html! {
            @if self.connected {
                span class="badge badge-ok" {
                    "Connected"
                    @if self.demo { " (demo)" }
                }
            } @else {
                span class="badge badge-over" { "Not connected" }
            }
        }
    }
}

/// Outcome of a publish attempt.
#[derive(Debug, Clone, Copy)]
pub struct PublishBadge(pub PublishStatus);

impl Render for PublishBadge {
    fn render(&self) -> Markup {
        let (class, label) = match self.0 {
            PublishStatus::Complete => ("badge badge-ok", "Published"),
            PublishStatus::Partial => ("badge badge-over", "Partially published"),
            PublishStatus::Failed => ("badge badge-over", "Failed"),
        };
        html! { span class=(class) { (label) } }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_count_badge() {
        let badge = CharCountBadge::for_text("héllo", 3);
        assert_eq!(badge.count, 5);
        assert!(badge.is_over());
        let html = badge.render().into_string();
        assert!(html.contains("badge-over"));
        assert!(html.contains("5/3"));

        let html = CharCountBadge::for_text("ok", 300).render().into_string();
        assert!(html.contains("badge-ok"));
    }

    #[test]
    fn test_connection_badge() {
        let html = ConnectionBadge {
            connected: true,
            demo: true,
        }
        .render()
        .into_string();
        assert!(html.contains("Connected (demo)"));

        let html = ConnectionBadge {
            connected: false,
            demo: false,
        }
        .render()
        .into_string();
        assert!(html.contains("Not connected"));
    }

    #[test]
    fn test_publish_badge() {
        let html = PublishBadge(PublishStatus::Partial).render().into_string();
        assert!(html.contains("Partially published"));
    }
}
