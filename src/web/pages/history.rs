use maud::{html, Markup};

use crate::components::BaseLayout;
use crate::db::ContentRecord;

const PREVIEW_LEN: usize = 100;

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

#[must_use]
pub fn render_history_page(records: &[ContentRecord]) -> Markup {
    let content = html! {
        h1 { "Content History" }

        @if records.is_empty() {
            p { "No content generated yet." }
        } @else {
            table {
                thead {
                    tr {
                        th { "Created" }
                        th { "Topic" }
                        th { "Platform" }
                        th { "Type" }
                        th { "Content" }
                    }
                }
                tbody {
                    @for record in records {
                        @let metadata = record.parsed_metadata();
                        tr {
                            td { (record.created_at) }
                            td { (record.topic) }
                            td { (record.platform) }
                            td {
                                @if let Some(m) = &metadata {
                                    (m.content_type)
                                    br;
                                    small { code { (m.content_hash) } }
                                }
                            }
                            td title=(record.content) { (truncate(&record.content, PREVIEW_LEN)) }
                        }
                    }
                }
            }
        }
    };

    BaseLayout::new("History").active("/history").render(content)
}
