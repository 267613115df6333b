//! Maud page templates for the dashboard.
//!
//! Each page module exports a render function that produces the complete HTML.

pub mod accounts;
pub mod generate;
pub mod history;
pub mod preview;
pub mod publish;

pub use accounts::render_accounts_page;
pub use generate::{render_generate_page, GeneratePageParams};
pub use history::render_history_page;
pub use preview::render_preview_page;
pub use publish::{render_publish_page, PublishPageParams};
