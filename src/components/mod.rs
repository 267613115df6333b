//! Maud HTML components for the dashboard.
//!
//! - `layout`: base page layout and navigation
//! - `alert`: alert messages and flash messages
//! - `badge`: character count, connection and publish badges

pub mod alert;
pub mod badge;
pub mod layout;

pub use alert::{Alert, AlertVariant, Flash};
pub use badge::{CharCountBadge, ConnectionBadge, PublishBadge};
pub use layout::BaseLayout;
