//! Alert messages shown above page content.

use maud::{html, Markup, Render};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertVariant {
    Success,
    Error,
    Warning,
    Info,
}

impl AlertVariant {
    #[must_use]
    pub const fn article_class(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

/// An alert message rendered as a styled `<article>`.
#[derive(Debug, Clone)]
pub struct Alert<'a> {
    pub variant: AlertVariant,
    pub message: &'a str,
}

impl<'a> Alert<'a> {
    #[must_use]
    pub const fn new(variant: AlertVariant, message: &'a str) -> Self {
        Self { variant, message }
    }

    #[must_use]
    pub const fn success(message: &'a str) -> Self {
        Self::new(AlertVariant::Success, message)
    }

    #[must_use]
    pub const fn error(message: &'a str) -> Self {
        Self::new(AlertVariant::Error, message)
    }

    #[must_use]
    pub const fn warning(message: &'a str) -> Self {
        Self::new(AlertVariant::Warning, message)
    }

    #[must_use]
    pub const fn info(message: &'a str) -> Self {
        Self::new(AlertVariant::Info, message)
    }
}

impl Render for Alert<'_> {
    fn render(&self) -> Markup {
        html! {
            article class=(self.variant.article_class()) { (self.message) }
        }
    }
}

/// A flash message carried from a handler into a page render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub variant: AlertVariant,
    pub message: String,
}

impl Flash {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            variant: AlertVariant::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            variant: AlertVariant::Error,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            variant: AlertVariant::Info,
            message: message.into(),
        }
    }
}

impl Render for Flash {
    fn render(&self) -> Markup {
        Alert::new(self.variant, &self.message).render()
    }
}
