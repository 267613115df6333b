//! Social platform integrations.
//!
//! Every backend implements [`SocialPlatform`]. Only Bluesky threads long
//! content; the other backends post single messages and ignore reply linkage.

mod bluesky;
mod demo;
mod linkedin;
mod manager;

pub use bluesky::{BlueskyClient, BLUESKY_CHAR_LIMIT};
pub use demo::DemoPlatform;
pub use linkedin::LinkedInClient;
pub use manager::PlatformManager;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::thread::{LinkedPoster, PostLink, PostRef, PublishOutcome, ReplyRef};

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("Not connected to {0}")]
    NotConnected(&'static str),
    #[error("{0}")]
    MissingCredentials(&'static str),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },
}

/// Supported target platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    LinkedIn,
    Twitter,
    Bluesky,
    Threads,
}

/// Pricing tier of a platform's posting API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Tier {
    Free,
    Premium,
}

/// Static per-platform settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlatformProfile {
    pub name: &'static str,
    pub char_limit: usize,
    pub hashtag_limit: usize,
    pub tone: &'static str,
    pub tier: Tier,
    pub tier_status: &'static str,
}

const LINKEDIN_PROFILE: PlatformProfile = PlatformProfile {
    name: "LinkedIn",
    char_limit: 1300,
    hashtag_limit: 3,
    tone: "professional",
    tier: Tier::Free,
    tier_status: "Live API integration available",
};

const TWITTER_PROFILE: PlatformProfile = PlatformProfile {
    name: "Twitter/X",
    char_limit: 280,
    hashtag_limit: 2,
    tone: "conversational",
    tier: Tier::Premium,
    tier_status: "$100+/month API required",
};

const BLUESKY_PROFILE: PlatformProfile = PlatformProfile {
    name: "Bluesky",
    char_limit: BLUESKY_CHAR_LIMIT,
    hashtag_limit: 2,
    tone: "community",
    tier: Tier::Free,
    tier_status: "Live posting + intelligent threading",
};

const THREADS_PROFILE: PlatformProfile = PlatformProfile {
    name: "Threads",
    char_limit: 500,
    hashtag_limit: 2,
    tone: "casual",
    tier: Tier::Premium,
    tier_status: "Business verification required",
};

impl Platform {
    pub const ALL: [Self; 4] = [Self::LinkedIn, Self::Twitter, Self::Bluesky, Self::Threads];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LinkedIn => "linkedin",
            Self::Twitter => "twitter",
            Self::Bluesky => "bluesky",
            Self::Threads => "threads",
        }
    }

    /// Parse a platform name, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "linkedin" => Some(Self::LinkedIn),
            "twitter" | "x" | "twitter/x" => Some(Self::Twitter),
            "bluesky" => Some(Self::Bluesky),
            "threads" => Some(Self::Threads),
            _ => None,
        }
    }

    #[must_use]
    pub const fn profile(&self) -> &'static PlatformProfile {
        match self {
            Self::LinkedIn => &LINKEDIN_PROFILE,
            Self::Twitter => &TWITTER_PROFILE,
            Self::Bluesky => &BLUESKY_PROFILE,
            Self::Threads => &THREADS_PROFILE,
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.profile().name
    }

    #[must_use]
    pub const fn char_limit(&self) -> usize {
        self.profile().char_limit
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a platform name is supported.
#[must_use]
pub fn validate_platform(name: &str) -> bool {
    Platform::parse(name).is_some()
}

/// Credentials submitted from the accounts page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<String>,
    pub access_token: Option<String>,
    pub bearer_token: Option<String>,
    #[serde(default)]
    pub demo: bool,
}

impl Credentials {
    pub(crate) fn field(value: Option<&String>) -> Option<&str> {
        value.map(|v| v.trim()).filter(|v| !v.is_empty())
    }
}

/// The account a backend is connected as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountInfo {
    pub name: String,
    pub handle: Option<String>,
    pub profile_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConnectionStatus {
    pub platform: Platform,
    pub connected: bool,
    pub demo: bool,
    pub account: Option<AccountInfo>,
}

/// Capability set shared by every platform backend.
#[async_trait]
pub trait SocialPlatform: Send + Sync {
    fn platform(&self) -> Platform;

    fn is_connected(&self) -> bool;

    /// Whether the backend simulates posting instead of calling a live API.
    fn is_demo(&self) -> bool {
        false
    }

    fn account(&self) -> Option<&AccountInfo>;

    /// Connect with the given credentials, returning a confirmation message.
    ///
    /// # Errors
    ///
    /// Returns an error if credentials are missing or rejected.
    async fn connect(&mut self, credentials: &Credentials) -> Result<String, PlatformError>;

    fn disconnect(&mut self);

    /// Create one standalone post.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is not connected or the post is rejected.
    async fn post_single(&self, text: &str) -> Result<PostRef, PlatformError>;

    /// Create a post as a reply in a thread. Backends without threading post
    /// a standalone message.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is not connected or the post is rejected.
    async fn post_linked_reply(
        &self,
        text: &str,
        _reply: &ReplyRef,
    ) -> Result<PostRef, PlatformError> {
        self.post_single(text).await
    }

    /// Publish content, reporting the outcome instead of failing.
    async fn post_content(&self, content: &str) -> PublishOutcome {
        let name = self.platform().name();
        if !self.is_connected() {
            return PublishOutcome::failed(format!("Not connected to {name}"), 1);
        }
        match self.post_single(content).await {
            Ok(post) => PublishOutcome::complete(
                format!("Posted successfully to {name}! Post ID: {}", post.uri),
                vec![PostLink {
                    index: 1,
                    post,
                    reply: None,
                }],
            ),
            Err(e) => {
                tracing::warn!(platform = %self.platform(), error = %e, "Post failed");
                PublishOutcome::failed(format!("{name} post failed: {e}"), 1)
            }
        }
    }

    fn connection_status(&self) -> ConnectionStatus {
        ConnectionStatus {
            platform: self.platform(),
            connected: self.is_connected(),
            demo: self.is_demo(),
            account: self.account().cloned(),
        }
    }
}

/// Every backend can be driven by the thread poster: the first segment goes
/// out through `post_single`, later ones through `post_linked_reply`.
#[async_trait]
impl<T: SocialPlatform + ?Sized> LinkedPoster for T {
    async fn create_post(
        &self,
        text: &str,
        reply: Option<&ReplyRef>,
    ) -> Result<PostRef, PlatformError> {
        match reply {
            Some(reply) => self.post_linked_reply(text, reply).await,
            None => self.post_single(text).await,
        }
    }
}

/// Error body returned by the remote APIs (`{"error": ..., "message": ...}`).
#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// Turn a non-success response into [`PlatformError::Api`].
pub(crate) async fn api_error(response: reqwest::Response, fallback: &str) -> PlatformError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let parsed: ApiErrorBody = serde_json::from_str(&body).unwrap_or_default();
    let message = parsed
        .message
        .or(parsed.error)
        .unwrap_or_else(|| fallback.to_string());
    PlatformError::Api { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_platform() {
        assert_eq!(Platform::parse("LinkedIn"), Some(Platform::LinkedIn));
        assert_eq!(Platform::parse(" bluesky "), Some(Platform::Bluesky));
        assert_eq!(Platform::parse("X"), Some(Platform::Twitter));
        assert_eq!(Platform::parse("THREADS"), Some(Platform::Threads));
        assert_eq!(Platform::parse("myspace"), None);
    }

    #[test]
    fn test_validate_platform() {
        assert!(validate_platform("twitter"));
        assert!(!validate_platform("mastodon"));
    }

    #[test]
    fn test_profiles() {
        assert_eq!(Platform::LinkedIn.char_limit(), 1300);
        assert_eq!(Platform::Twitter.char_limit(), 280);
        assert_eq!(Platform::Bluesky.char_limit(), 300);
        assert_eq!(Platform::Threads.char_limit(), 500);
        assert_eq!(Platform::LinkedIn.profile().hashtag_limit, 3);
        assert_eq!(Platform::Bluesky.profile().tier, Tier::Free);
        assert_eq!(Platform::Threads.profile().tier, Tier::Premium);
    }

    #[test]
    fn test_round_trip_names() {
        for platform in Platform::ALL {
            assert_eq!(Platform::parse(platform.as_str()), Some(platform));
        }
    }

    #[test]
    fn test_credentials_field_trims() {
        assert_eq!(Credentials::field(Some(&"  a ".to_string())), Some("a"));
        assert_eq!(Credentials::field(Some(&"   ".to_string())), None);
        assert_eq!(Credentials::field(None), None);
    }
}
