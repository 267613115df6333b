use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use super::{AccountInfo, Credentials, Platform, PlatformError, SocialPlatform};
use crate::thread::PostRef;

/// Simulated backend for platforms whose posting API is paid or gated.
pub struct DemoPlatform {
    platform: Platform,
    delay: Duration,
    account: Option<AccountInfo>,
}

impl DemoPlatform {
    #[must_use]
    pub fn new(platform: Platform, delay: Duration) -> Self {
        Self {
            platform,
            delay,
            account: None,
        }
    }

    fn connect_message(&self) -> String {
        let reason = match self.platform {
            Platform::Threads => "Limited API access, business verification required",
            _ => "$100+/month API tier required for live posting",
        };
        format!("{} connected (Demo mode - {reason})", self.platform.name())
    }
}

#[async_trait]
impl SocialPlatform for DemoPlatform {
    fn platform(&self) -> Platform {
        self.platform
    }

    fn is_connected(&self) -> bool {
        self.account.is_some()
    }

    fn is_demo(&self) -> bool {
        true
    }

    fn account(&self) -> Option<&AccountInfo> {
        self.account.as_ref()
    }

    async fn connect(&mut self, _credentials: &Credentials) -> Result<String, PlatformError> {
        self.account = Some(AccountInfo {
            name: "Demo User".to_string(),
            handle: Some("demo_user".to_string()),
            profile_url: None,
        });
        info!(platform = %self.platform, "Connected demo backend");
        Ok(self.connect_message())
    }

    fn disconnect(&mut self) {
        self.account = None;
    }

    async fn post_single(&self, text: &str) -> Result<PostRef, PlatformError> {
        if !self.is_connected() {
            return Err(PlatformError::NotConnected(self.platform.name()));
        }
        tokio::time::sleep(self.delay).await;
        let id = Utc::now().timestamp_millis();
        info!(platform = %self.platform, len = text.chars().count(), "Simulated post");
        Ok(PostRef {
            uri: format!("demo://{}/{id}", self.platform.as_str()),
            cid: format!("demo-{id}"),
        })
    }
}
