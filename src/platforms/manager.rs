use std::collections::{BTreeMap, HashMap};

use tracing::info;

use super::{
    BlueskyClient, ConnectionStatus, DemoPlatform, LinkedInClient, Platform, SocialPlatform,
};
use crate::config::Config;
use crate::thread::PublishOutcome;

/// One backend per platform.
pub struct PlatformManager {
    platforms: BTreeMap<Platform, Box<dyn SocialPlatform>>,
}

impl PlatformManager {
    /// Create an empty manager.
    #[must_use]
    pub fn new() -> Self {
        Self {
            platforms: BTreeMap::new(),
        }
    }

    /// Build the standard set of backends from configuration.
    #[must_use]
    pub fn from_config(config: &Config, client: &reqwest::Client) -> Self {
        let mut manager = Self::new();
        manager.register(Box::new(BlueskyClient::new(
            client.clone(),
            &config.bluesky_base_url,
            config.thread_post_delay(),
        )));
        manager.register(Box::new(LinkedInClient::new(
            client.clone(),
            &config.linkedin_api_base,
            config.demo_post_delay(),
        )));
        manager.register(Box::new(DemoPlatform::new(
            Platform::Twitter,
            config.demo_post_delay(),
        )));
        manager.register(Box::new(DemoPlatform::new(
            Platform::Threads,
            config.demo_post_delay(),
        )));
        manager
    }

    /// Register a backend, replacing any existing one for the same platform.
    pub fn register(&mut self, backend: Box<dyn SocialPlatform>) {
        self.platforms.insert(backend.platform(), backend);
    }

    #[must_use]
    pub fn get(&self, platform: Platform) -> Option<&dyn SocialPlatform> {
        self.platforms.get(&platform).map(AsRef::as_ref)
    }

    pub fn get_mut(&mut self, platform: Platform) -> Option<&mut (dyn SocialPlatform + 'static)> {
        self.platforms.get_mut(&platform).map(AsMut::as_mut)
    }

    /// Platforms with an active connection, in catalogue order.
    #[must_use]
    pub fn connected_platforms(&self) -> Vec<Platform> {
        self.platforms
            .iter()
            .filter(|(_, backend)| backend.is_connected())
            .map(|(platform, _)| *platform)
            .collect()
    }

    #[must_use]
    pub fn statuses(&self) -> Vec<ConnectionStatus> {
        self.platforms
            .values()
            .map(|backend| backend.connection_status())
            .collect()
    }

    /// Post per-platform content to each selected platform in turn.
    ///
    /// A failure on one platform never stops the others.
    pub async fn post_to_multiple(
        &self,
        content: &HashMap<Platform, String>,
        selected: &[Platform],
    ) -> BTreeMap<Platform, PublishOutcome> {
        let mut results = BTreeMap::new();

        for &platform in selected {
            let outcome = match self.get(platform).filter(|b| b.is_connected()) {
                None => PublishOutcome::failed("Platform not connected", 1),
                Some(backend) => match content.get(&platform).filter(|c| !c.trim().is_empty()) {
                    None => PublishOutcome::failed("No content provided for this platform", 1),
                    Some(text) => backend.post_content(text).await,
                },
            };
            info!(
                platform = %platform,
                success = outcome.success(),
                "Publish result"
            );
            results.insert(platform, outcome);
        }

        results
    }
}

impl Default for PlatformManager {
    fn default() -> Self {
        Self::new()
    }
}
