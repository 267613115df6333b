//! Generated content awaiting review and publication.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::platforms::Platform;

/// One LLM refinement applied to a platform's content.
#[derive(Debug, Clone, Serialize)]
pub struct Refinement {
    pub request: String,
    pub content: String,
    pub at: DateTime<Utc>,
}

/// Content generated for one platform.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedContent {
    /// Text returned by the LLM after reasoning was stripped.
    pub raw: String,
    /// Text that will be published.
    pub formatted: String,
    pub generated_at: DateTime<Utc>,
    pub refinements: Vec<Refinement>,
}

/// The request that produced the current workspace.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationSettings {
    pub topic: String,
    pub content_type: String,
    pub tone: String,
    pub include_hashtags: bool,
}

/// Per-platform content for the current session.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Workspace {
    settings: Option<GenerationSettings>,
    entries: BTreeMap<Platform, GeneratedContent>,
}

impl Workspace {
    /// Discard existing content and start a new generation run.
    pub fn start(&mut self, settings: GenerationSettings) {
        self.settings = Some(settings);
        self.entries.clear();
    }

    pub fn insert(&mut self, platform: Platform, raw: String, formatted: String) {
        self.entries.insert(
            platform,
            GeneratedContent {
                raw,
                formatted,
                generated_at: Utc::now(),
                refinements: Vec::new(),
            },
        );
    }

    #[must_use]
    pub fn settings(&self) -> Option<&GenerationSettings> {
        self.settings.as_ref()
    }

    #[must_use]
    pub fn get(&self, platform: Platform) -> Option<&GeneratedContent> {
        self.entries.get(&platform)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = (Platform, &GeneratedContent)> {
        self.entries.iter().map(|(p, c)| (*p, c))
    }

    #[must_use]
    pub fn platforms(&self) -> Vec<Platform> {
        self.entries.keys().copied().collect()
    }

    /// Replace the publishable text. Returns false if the platform has no content.
    pub fn edit(&mut self, platform: Platform, content: String) -> bool {
        match self.entries.get_mut(&platform) {
            Some(entry) => {
                entry.formatted = content;
                true
            }
            None => false,
        }
    }

    /// Record a refinement and make it the publishable text.
    pub fn refine(&mut self, platform: Platform, request: String, content: String) -> bool {
        match self.entries.get_mut(&platform) {
            Some(entry) => {
                entry.formatted.clone_from(&content);
                entry.refinements.push(Refinement {
                    request,
                    content,
                    at: Utc::now(),
                });
                true
            }
            None => false,
        }
    }

    /// Restore the text of refinement `index`. Returns false if it does not exist.
    pub fn revert(&mut self, platform: Platform, index: usize) -> bool {
        let Some(entry) = self.entries.get_mut(&platform) else {
            return false;
        };
        match entry.refinements.get(index) {
            Some(refinement) => {
                entry.formatted = refinement.content.clone();
                true
            }
            None => false,
        }
    }

    /// Publishable text per platform.
    #[must_use]
    pub fn publishable(&self) -> HashMap<Platform, String> {
        self.entries
            .iter()
            .map(|(p, c)| (*p, c.formatted.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workspace() -> Workspace {
        let mut ws = Workspace::default();
        ws.start(GenerationSettings {
            topic: "rust".to_string(),
            content_type: "tip".to_string(),
            tone: "casual".to_string(),
            include_hashtags: true,
        });
        ws.insert(Platform::Bluesky, "raw".to_string(), "formatted".to_string());
        ws
    }

    #[test]
    fn test_start_clears_entries() {
        let mut ws = workspace();
        assert!(!ws.is_empty());
        ws.start(GenerationSettings::default());
        assert!(ws.is_empty());
    }

    #[test]
    fn test_edit() {
        let mut ws = workspace();
        assert!(ws.edit(Platform::Bluesky, "edited".to_string()));
        assert_eq!(ws.get(Platform::Bluesky).unwrap().formatted, "edited");
        assert!(!ws.edit(Platform::LinkedIn, "nope".to_string()));
    }

    #[test]
    fn test_refine_and_revert() {
        let mut ws = workspace();
        assert!(ws.refine(Platform::Bluesky, "shorter".to_string(), "v1".to_string()));
        assert!(ws.refine(Platform::Bluesky, "punchier".to_string(), "v2".to_string()));
        assert_eq!(ws.get(Platform::Bluesky).unwrap().formatted, "v2");
        assert_eq!(ws.get(Platform::Bluesky).unwrap().refinements.len(), 2);

        assert!(ws.revert(Platform::Bluesky, 0));
        assert_eq!(ws.get(Platform::Bluesky).unwrap().formatted, "v1");
        assert!(!ws.revert(Platform::Bluesky, 5));
        assert!(!ws.revert(Platform::Threads, 0));
    }

    #[test]
    fn test_publishable() {
        let ws = workspace();
        let content = ws.publishable();
        assert_eq!(content.get(&Platform::Bluesky).map(String::as_str), Some("formatted"));
    }
}
