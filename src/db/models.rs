use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A row of the content log.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ContentRecord {
    pub id: i64,
    pub topic: String,
    pub platform: String,
    pub content: String,
    pub metadata: Option<String>,
    pub created_at: String,
}

impl ContentRecord {
    /// Parsed metadata, if present and well formed.
    #[must_use]
    pub fn parsed_metadata(&self) -> Option<ContentMetadata> {
        self.metadata
            .as_deref()
            .and_then(|m| serde_json::from_str(m).ok())
    }
}

/// Descriptive data stored alongside generated content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentMetadata {
    pub content_type: String,
    pub tone: String,
    pub content_hash: String,
}

impl ContentMetadata {
    #[must_use]
    pub fn new(content_type: &str, tone: &str, content: &str) -> Self {
        Self {
            content_type: content_type.to_string(),
            tone: tone.to_string(),
            content_hash: content_hash(content),
        }
    }
}

/// Data for inserting a content log row.
#[derive(Debug, Clone)]
pub struct NewContentRecord {
    pub topic: String,
    pub platform: String,
    pub content: String,
    pub metadata: Option<ContentMetadata>,
}

/// Short identifier for a piece of content: the first 8 hex digits of its SHA-256.
#[must_use]
pub fn content_hash(content: &str) -> String {
    let digest = Sha256::digest(content.as_bytes());
    hex::encode(&digest[..4])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_hash_is_short_and_stable() {
        let hash = content_hash("hello");
        assert_eq!(hash.len(), 8);
        assert_eq!(hash, "2cf24dba");
        assert_ne!(content_hash("hello!"), hash);
    }

    #[test]
    fn test_parsed_metadata() {
        let metadata = ContentMetadata::new("tip", "casual", "hello");
        let record = ContentRecord {
            id: 1,
            topic: "rust".to_string(),
            platform: "bluesky".to_string(),
            content: "hello".to_string(),
            metadata: Some(serde_json::to_string(&metadata).unwrap()),
            created_at: "2024-01-01 00:00:00".to_string(),
        };
        assert_eq!(record.parsed_metadata(), Some(metadata));

        let broken = ContentRecord {
            metadata: Some("not json".to_string()),
            ..record
        };
        assert_eq!(broken.parsed_metadata(), None);
    }
}
