//! Reply-chain posting of a thread plan.
//!
//! Segments go out strictly one after another: each reply needs the remote
//! identifiers of the first post (root) and the previous post (parent). The
//! poster is the failure boundary for a thread. Every transport or remote
//! error becomes a [`PublishOutcome`], and a failure part-way through stops
//! the thread without touching the posts already created.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::ThreadPlan;
use crate::platforms::PlatformError;

/// Remote identifier pair of a created post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRef {
    /// Opaque post identifier (an AT URI on Bluesky).
    pub uri: String,
    /// Opaque content identifier (a CID on Bluesky).
    pub cid: String,
}

/// Reply linkage for the second and later posts of a thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyRef {
    pub root: PostRef,
    pub parent: PostRef,
}

/// A segment that was successfully created remotely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostLink {
    /// 1-based segment position.
    pub index: usize,
    pub post: PostRef,
    /// Linkage the segment was submitted with; `None` for the first segment.
    pub reply: Option<ReplyRef>,
}

/// Backend primitive that creates one post, optionally as a reply.
#[async_trait]
pub trait LinkedPoster: Send + Sync {
    /// Create a post with the given text.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote post could not be created.
    async fn create_post(&self, text: &str, reply: Option<&ReplyRef>)
        -> Result<PostRef, PlatformError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishStatus {
    /// Every segment was posted.
    Complete,
    /// Some leading segments were posted before a failure.
    Partial,
    /// Nothing was posted.
    Failed,
}

/// Result of publishing a post or thread.
#[derive(Debug, Clone, Serialize)]
pub struct PublishOutcome {
    pub status: PublishStatus,
    pub posted: usize,
    pub total: usize,
    /// Human-readable summary.
    pub message: String,
    /// Last error message, if any segment failed.
    pub error: Option<String>,
    /// Posts created, in order.
    pub links: Vec<PostLink>,
}

impl PublishOutcome {
    /// Complete success with a custom message.
    #[must_use]
    pub fn complete(message: impl Into<String>, links: Vec<PostLink>) -> Self {
        let posted = links.len().max(1);
        Self {
            status: PublishStatus::Complete,
            posted,
            total: posted,
            message: message.into(),
            error: None,
            links,
        }
    }

    /// Total failure before anything was posted.
    #[must_use]
    pub fn failed(message: impl Into<String>, total: usize) -> Self {
        let message = message.into();
        Self {
            status: PublishStatus::Failed,
            posted: 0,
            total,
            error: Some(message.clone()),
            message,
            links: Vec::new(),
        }
    }

    /// Whether at least part of the content is live. Partial threads count as
    /// success; check [`PublishOutcome::is_partial`] to tell them apart.
    #[must_use]
    pub fn success(&self) -> bool {
        self.status != PublishStatus::Failed
    }

    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.status == PublishStatus::Partial
    }

    /// The root link of the thread, if the first segment was posted.
    #[must_use]
    pub fn root(&self) -> Option<&PostRef> {
        self.links.first().map(|link| &link.post)
    }
}

/// Posts segment sequences as causally linked reply chains.
#[derive(Debug, Clone)]
pub struct ThreadPoster {
    platform_name: String,
    delay: Duration,
}

impl ThreadPoster {
    /// Create a poster that waits `delay` before every submission after the first.
    #[must_use]
    pub fn new(platform_name: impl Into<String>, delay: Duration) -> Self {
        Self {
            platform_name: platform_name.into(),
            delay,
        }
    }

    /// Post every segment of a plan.
    pub async fn post_plan<P>(&self, target: &P, plan: &ThreadPlan) -> PublishOutcome
    where
        P: LinkedPoster + ?Sized,
    {
        self.post(target, &plan.display_texts()).await
    }

    /// Post the given texts: one plain post for a single text, a reply chain otherwise.
    pub async fn post<P>(&self, target: &P, texts: &[&str]) -> PublishOutcome
    where
        P: LinkedPoster + ?Sized,
    {
        match texts {
            [] => PublishOutcome::failed("Nothing to post", 0),
            [single] => self.post_single(target, single).await,
            _ => self.post_chain(target, texts).await,
        }
    }

    async fn post_single<P>(&self, target: &P, text: &str) -> PublishOutcome
    where
        P: LinkedPoster + ?Sized,
    {
        match target.create_post(text, None).await {
            Ok(post) => {
                info!(platform = %self.platform_name, uri = %post.uri, "Posted single message");
                let message = format!(
                    "Posted successfully to {}! URI: {}",
                    self.platform_name, post.uri
                );
                PublishOutcome::complete(
                    message,
                    vec![PostLink {
                        index: 1,
                        post,
                        reply: None,
                    }],
                )
            }
            Err(e) => {
                warn!(platform = %self.platform_name, error = %e, "Single post failed");
                PublishOutcome::failed(format!("{} post failed: {e}", self.platform_name), 1)
            }
        }
    }

    async fn post_chain<P>(&self, target: &P, texts: &[&str]) -> PublishOutcome
    where
        P: LinkedPoster + ?Sized,
    {
        let total = texts.len();
        // Rebuilt for every call: links never carry over between threads.
        let mut links: Vec<PostLink> = Vec::with_capacity(total);

        for (i, text) in texts.iter().enumerate() {
            let index = i + 1;
            if i > 0 {
                tokio::time::sleep(self.delay).await;
            }

            let reply = match (links.first(), links.last()) {
                (Some(root), Some(parent)) => Some(ReplyRef {
                    root: root.post.clone(),
                    parent: parent.post.clone(),
                }),
                _ => None,
            };

            debug!(
                platform = %self.platform_name,
                index,
                total,
                is_reply = reply.is_some(),
                "Posting thread segment"
            );

            match target.create_post(text, reply.as_ref()).await {
                Ok(post) => {
                    debug!(index, total, uri = %post.uri, cid = %post.cid, "Thread segment posted");
                    links.push(PostLink { index, post, reply });
                }
                Err(e) => {
                    warn!(
                        platform = %self.platform_name,
                        index,
                        total,
                        posted = links.len(),
                        error = %e,
                        "Thread segment failed"
                    );
                    if links.is_empty() {
                        return PublishOutcome::failed(
                            format!("Thread posting failed at post {index}: {e}"),
                            total,
                        );
                    }
                    let posted = links.len();
                    return PublishOutcome {
                        status: PublishStatus::Partial,
                        posted,
                        total,
                        message: format!(
                            "Thread partially posted: {posted}/{total} posts successful. Post {index} failed: {e}"
                        ),
                        error: Some(e.to_string()),
                        links,
                    };
                }
            }
        }

        info!(platform = %self.platform_name, total, "Thread posted");
        PublishOutcome {
            status: PublishStatus::Complete,
            posted: total,
            total,
            message: format!("Thread posted successfully! {total} posts created as connected thread"),
            error: None,
            links,
        }
    }
}
