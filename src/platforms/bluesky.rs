use std::time::Duration;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{api_error, AccountInfo, Credentials, Platform, PlatformError, SocialPlatform};
use crate::thread::{plan_thread, PostRef, PublishOutcome, ReplyRef, ThreadPoster};

/// Bluesky post length limit.
pub const BLUESKY_CHAR_LIMIT: usize = 300;

const POST_COLLECTION: &str = "app.bsky.feed.post";

/// Session returned by createSession / refreshSession.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionResponse {
    access_jwt: String,
    refresh_jwt: String,
    handle: String,
    did: String,
    #[serde(default)]
    display_name: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreateSessionRequest<'a> {
    identifier: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct FeedPostRecord<'a> {
    #[serde(rename = "$type")]
    record_type: &'static str,
    text: &'a str,
    #[serde(rename = "createdAt")]
    created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply: Option<&'a ReplyRef>,
}

#[derive(Debug, Serialize)]
struct CreateRecordRequest<'a> {
    repo: &'a str,
    collection: &'static str,
    record: FeedPostRecord<'a>,
}

/// Response from createRecord.
#[derive(Debug, Deserialize)]
struct CreateRecordResponse {
    uri: String,
    cid: String,
}

#[derive(Debug, Clone)]
struct Session {
    access_jwt: String,
    refresh_jwt: String,
    did: String,
    account: AccountInfo,
}

/// AT Protocol client that posts to Bluesky, threading long content.
pub struct BlueskyClient {
    client: reqwest::Client,
    base_url: String,
    poster: ThreadPoster,
    session: Option<Session>,
}

impl BlueskyClient {
    /// Create a client against the given PDS base URL (e.g. `https://bsky.social`).
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: &str, thread_delay: Duration) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            poster: ThreadPoster::new(Platform::Bluesky.name(), thread_delay),
            session: None,
        }
    }

    fn xrpc_url(&self, method: &str) -> String {
        format!("{}/xrpc/{method}", self.base_url)
    }

    /// Strip surrounding whitespace and a leading `@` from a handle.
    fn clean_identifier(username: &str) -> &str {
        let trimmed = username.trim();
        trimmed.strip_prefix('@').unwrap_or(trimmed)
    }

    fn store_session(&mut self, response: SessionResponse) -> &AccountInfo {
        let account = AccountInfo {
            name: response
                .display_name
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| response.handle.clone()),
            profile_url: Some(format!("https://bsky.app/profile/{}", response.handle)),
            handle: Some(response.handle),
        };
        let session = self.session.insert(Session {
            access_jwt: response.access_jwt,
            refresh_jwt: response.refresh_jwt,
            did: response.did,
            account,
        });
        &session.account
    }

    /// Exchange the refresh token for a new access token.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no session or the refresh is rejected.
    pub async fn refresh_session(&mut self) -> Result<(), PlatformError> {
        let refresh_jwt = self
            .session
            .as_ref()
            .map(|s| s.refresh_jwt.clone())
            .ok_or(PlatformError::NotConnected("Bluesky"))?;

        let response = self
            .client
            .post(self.xrpc_url("com.atproto.server.refreshSession"))
            .bearer_auth(refresh_jwt)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response, "Session refresh failed").await);
        }

        let refreshed: SessionResponse = response.json().await?;
        self.store_session(refreshed);
        debug!("Bluesky session refreshed");
        Ok(())
    }

    async fn create_record(
        &self,
        text: &str,
        reply: Option<&ReplyRef>,
    ) -> Result<PostRef, PlatformError> {
        let session = self
            .session
            .as_ref()
            .ok_or(PlatformError::NotConnected("Bluesky"))?;

        let request = CreateRecordRequest {
            repo: &session.did,
            collection: POST_COLLECTION,
            record: FeedPostRecord {
                record_type: POST_COLLECTION,
                text,
                created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                reply,
            },
        };

        let response = self
            .client
            .post(self.xrpc_url("com.atproto.repo.createRecord"))
            .bearer_auth(&session.access_jwt)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response, "Post failed").await);
        }

        let created: CreateRecordResponse = response.json().await?;
        Ok(PostRef {
            uri: created.uri,
            cid: created.cid,
        })
    }
}

#[async_trait]
impl SocialPlatform for BlueskyClient {
    fn platform(&self) -> Platform {
        Platform::Bluesky
    }

    fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    fn account(&self) -> Option<&AccountInfo> {
        self.session.as_ref().map(|s| &s.account)
    }

    async fn connect(&mut self, credentials: &Credentials) -> Result<String, PlatformError> {
        let (Some(username), Some(password)) = (
            Credentials::field(credentials.username.as_ref()),
            credentials.password.as_deref().filter(|p| !p.is_empty()),
        ) else {
            return Err(PlatformError::MissingCredentials(
                "Username and password are required",
            ));
        };

        let identifier = Self::clean_identifier(username);
        debug!(identifier, password_len = password.len(), "Creating Bluesky session");

        let response = self
            .client
            .post(self.xrpc_url("com.atproto.server.createSession"))
            .json(&CreateSessionRequest {
                identifier,
                password,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let err = api_error(response, "Authentication failed").await;
            warn!(error = %err, "Bluesky connection failed");
            return Err(err);
        }

        let session: SessionResponse = response.json().await?;
        let account = self.store_session(session);
        let handle = account.handle.clone().unwrap_or_default();
        info!(handle = %handle, "Connected to Bluesky");
        Ok(format!("Successfully connected to Bluesky as @{handle}"))
    }

    fn disconnect(&mut self) {
        self.session = None;
    }

    async fn post_single(&self, text: &str) -> Result<PostRef, PlatformError> {
        self.create_record(text, None).await
    }

    async fn post_linked_reply(
        &self,
        text: &str,
        reply: &ReplyRef,
    ) -> Result<PostRef, PlatformError> {
        self.create_record(text, Some(reply)).await
    }

    async fn post_content(&self, content: &str) -> PublishOutcome {
        if !self.is_connected() {
            return PublishOutcome::failed("Not connected to Bluesky", 1);
        }

        let plan = match plan_thread(content, BLUESKY_CHAR_LIMIT) {
            Ok(plan) => plan,
            Err(e) => return PublishOutcome::failed(format!("Bluesky post error: {e}"), 1),
        };

        info!(
            original_len = content.chars().count(),
            segments = plan.len(),
            "Posting to Bluesky"
        );

        self.poster.post_plan(self, &plan).await
    }
}
