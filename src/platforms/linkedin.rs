use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, warn};

use super::{api_error, AccountInfo, Credentials, Platform, PlatformError, SocialPlatform};
use crate::thread::{PostLink, PostRef, PublishOutcome};

const PROFILE_PROJECTION: &str =
    "(id,firstName,lastName,profilePicture(displayImage~:playableStreams))";

/// Localized string as returned by the profile API.
#[derive(Debug, Default, Deserialize)]
struct LocalizedName {
    #[serde(default)]
    localized: HashMap<String, String>,
}

impl LocalizedName {
    fn en_us(&self) -> &str {
        self.localized.get("en_US").map_or("", String::as_str)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileResponse {
    #[serde(default)]
    id: String,
    #[serde(default)]
    first_name: LocalizedName,
    #[serde(default)]
    last_name: LocalizedName,
}

#[derive(Debug, Deserialize)]
struct UgcPostResponse {
    #[serde(default)]
    id: String,
}

#[derive(Debug, Clone)]
enum Session {
    Demo,
    Live { access_token: String, person_id: String },
}

/// LinkedIn backend using the UGC posts API, with a demo mode.
pub struct LinkedInClient {
    client: reqwest::Client,
    api_base: String,
    demo_delay: Duration,
    session: Option<(Session, AccountInfo)>,
}

impl LinkedInClient {
    #[must_use]
    pub fn new(client: reqwest::Client, api_base: &str, demo_delay: Duration) -> Self {
        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            demo_delay,
            session: None,
        }
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<ProfileResponse, PlatformError> {
        let url = format!("{}/people/~", self.api_base);
        debug!(token_len = access_token.len(), "Verifying LinkedIn token");

        let response = self
            .client
            .get(url)
            .query(&[("projection", PROFILE_PROJECTION)])
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response, "Invalid access token").await);
        }

        Ok(response.json().await?)
    }

    async fn create_ugc_post(
        &self,
        access_token: &str,
        person_id: &str,
        text: &str,
    ) -> Result<PostRef, PlatformError> {
        let body = json!({
            "author": format!("urn:li:person:{person_id}"),
            "lifecycleState": "PUBLISHED",
            "specificContent": {
                "com.linkedin.ugc.ShareContent": {
                    "shareCommentary": { "text": text },
                    "shareMediaCategory": "NONE"
                }
            },
            "visibility": {
                "com.linkedin.ugc.MemberNetworkVisibility": "PUBLIC"
            }
        });

        let response = self
            .client
            .post(format!("{}/ugcPosts", self.api_base))
            .bearer_auth(access_token)
            .header("X-Restli-Protocol-Version", "2.0.0")
            .json(&body)
            .send()
            .await?;

        if response.status() != StatusCode::CREATED {
            return Err(api_error(response, "Post failed").await);
        }

        let created: UgcPostResponse = response.json().await?;
        Ok(PostRef {
            cid: created.id.clone(),
            uri: created.id,
        })
    }
}

#[async_trait]
impl SocialPlatform for LinkedInClient {
    fn platform(&self) -> Platform {
        Platform::LinkedIn
    }

    fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    fn is_demo(&self) -> bool {
        matches!(self.session, Some((Session::Demo, _)))
    }

    fn account(&self) -> Option<&AccountInfo> {
        self.session.as_ref().map(|(_, account)| account)
    }

    async fn connect(&mut self, credentials: &Credentials) -> Result<String, PlatformError> {
        if credentials.demo {
            self.session = Some((
                Session::Demo,
                AccountInfo {
                    name: "Demo User".to_string(),
                    handle: None,
                    profile_url: Some("https://linkedin.com/in/demo".to_string()),
                },
            ));
            return Ok(
                "LinkedIn connected (Demo mode - Real OAuth integration available)".to_string(),
            );
        }

        let access_token = Credentials::field(credentials.access_token.as_ref())
            .ok_or(PlatformError::MissingCredentials(
                "LinkedIn access token is required",
            ))?;

        let profile = match self.fetch_profile(access_token).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!(error = %e, "LinkedIn connection failed");
                return Err(e);
            }
        };

        let name = format!("{} {}", profile.first_name.en_us(), profile.last_name.en_us())
            .trim()
            .to_string();
        let account = AccountInfo {
            name: name.clone(),
            handle: None,
            profile_url: Some(format!("https://linkedin.com/in/{}", profile.id)),
        };
        self.session = Some((
            Session::Live {
                access_token: access_token.to_string(),
                person_id: profile.id,
            },
            account,
        ));

        info!(name = %name, "Connected to LinkedIn");
        Ok(format!("Successfully connected to LinkedIn as {name}"))
    }

    fn disconnect(&mut self) {
        self.session = None;
    }

    async fn post_single(&self, text: &str) -> Result<PostRef, PlatformError> {
        match &self.session {
            None => Err(PlatformError::NotConnected("LinkedIn")),
            Some((Session::Demo, _)) => {
                tokio::time::sleep(self.demo_delay).await;
                Ok(PostRef {
                    uri: "demo://linkedin".to_string(),
                    cid: "demo".to_string(),
                })
            }
            Some((
                Session::Live {
                    access_token,
                    person_id,
                },
                _,
            )) => self.create_ugc_post(access_token, person_id, text).await,
        }
    }

    async fn post_content(&self, content: &str) -> PublishOutcome {
        if !self.is_connected() {
            return PublishOutcome::failed("Not connected to LinkedIn", 1);
        }

        match self.post_single(content).await {
            Ok(post) => {
                let message = if self.is_demo() {
                    "Posted to LinkedIn successfully (Demo mode)".to_string()
                } else {
                    format!("Posted successfully to LinkedIn! Post ID: {}", post.uri)
                };
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
                warn!(error = %e, "LinkedIn post failed");
                PublishOutcome::failed(format!("LinkedIn post failed: {e}"), 1)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> LinkedInClient {
        LinkedInClient::new(reqwest::Client::new(), "http://127.0.0.1:1/v2/", Duration::ZERO)
    }

    #[test]
    fn test_api_base_trimmed() {
        assert_eq!(client().api_base, "http://127.0.0.1:1/v2");
    }

    #[test]
    fn test_profile_name_parsing() {
        let profile: ProfileResponse = serde_json::from_str(
            r#"{"id":"abc","firstName":{"localized":{"en_US":"Ada"}},"lastName":{"localized":{"en_US":"Lovelace"}}}"#,
        )
        .unwrap();
        assert_eq!(profile.id, "abc");
        assert_eq!(profile.first_name.en_us(), "Ada");
        assert_eq!(profile.last_name.en_us(), "Lovelace");

        let bare: ProfileResponse = serde_json::from_str(r#"{"id":"x"}"#).unwrap();
        assert_eq!(bare.first_name.en_us(), "");
    }

    #[tokio::test]
    async fn test_missing_token_rejected() {
        let mut linkedin = client();
        let err = linkedin.connect(&Credentials::default()).await.unwrap_err();
        assert_eq!(err.to_string(), "LinkedIn access token is required");
        assert!(!linkedin.is_connected());
    }

    #[tokio::test]
    async fn test_demo_mode() {
        let mut linkedin = client();
        let credentials = Credentials {
            demo: true,
            ..Credentials::default()
        };
        let message = linkedin.connect(&credentials).await.unwrap();
        assert_eq!(
            message,
            "LinkedIn connected (Demo mode - Real OAuth integration available)"
        );
        assert!(linkedin.is_demo());

        let outcome = linkedin.post_content("Hello network.").await;
        assert!(outcome.success());
        assert_eq!(outcome.message, "Posted to LinkedIn successfully (Demo mode)");
    }
}
