//! Client for the Perplexity chat-completions API.

pub mod prompts;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::Config;
use crate::platforms::Platform;

/// Phrases that mark a response as containing the model's reasoning.
const REASONING_TRIGGERS: &[&str] = &["Let me", "I need to", "From the search results"];

/// Phrases that disqualify a paragraph from being the final post.
const REASONING_PHRASES: &[&str] = &["Let me", "I need to", "From the search", "The user wants"];

const MIN_FINAL_PARAGRAPH_LEN: usize = 50;

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Generates and refines post text.
#[derive(Clone)]
pub struct PerplexityClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl PerplexityClient {
    #[must_use]
    pub fn new(config: &Config, http: reqwest::Client) -> Self {
        Self {
            http,
            api_key: config.perplexity_api_key.clone(),
            base_url: config.perplexity_base_url.trim_end_matches('/').to_string(),
            model: config.perplexity_model.clone(),
            temperature: config.llm_temperature,
            max_tokens: config.llm_max_tokens,
        }
    }

    /// Generate a post about `topic`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API responds with a non-2xx status.
    pub async fn generate_content(
        &self,
        topic: &str,
        content_type: &str,
        platform: Platform,
    ) -> Result<String> {
        let system = prompts::generation_system_prompt(content_type, platform);
        let user = prompts::generation_user_prompt(topic, content_type, platform);
        info!(topic, content_type, platform = %platform, "Generating content");
        self.complete(&system, &user).await
    }

    /// Rewrite `original` according to `request`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API responds with a non-2xx status.
    pub async fn refine_content(
        &self,
        original: &str,
        request: &str,
        platform: Platform,
    ) -> Result<String> {
        let system = prompts::refinement_system_prompt(platform);
        let user = prompts::refinement_user_prompt(original, request, platform);
        info!(platform = %platform, "Refining content");
        self.complete(&system, &user).await
    }

    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        debug!(url = %url, model = %self.model, "Sending chat completion request");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to send request to LLM API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown".to_string());
            anyhow::bail!("API request failed with status code {}: {}", status.as_u16(), body);
        }

        let chat: ChatResponse = response
            .json()
            .await
            .context("Failed to parse LLM response")?;

        chat.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .context("LLM response contained no choices")
    }
}

/// Strip visible reasoning from a response.
///
/// When the text contains reasoning phrases, returns the last paragraph longer
/// than 50 characters that contains none of them. Otherwise returns the input.
#[must_use]
pub fn extract_final_post(raw: &str) -> String {
    if !REASONING_TRIGGERS.iter().any(|p| raw.contains(p)) {
        return raw.to_string();
    }

    raw.rsplit("\n\n")
        .map(str::trim)
        .find(|paragraph| {
            paragraph.chars().count() > MIN_FINAL_PARAGRAPH_LEN
                && !REASONING_PHRASES.iter().any(|p| paragraph.contains(p))
        })
        .unwrap_or(raw)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_final_post_passthrough() {
        let raw = "A clean post about rust.";
        assert_eq!(extract_final_post(raw), raw);
    }

    #[test]
    fn test_extract_final_post_skips_reasoning() {
        let post = "Rust 2024 brings async closures and a tidier prelude to everyone.";
        let raw = format!(
            "Let me look at the latest release notes first.\n\n{post}\n\nshort tail"
        );
        assert_eq!(extract_final_post(&raw), post);
    }

    #[test]
    fn test_extract_final_post_without_candidate_keeps_raw() {
        let raw = "I need to think.\n\nToo short.";
        assert_eq!(extract_final_post(raw), raw);
    }

    #[test]
    fn test_request_serialization() {
        let request = ChatRequest {
            model: "sonar",
            messages: [
                ChatMessage {
                    role: "system",
                    content: "sys",
                },
                ChatMessage {
                    role: "user",
                    content: "usr",
                },
            ],
            temperature: 0.5,
            max_tokens: 500,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "sonar");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "usr");
        assert_eq!(json["max_tokens"], 500);
    }
}
