use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use super::pages::{
    render_accounts_page, render_generate_page, render_history_page, render_preview_page,
    render_publish_page, GeneratePageParams, PublishPageParams,
};
use super::AppState;
use crate::components::Flash;
use crate::constants::HISTORY_PAGE_SIZE;
use crate::db::{get_content_history, store_content, ContentMetadata, NewContentRecord};
use crate::formatter::format_for_platform;
use crate::llm::extract_final_post;
use crate::platforms::{Credentials, Platform, PlatformError, BLUESKY_CHAR_LIMIT};
use crate::thread::{plan_thread, PublishOutcome, ThreadPlan};
use crate::workspace::GenerationSettings;

/// Create the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(generate_form))
        .route("/generate", post(generate))
        .route("/preview", get(preview))
        .route("/preview/:platform/edit", post(edit_content))
        .route("/preview/:platform/refine", post(refine_content))
        .route("/preview/:platform/revert/:idx", post(revert_content))
        .route("/accounts", get(accounts))
        .route("/accounts/:platform/connect", post(connect_account))
        .route("/accounts/:platform/disconnect", post(disconnect_account))
        .route("/publish", get(publish_form).post(publish))
        .route("/history", get(history))
        .route("/api/thread-plan", post(api_thread_plan))
        .route("/healthz", get(health))
}

fn parse_platform(name: &str) -> Result<Platform, Response> {
    Platform::parse(name).ok_or_else(|| (StatusCode::NOT_FOUND, "Unknown platform").into_response())
}

// ========== Generate ==========

/// Parsed generate form. Platforms arrive as repeated `platform` fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    pub topic: String,
    pub content_type: String,
    pub tone: String,
    pub include_hashtags: bool,
    pub platforms: Vec<Platform>,
}

impl GenerateRequest {
    /// Validate raw form fields.
    ///
    /// # Errors
    ///
    /// Returns a user-facing message when a required field is missing.
    pub fn from_fields(fields: &[(String, String)]) -> Result<Self, &'static str> {
        let value = |key: &str| {
            fields
                .iter()
                .find(|(k, _)| k == key)
                .map_or("", |(_, v)| v.trim())
        };

        let mut platforms: Vec<Platform> = fields
            .iter()
            .filter(|(k, _)| k == "platform")
            .filter_map(|(_, v)| Platform::parse(v))
            .collect();
        platforms.sort();
        platforms.dedup();

        if platforms.is_empty() {
            return Err("Please select at least one platform");
        }

        let topic = value("topic");
        if topic.is_empty() {
            return Err("Please enter a topic");
        }

        let content_type = match value("content_type") {
            "custom" => {
                let custom = value("custom_content_type");
                if custom.is_empty() {
                    return Err("Please describe the custom content type");
                }
                custom
            }
            "" => "trend_analysis",
            other => other,
        };

        let tone = match value("tone") {
            "" => "professional".to_string(),
            t => t.to_lowercase(),
        };

        Ok(Self {
            topic: topic.to_string(),
            content_type: content_type.to_string(),
            tone,
            include_hashtags: value("include_hashtags") == "true",
            platforms,
        })
    }
}

async fn generate_form(State(state): State<AppState>) -> Response {
    let workspace = state.workspace.read().await;
    let platforms = workspace.platforms();
    let html = render_generate_page(&GeneratePageParams {
        flash: None,
        previous: workspace.settings(),
        generated: &platforms,
    });
    html.into_response()
}

async fn generate(
    State(state): State<AppState>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Response {
    let request = match GenerateRequest::from_fields(&fields) {
        Ok(r) => r,
        Err(message) => {
            let flash = Flash::error(message);
            let html = render_generate_page(&GeneratePageParams {
                flash: Some(&flash),
                ..GeneratePageParams::default()
            });
            return (StatusCode::BAD_REQUEST, html).into_response();
        }
    };

    let mut generated = Vec::with_capacity(request.platforms.len());
    for &platform in &request.platforms {
        let raw = match state
            .llm
            .generate_content(&request.topic, &request.content_type, platform)
            .await
        {
            Ok(text) => extract_final_post(&text),
            Err(e) => {
                error!(platform = %platform, "Content generation failed: {e:#}");
                let flash = Flash::error(format!("Error generating content: {e:#}"));
                let html = render_generate_page(&GeneratePageParams {
                    flash: Some(&flash),
                    ..GeneratePageParams::default()
                });
                return (StatusCode::BAD_GATEWAY, html).into_response();
            }
        };
        let formatted = format_for_platform(&raw, platform, request.include_hashtags);
        generated.push((platform, raw, formatted));
    }

    for (platform, _, formatted) in &generated {
        let record = NewContentRecord {
            topic: request.topic.clone(),
            platform: platform.as_str().to_string(),
            content: formatted.clone(),
            metadata: Some(ContentMetadata::new(
                &request.content_type,
                &request.tone,
                formatted,
            )),
        };
        if let Err(e) = store_content(state.db.pool(), &record).await {
            error!(platform = %platform, "Failed to log generated content: {e:#}");
        }
    }

    let settings = GenerationSettings {
        topic: request.topic.clone(),
        content_type: request.content_type.clone(),
        tone: request.tone.clone(),
        include_hashtags: request.include_hashtags,
    };

    let mut workspace = state.workspace.write().await;
    workspace.start(settings);
    for (platform, raw, formatted) in generated {
        workspace.insert(platform, raw, formatted);
    }
    info!(topic = %request.topic, platforms = request.platforms.len(), "Content generated");

    let flash = Flash::success("Content generated successfully!");
    render_generate_page(&GeneratePageParams {
        flash: Some(&flash),
        previous: workspace.settings(),
        generated: &request.platforms,
    })
    .into_response()
}

// ========== Preview & Edit ==========

async fn preview(State(state): State<AppState>) -> Response {
    let workspace = state.workspace.read().await;
    render_preview_page(&workspace, None).into_response()
}

#[derive(Debug, Deserialize)]
pub struct EditForm {
    content: String,
}

async fn edit_content(
    State(state): State<AppState>,
    Path(platform): Path<String>,
    Form(form): Form<EditForm>,
) -> Response {
    let platform = match parse_platform(&platform) {
        Ok(p) => p,
        Err(response) => return response,
    };

    if state.workspace.write().await.edit(platform, form.content) {
        Redirect::to("/preview").into_response()
    } else {
        (StatusCode::NOT_FOUND, "No content for this platform").into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct RefineForm {
    request: String,
}

async fn refine_content(
    State(state): State<AppState>,
    Path(platform): Path<String>,
    Form(form): Form<RefineForm>,
) -> Response {
    let platform = match parse_platform(&platform) {
        Ok(p) => p,
        Err(response) => return response,
    };

    let request = form.request.trim().to_string();
    if request.is_empty() {
        let workspace = state.workspace.read().await;
        let flash = Flash::error("Please enter a refinement request");
        return (
            StatusCode::BAD_REQUEST,
            render_preview_page(&workspace, Some(&flash)),
        )
            .into_response();
    }

    let current = state
        .workspace
        .read()
        .await
        .get(platform)
        .map(|entry| entry.formatted.clone());
    let Some(current) = current else {
        return (StatusCode::NOT_FOUND, "No content for this platform").into_response();
    };

    match state.llm.refine_content(&current, &request, platform).await {
        Ok(text) => {
            let refined = extract_final_post(&text);
            let mut workspace = state.workspace.write().await;
            workspace.refine(platform, request, refined);
            let flash = Flash::success(format!("{} content refined successfully!", platform.name()));
            render_preview_page(&workspace, Some(&flash)).into_response()
        }
        Err(e) => {
            error!(platform = %platform, "Refinement failed: {e:#}");
            let workspace = state.workspace.read().await;
            let flash = Flash::error(format!("Error refining content: {e:#}"));
            (
                StatusCode::BAD_GATEWAY,
                render_preview_page(&workspace, Some(&flash)),
            )
                .into_response()
        }
    }
}

async fn revert_content(
    State(state): State<AppState>,
    Path((platform, idx)): Path<(String, usize)>,
) -> Response {
    let platform = match parse_platform(&platform) {
        Ok(p) => p,
        Err(response) => return response,
    };

    if state.workspace.write().await.revert(platform, idx) {
        Redirect::to("/preview").into_response()
    } else {
        (StatusCode::NOT_FOUND, "Refinement not found").into_response()
    }
}

// ========== Accounts ==========

async fn accounts(State(state): State<AppState>) -> Response {
    let statuses = state.platforms.read().await.statuses();
    render_accounts_page(&statuses, None).into_response()
}

async fn connect_account(
    State(state): State<AppState>,
    Path(platform): Path<String>,
    Form(credentials): Form<Credentials>,
) -> Response {
    let platform = match parse_platform(&platform) {
        Ok(p) => p,
        Err(response) => return response,
    };

    let mut manager = state.platforms.write().await;
    let Some(backend) = manager.get_mut(platform) else {
        return (StatusCode::NOT_FOUND, "Platform not available").into_response();
    };

    let (status, flash) = match backend.connect(&credentials).await {
        Ok(message) => (StatusCode::OK, Flash::success(message)),
        Err(e) => {
            warn!(platform = %platform, error = %e, "Connection failed");
            let status = match e {
                PlatformError::MissingCredentials(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::BAD_GATEWAY,
            };
            (
                status,
                Flash::error(format!("{} connection failed: {e}", platform.name())),
            )
        }
    };

    (status, render_accounts_page(&manager.statuses(), Some(&flash))).into_response()
}

async fn disconnect_account(
    State(state): State<AppState>,
    Path(platform): Path<String>,
) -> Response {
    let platform = match parse_platform(&platform) {
        Ok(p) => p,
        Err(response) => return response,
    };

    if let Some(backend) = state.platforms.write().await.get_mut(platform) {
        backend.disconnect();
        info!(platform = %platform, "Disconnected");
    }
    Redirect::to("/accounts").into_response()
}

// ========== Publish ==========

async fn publish_form(State(state): State<AppState>) -> Response {
    let connected = state.platforms.read().await.connected_platforms();
    let workspace = state.workspace.read().await;
    render_publish_page(&PublishPageParams {
        workspace: &workspace,
        connected: &connected,
        results: None,
        flash: None,
    })
    .into_response()
}

async fn publish(
    State(state): State<AppState>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Response {
    let selected: Vec<Platform> = fields
        .iter()
        .filter(|(k, _)| k == "platform")
        .filter_map(|(_, v)| Platform::parse(v))
        .collect();

    let (status, flash, results) = if selected.is_empty() {
        (
            StatusCode::BAD_REQUEST,
            Some(Flash::error("Please select at least one platform")),
            None,
        )
    } else {
        let content = state.workspace.read().await.publishable();
        let results: BTreeMap<Platform, PublishOutcome> = state
            .platforms
            .read()
            .await
            .post_to_multiple(&content, &selected)
            .await;
        (StatusCode::OK, None, Some(results))
    };

    let connected = state.platforms.read().await.connected_platforms();
    let workspace = state.workspace.read().await;
    let html = render_publish_page(&PublishPageParams {
        workspace: &workspace,
        connected: &connected,
        results: results.as_ref(),
        flash: flash.as_ref(),
    });
    (status, html).into_response()
}

// ========== History ==========

async fn history(State(state): State<AppState>) -> Response {
    match get_content_history(state.db.pool(), HISTORY_PAGE_SIZE).await {
        Ok(records) => render_history_page(&records).into_response(),
        Err(e) => {
            error!("Failed to fetch content history: {e:#}");
            (StatusCode::INTERNAL_SERVER_ERROR, "Database error").into_response()
        }
    }
}

// ========== API ==========

#[derive(Debug, Deserialize)]
pub struct ThreadPlanRequest {
    text: String,
    limit: Option<usize>,
}

#[derive(Debug, Serialize)]
struct ApiError {
    error: String,
}

async fn api_thread_plan(Json(request): Json<ThreadPlanRequest>) -> Response {
    let limit = request.limit.unwrap_or(BLUESKY_CHAR_LIMIT);
    match plan_thread(&request.text, limit) {
        Ok(plan) => Json::<ThreadPlan>(plan).into_response(),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}

async fn health() -> &'static str {
    "OK"
}
