//! HTTP server for release-notes submission and budget queries

use crate::config::WebhookConfig;
use crate::discord::components::assemble;
use crate::discord::{budget, ATTACHMENT_SIZE_LIMIT, COMPONENT_MAX_LENGTH, MAX_ATTACHMENTS};
use crate::release::{validate, AttachmentFile, ReleaseSubmission};
use crate::webhook::{DiscordWebhook, ReleaseTransport};
use anyhow::Result;
use axum::{
    extract::{DefaultBodyLimit, Multipart, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Shared application state
pub struct AppState {
    pub transport: Arc<dyn ReleaseTransport>,
    pub secret_key: String,
}

// The form can legitimately carry MAX_ATTACHMENTS files at the per-file
// ceiling, plus the text fields and multipart framing.
const MAX_REQUEST_BYTES: usize =
    (MAX_ATTACHMENTS as u64 * ATTACHMENT_SIZE_LIMIT) as usize + 1024 * 1024;

/// Run the HTTP server
pub async fn run_http_server(host: &str, port: u16) -> Result<()> {
    let webhook_config = WebhookConfig::from_env()?;
    let secret_key = webhook_config.secret_key.clone();
    let transport: Arc<dyn ReleaseTransport> = Arc::new(DiscordWebhook::new(webhook_config));
    let state = Arc::new(AppState {
        transport,
        secret_key,
    });

    let app = router(state);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("HTTP server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the router; split out so tests can drive it with a stub transport.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/budget", get(get_budget))
        .route("/api/release-notes", post(submit_release_notes))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BYTES))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Health check response
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Query for the live character counters
#[derive(Debug, Deserialize)]
struct BudgetQuery {
    #[serde(default)]
    project: String,
    #[serde(default = "default_version")]
    version: String,
    #[serde(default)]
    changelog: Option<String>,
}

fn default_version() -> String {
    "0.0.0".to_string()
}

/// Budget numbers for a client-side editor to observe
#[derive(Debug, Serialize)]
struct BudgetResponse {
    ceiling: i64,
    announcement_length: i64,
    header_length: i64,
    footer_length: i64,
    max_changelog_length: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    remaining_length: Option<i64>,
}

async fn get_budget(Query(query): Query<BudgetQuery>) -> Json<BudgetResponse> {
    let remaining_length = query
        .changelog
        .as_deref()
        .map(|changelog| budget::remaining_length(&query.project, &query.version, changelog));

    Json(BudgetResponse {
        ceiling: COMPONENT_MAX_LENGTH,
        announcement_length: budget::announcement_length(),
        header_length: budget::header_length(&query.project, &query.version),
        footer_length: budget::footer_length(),
        max_changelog_length: budget::max_changelog_length(&query.project, &query.version),
        remaining_length,
    })
}

async fn submit_release_notes(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let submission = match read_submission(&mut multipart).await {
        Ok(submission) => submission,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "success": false,
                    "message": format!("Malformed form data: {}", e),
                })),
            )
                .into_response();
        }
    };

    // Every constraint is rechecked here with the server's own budget math;
    // client-side counters are display only.
    if let Err(errors) = validate::validate(&submission, &state.secret_key) {
        tracing::debug!("rejected submission: {}", errors.to_message());
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "success": false,
                "message": errors.to_message(),
                "errors": errors.by_field(),
            })),
        )
            .into_response();
    }

    let (payload, files) = assemble(&submission);
    match state.transport.deliver(&payload, &files).await {
        Ok(()) => {
            tracing::info!(
                "published release notes for {} v{}",
                submission.project,
                submission.version
            );
            (StatusCode::OK, Json(serde_json::json!({ "success": true }))).into_response()
        }
        Err(e) => {
            // Transport detail stays in the log; the user gets a generic
            // failure and resubmits manually.
            tracing::error!("webhook delivery failed (retryable: {}): {}", e.is_retryable(), e);
            (
                StatusCode::BAD_GATEWAY,
                Json(serde_json::json!({
                    "success": false,
                    "message": "Failed to publish release notes",
                })),
            )
                .into_response()
        }
    }
}

/// Pull the form fields out of the multipart body.
async fn read_submission(multipart: &mut Multipart) -> Result<ReleaseSubmission> {
    let mut submission = ReleaseSubmission::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "project" => submission.project = field.text().await?,
            "version" => submission.version = field.text().await?,
            "changelog" => submission.changelog = field.text().await?,
            "secretKey" => submission.secret_key = field.text().await?,
            "files" => {
                let file_name = field.file_name().unwrap_or("file").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await?.to_vec();
                submission.files.push(AttachmentFile {
                    name: file_name,
                    content_type,
                    bytes,
                });
            }
            other => tracing::debug!("ignoring unknown form field {:?}", other),
        }
    }

    Ok(submission)
}
