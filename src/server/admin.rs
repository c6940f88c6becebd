//! Cookie-gated admin API: post listing/creation and subscriber management

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use super::auth::AdminSession;
use super::error::{ApiError, Result};
use super::AppState;
use crate::content::publish::NewPost;
use crate::content::PostSummary;
use crate::newsletter::Subscriber;

/// GET /api/admin/posts
pub async fn list_posts(
    _session: AdminSession,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PostSummary>>> {
    let posts = state.content.list_posts().await?;
    Ok(Json(posts))
}

/// Create-post request: structured fields, or a raw uploaded file
#[derive(Debug, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum CreatePostRequest {
    Write {
        #[serde(default)]
        title: String,
        #[serde(default)]
        slug: String,
        #[serde(rename = "abstract", default)]
        abstract_: String,
        #[serde(default)]
        body: String,
        #[serde(default)]
        category: Option<String>,
        #[serde(default)]
        tags: Vec<String>,
    },
    Upload {
        #[serde(default)]
        filename: String,
        #[serde(default)]
        content: String,
    },
}

/// POST /api/admin/posts
pub async fn create_post(
    _session: AdminSession,
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    let draft = match request {
        CreatePostRequest::Write {
            title,
            slug,
            abstract_,
            body,
            category,
            tags,
        } => NewPost::from_fields(&title, &slug, &abstract_, &body, category, tags)?,
        CreatePostRequest::Upload { filename, content } => {
            NewPost::from_upload(&filename, &content)?
        }
    };

    let created = state.content.create_post(&draft).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": format!("post created ({})", created.source),
            "title": created.title,
            "slug": created.slug,
            "source": created.source,
        })),
    ))
}

#[derive(Debug, Serialize)]
pub struct SubscriberOverview {
    pub total: usize,
    pub active: usize,
    /// The five newest subscribers
    pub recent: Vec<Subscriber>,
    pub all: Vec<Subscriber>,
}

/// GET /api/admin/subscribers
pub async fn list_subscribers(
    _session: AdminSession,
    State(state): State<Arc<AppState>>,
) -> Result<Json<SubscriberOverview>> {
    let store = state
        .subscribers
        .as_ref()
        .ok_or(ApiError::Unavailable("database not configured"))?;

    let all = store.all().await?;
    let active = all.iter().filter(|s| s.is_active).count();

    Ok(Json(SubscriberOverview {
        total: all.len(),
        active,
        recent: all.iter().take(5).cloned().collect(),
        all,
    }))
}

#[derive(Debug, Deserialize)]
pub struct DeleteSubscriberRequest {
    #[serde(default)]
    pub email: String,
}

/// DELETE /api/admin/subscribers
pub async fn delete_subscriber(
    _session: AdminSession,
    State(state): State<Arc<AppState>>,
    Json(request): Json<DeleteSubscriberRequest>,
) -> Result<Json<Value>> {
    let store = state
        .subscribers
        .as_ref()
        .ok_or(ApiError::Unavailable("database not configured"))?;

    if request.email.trim().is_empty() {
        return Err(ApiError::Validation("email required".to_string()));
    }

    if !store.delete(request.email.trim()).await? {
        return Err(ApiError::NotFound);
    }

    Ok(Json(json!({ "message": "Deleted" })))
}
