//! Newsletter endpoints: subscribe, unsubscribe, send

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use super::error::{ApiError, Result};
use super::AppState;
use crate::newsletter::{dispatch, Announcement, SubscribeOutcome, SubscriberEmail};

#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    #[serde(default)]
    pub email: String,
}

/// POST /api/newsletter/subscribe
pub async fn subscribe(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SubscribeRequest>,
) -> Result<impl IntoResponse> {
    let store = state
        .subscribers
        .as_ref()
        .ok_or(ApiError::Unavailable("database not configured"))?;

    let email = SubscriberEmail::parse(&request.email)?;

    match store.subscribe(&email).await? {
        SubscribeOutcome::Created => Ok((
            StatusCode::CREATED,
            Json(json!({
                "message": "You're subscribed! You'll get notified on new articles."
            })),
        )),
        SubscribeOutcome::Reactivated => Ok((
            StatusCode::OK,
            Json(json!({
                "message": "Welcome back! Your subscription is active again."
            })),
        )),
        SubscribeOutcome::AlreadyActive => Err(ApiError::Conflict(
            "you're already subscribed".to_string(),
        )),
    }
}

#[derive(Debug, Deserialize)]
pub struct UnsubscribeParams {
    #[serde(default)]
    pub email: Option<String>,
}

/// GET /api/newsletter/unsubscribe - reached from the link in delivered
/// emails; always answers with an HTML confirmation page.
pub async fn unsubscribe(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UnsubscribeParams>,
) -> Response {
    let site_url = state.config.url.clone();

    let Some(email) = params.email.filter(|e| !e.trim().is_empty()) else {
        return unsubscribe_page(
            StatusCode::BAD_REQUEST,
            &site_url,
            "Missing email address",
            true,
        );
    };

    let Some(store) = state.subscribers.as_ref() else {
        return unsubscribe_page(
            StatusCode::SERVICE_UNAVAILABLE,
            &site_url,
            "Service temporarily unavailable",
            true,
        );
    };

    match store.unsubscribe(email.trim()).await {
        Ok(_) => unsubscribe_page(
            StatusCode::OK,
            &site_url,
            "You have been unsubscribed successfully.",
            false,
        ),
        Err(e) => {
            tracing::error!("Unsubscribe failed: {}", e);
            unsubscribe_page(
                StatusCode::INTERNAL_SERVER_ERROR,
                &site_url,
                "Something went wrong. Please try again.",
                true,
            )
        }
    }
}

fn unsubscribe_page(status: StatusCode, site_url: &str, message: &str, is_error: bool) -> Response {
    let (heading, color) = if is_error {
        ("Error", "#ff6b6b")
    } else {
        ("Unsubscribed", "#4ade80")
    };

    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{heading}</title>
  <style>
    body {{
      font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
      background: #0a0a0a;
      color: #e0e0e0;
      display: flex;
      align-items: center;
      justify-content: center;
      min-height: 100vh;
      margin: 0;
      padding: 20px;
    }}
    .card {{
      background: #1a1a1a;
      border: 1px solid #333;
      border-radius: 12px;
      padding: 40px;
      max-width: 400px;
      text-align: center;
    }}
    h1 {{ font-size: 20px; margin: 0 0 12px; color: {color}; }}
    p {{ color: #999; margin: 0 0 24px; line-height: 1.5; }}
    a {{ color: #f0c040; text-decoration: none; font-weight: 500; }}
  </style>
</head>
<body>
  <div class="card">
    <h1>{heading}</h1>
    <p>{message}</p>
    <a href="{site_url}">&larr; Back to blog</a>
  </div>
</body>
</html>"#,
    );

    (status, Html(html)).into_response()
}

#[derive(Debug, Deserialize)]
pub struct SendRequest {
    #[serde(default)]
    pub secret: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(rename = "abstract", default)]
    pub abstract_: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
}

/// POST /api/newsletter/send - gated by the shared newsletter secret,
/// taken from the Authorization header or the request body.
pub async fn send(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<SendRequest>,
) -> Result<Json<Value>> {
    let configured = state
        .config
        .newsletter_secret
        .as_deref()
        .ok_or(ApiError::Unauthorized("unauthorized"))?;

    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    let provided = bearer.or(request.secret.as_deref());

    if provided != Some(configured) {
        return Err(ApiError::Unauthorized("unauthorized"));
    }

    let (Some(title), Some(abstract_), Some(slug)) = (
        request.title.filter(|s| !s.trim().is_empty()),
        request.abstract_.filter(|s| !s.trim().is_empty()),
        request.slug.filter(|s| !s.trim().is_empty()),
    ) else {
        return Err(ApiError::Validation(
            "missing required fields: title, abstract, slug".to_string(),
        ));
    };

    let store = state
        .subscribers
        .as_ref()
        .ok_or(ApiError::Unavailable("database not configured"))?;
    let mailer = state
        .mailer
        .as_ref()
        .ok_or(ApiError::Unavailable("email service not configured"))?;

    let recipients = store.active().await?;
    if recipients.is_empty() {
        return Ok(Json(json!({ "message": "no active subscribers", "sent": 0 })));
    }

    tracing::info!(
        "Dispatching newsletter for \"{}\" to {} subscribers",
        slug,
        recipients.len()
    );

    let announcement = Announcement {
        title,
        abstract_,
        slug,
    };
    let report = dispatch(mailer, &recipients, &announcement, &state.config.url).await;

    let mut response = json!({
        "message": "newsletter sent",
        "sent": report.sent,
        "failed": report.failed.len(),
    });
    if !report.failed.is_empty() {
        response["errors"] = json!(report.failed);
    }
    Ok(Json(response))
}
