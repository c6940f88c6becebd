//! Public HTML pages: post list and post detail

use axum::extract::{Path, State};
use axum::response::Html;
use std::sync::Arc;

use super::error::{ApiError, Result};
use super::AppState;
use crate::content::markdown;
use crate::helpers::{display_date, escape_html};

/// Shared page chrome
fn layout(site_title: &str, page_title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{page_title}</title>
  <style>
    body {{
      font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
      background: #0a0a0a;
      color: #e0e0e0;
      max-width: 720px;
      margin: 0 auto;
      padding: 32px 20px;
      line-height: 1.6;
    }}
    a {{ color: #f0c040; text-decoration: none; }}
    h1, h2, h3 {{ line-height: 1.25; }}
    .meta {{ color: #999; font-size: 14px; }}
    .card {{
      background: #1a1a1a;
      border: 1px solid #333;
      border-radius: 12px;
      padding: 20px 24px;
      margin-bottom: 16px;
    }}
    pre {{ background: #1a1a1a; padding: 16px; border-radius: 8px; overflow-x: auto; }}
    code {{ font-size: 14px; }}
    header {{ margin-bottom: 32px; }}
  </style>
</head>
<body>
  <header><a href="/">{site_title}</a></header>
  {body}
</body>
</html>"#,
        page_title = escape_html(page_title),
        site_title = escape_html(site_title),
        body = body,
    )
}

/// GET / - latest posts, newest first
pub async fn home(State(state): State<Arc<AppState>>) -> Result<Html<String>> {
    let posts = state.content.list_posts().await?;

    let mut cards = String::from("<h1>Latest Content:</h1>\n");
    for post in &posts {
        cards.push_str(&format!(
            r#"<div class="card">
  <h2><a href="/{slug}">{title}</a></h2>
  <p class="meta">{date} &middot; {reading_time}</p>
  <p>{abstract_}</p>
</div>
"#,
            slug = escape_html(&post.slug),
            title = escape_html(&post.title),
            date = display_date(&post.published_on),
            // Normalized here; the backends disagree on the raw format
            reading_time = post.reading_time,
            abstract_ = escape_html(&post.abstract_),
        ));
    }

    Ok(Html(layout(&state.config.title, &state.config.title, &cards)))
}

/// GET /:slug - post detail
pub async fn post(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Html<String>> {
    let post = state
        .content
        .load_post(&slug)
        .await?
        .ok_or(ApiError::NotFound)?;

    let mut body = format!(
        r#"<article>
<h1>{title}</h1>
<p class="meta">{date} &middot; {reading_time}</p>
"#,
        title = escape_html(&post.title),
        date = display_date(&post.published_on),
        reading_time = post.reading_time,
    );
    if !post.tags.is_empty() {
        body.push_str(&format!(
            "<p class=\"meta\">Tags: {}</p>\n",
            escape_html(&post.tags.join(", "))
        ));
    }
    body.push_str(&markdown::render(&post.body));
    body.push_str("</article>");

    let page_title = format!("{} \u{2022} {}", post.title, state.config.title);
    Ok(Html(layout(&state.config.title, &page_title, &body)))
}
