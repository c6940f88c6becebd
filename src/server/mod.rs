//! HTTP server: state, routes, and startup

mod admin;
mod auth;
mod error;
mod feed;
mod newsletter;
mod pages;

pub use error::ApiError;

use anyhow::Result;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::SiteConfig;
use crate::content::ContentSource;
use crate::newsletter::{EmailClient, SubscriberStore};
use crate::Paperboy;

/// Process-lifetime shared state: configuration plus the service clients,
/// each initialized once and reused across requests.
pub struct AppState {
    pub config: SiteConfig,
    pub content: ContentSource,
    /// `None` when no database is configured; handlers answer 503
    pub subscribers: Option<SubscriberStore>,
    /// `None` when no email API key is configured; handlers answer 503
    pub mailer: Option<EmailClient>,
}

/// Build the shared state from configuration
pub async fn build_state(app: &Paperboy) -> Result<AppState> {
    let content = ContentSource::from_config(&app.config, &app.base_dir);

    let subscribers = if app.config.database_url.trim().is_empty() {
        tracing::warn!("No database configured; newsletter features are disabled");
        None
    } else {
        let url = &app.config.database_url;
        Some(SubscriberStore::connect(url).await?)
    };

    let mailer = match &app.config.email.api_key {
        Some(api_key) => Some(EmailClient::new(
            api_key.clone(),
            app.config.email.from.clone(),
        )),
        None => {
            tracing::warn!("No email API key configured; sending is disabled");
            None
        }
    };

    if app.config.admin_password.is_none() {
        tracing::warn!("No admin password configured; admin routes are disabled");
    }

    Ok(AppState {
        config: app.config.clone(),
        content,
        subscribers,
        mailer,
    })
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(pages::home))
        .route("/rss.xml", get(feed::rss))
        .route("/sitemap.xml", get(feed::sitemap))
        .route("/api/newsletter/subscribe", post(newsletter::subscribe))
        .route("/api/newsletter/unsubscribe", get(newsletter::unsubscribe))
        .route("/api/newsletter/send", post(newsletter::send))
        .route("/api/admin/auth", post(auth::auth))
        .route(
            "/api/admin/posts",
            get(admin::list_posts).post(admin::create_post),
        )
        .route(
            "/api/admin/subscribers",
            get(admin::list_subscribers).delete(admin::delete_subscriber),
        )
        .route("/:slug", get(pages::post))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server
pub async fn start(app: &Paperboy, ip: &str, port: u16) -> Result<()> {
    let state = Arc::new(build_state(app).await?);
    let router = router(state);

    // Handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
