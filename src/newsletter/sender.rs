//! Batch newsletter dispatch through a transactional email HTTP API

use anyhow::{Context, Result};
use futures::future::join_all;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Serialize;
use serde_json::json;

use super::subscriber::Subscriber;
use crate::helpers::escape_html;

/// Per-batch concurrency cap (free-tier limit of the email service)
pub const SEND_BATCH_SIZE: usize = 50;

const DEFAULT_API_BASE: &str = "https://api.resend.com";

/// Client for the transactional email service
#[derive(Debug, Clone)]
pub struct EmailClient {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
    from: String,
}

impl EmailClient {
    pub fn new(api_key: String, from: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: DEFAULT_API_BASE.to_string(),
            api_key,
            from,
        }
    }

    /// Send one email with a List-Unsubscribe header
    pub async fn send(
        &self,
        to: &str,
        subject: &str,
        html: &str,
        unsubscribe_url: &str,
    ) -> Result<()> {
        let response = self
            .http
            .post(format!("{}/emails", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&json!({
                "from": self.from,
                "to": to,
                "subject": subject,
                "html": html,
                "headers": {
                    "List-Unsubscribe": format!("<{}>", unsubscribe_url),
                },
            }))
            .send()
            .await
            .context("email request failed")?;

        response
            .error_for_status()
            .context("email service rejected the send")?;
        Ok(())
    }
}

/// The new-post notification content
#[derive(Debug, Clone)]
pub struct Announcement {
    pub title: String,
    pub abstract_: String,
    pub slug: String,
}

impl Announcement {
    pub fn subject(&self) -> String {
        format!("New Post: {}", self.title)
    }

    /// Minimal inline-styled notification body
    pub fn html(&self, site_url: &str, unsubscribe_url: &str) -> String {
        let post_url = format!("{}/{}", site_url.trim_end_matches('/'), self.slug);
        format!(
            r#"<div style="font-family: sans-serif; max-width: 560px; margin: 0 auto; padding: 24px;">
  <h1 style="font-size: 22px; margin-bottom: 8px;">{title}</h1>
  <p style="color: #555; line-height: 1.6;">{abstract_}</p>
  <p><a href="{post_url}" style="color: #f0c040; font-weight: 600;">Read the full post &rarr;</a></p>
  <hr style="border: none; border-top: 1px solid #ddd; margin: 24px 0;">
  <p style="font-size: 12px; color: #999;">
    You receive this because you subscribed to new-post notifications.
    <a href="{unsubscribe_url}" style="color: #999;">Unsubscribe</a>
  </p>
</div>"#,
            title = escape_html(&self.title),
            abstract_ = escape_html(&self.abstract_),
            post_url = post_url,
            unsubscribe_url = unsubscribe_url,
        )
    }
}

/// One failed recipient
#[derive(Debug, Clone, Serialize)]
pub struct SendFailure {
    pub email: String,
    pub error: String,
}

/// Aggregated send result; partial failure is data, not an error
#[derive(Debug, Default, Serialize)]
pub struct DispatchReport {
    pub sent: usize,
    pub failed: Vec<SendFailure>,
}

/// Send the announcement to every recipient: batches of
/// [`SEND_BATCH_SIZE`], concurrent within a batch, sequential across
/// batches. Already-sent emails are never recalled.
pub async fn dispatch(
    client: &EmailClient,
    subscribers: &[Subscriber],
    announcement: &Announcement,
    site_url: &str,
) -> DispatchReport {
    let subject = announcement.subject();
    let mut report = DispatchReport::default();

    for batch in subscribers.chunks(SEND_BATCH_SIZE) {
        let sends = batch.iter().map(|subscriber| {
            let subject = subject.clone();
            async move {
                let unsubscribe = unsubscribe_url(site_url, &subscriber.email);
                let html = announcement.html(site_url, &unsubscribe);
                client
                    .send(&subscriber.email, &subject, &html, &unsubscribe)
                    .await
                    .map_err(|e| SendFailure {
                        email: subscriber.email.clone(),
                        error: format!("{:#}", e),
                    })
            }
        });

        for result in join_all(sends).await {
            match result {
                Ok(()) => report.sent += 1,
                Err(failure) => {
                    tracing::warn!("Failed to send to {}: {}", failure.email, failure.error);
                    report.failed.push(failure);
                }
            }
        }
    }

    report
}

/// Unsubscribe link embedded in delivered emails
pub fn unsubscribe_url(site_url: &str, email: &str) -> String {
    format!(
        "{}/api/newsletter/unsubscribe?email={}",
        site_url.trim_end_matches('/'),
        utf8_percent_encode(email, NON_ALPHANUMERIC)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsubscribe_url_encodes_email() {
        let url = unsubscribe_url("https://example.com/", "user+tag@example.com");
        assert_eq!(
            url,
            "https://example.com/api/newsletter/unsubscribe?email=user%2Btag%40example%2Ecom"
        );
    }

    #[test]
    fn test_announcement_html_links() {
        let announcement = Announcement {
            title: "Hello".to_string(),
            abstract_: "A post".to_string(),
            slug: "hello".to_string(),
        };
        let html = announcement.html("https://example.com", "https://example.com/u");
        assert!(html.contains("https://example.com/hello"));
        assert!(html.contains("https://example.com/u"));
        assert_eq!(announcement.subject(), "New Post: Hello");
    }

    #[test]
    fn test_announcement_html_escapes_content() {
        let announcement = Announcement {
            title: "Tags & <Friends>".to_string(),
            abstract_: "On \"quoting\" <em>everything</em>".to_string(),
            slug: "tags-and-friends".to_string(),
        };
        let html = announcement.html("https://example.com", "https://example.com/u");
        assert!(html.contains("Tags &amp; &lt;Friends&gt;"));
        assert!(html.contains("On &quot;quoting&quot; &lt;em&gt;everything&lt;/em&gt;"));
        assert!(!html.contains("<Friends>"));
        assert!(!html.contains("<em>"));
    }
}
