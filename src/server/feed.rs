//! RSS feed and sitemap, generated from the content list

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use chrono::{Datelike, Utc};
use std::sync::Arc;

use super::error::Result;
use super::AppState;
use crate::config::SiteConfig;
use crate::content::PostSummary;
use crate::helpers::escape_html;

/// GET /rss.xml
pub async fn rss(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse> {
    let posts = state.content.list_posts().await?;
    let xml = render_rss(&state.config, &posts);
    Ok(([(header::CONTENT_TYPE, "application/xml")], xml))
}

/// GET /sitemap.xml
pub async fn sitemap(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse> {
    let posts = state.content.list_posts().await?;
    let xml = render_sitemap(&state.config, &posts);
    Ok(([(header::CONTENT_TYPE, "application/xml")], xml))
}

fn render_rss(config: &SiteConfig, posts: &[PostSummary]) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<rss version=\"2.0\">\n<channel>\n");
    xml.push_str(&format!("  <title>{}</title>\n", escape_html(&config.title)));
    xml.push_str(&format!(
        "  <description>{}</description>\n",
        escape_html(&config.description)
    ));
    xml.push_str(&format!("  <link>{}</link>\n", escape_html(&config.url)));
    xml.push_str(&format!(
        "  <language>{}</language>\n",
        escape_html(&config.language)
    ));
    xml.push_str(&format!(
        "  <copyright>{} {}</copyright>\n",
        Utc::now().year(),
        escape_html(&config.title)
    ));

    for post in posts {
        xml.push_str("  <item>\n");
        xml.push_str(&format!(
            "    <title>{}</title>\n",
            escape_html(&post.title)
        ));
        xml.push_str(&format!(
            "    <description>{}</description>\n",
            escape_html(&post.abstract_)
        ));
        let url = config.absolute_url(&post.slug);
        xml.push_str(&format!("    <link>{}</link>\n", escape_html(&url)));
        xml.push_str(&format!("    <guid>{}</guid>\n", escape_html(&url)));
        xml.push_str(&format!(
            "    <pubDate>{}</pubDate>\n",
            post.published_on.to_rfc2822()
        ));
        for tag in &post.tags {
            xml.push_str(&format!(
                "    <category>{}</category>\n",
                escape_html(tag)
            ));
        }
        xml.push_str("  </item>\n");
    }

    xml.push_str("</channel>\n</rss>\n");
    xml
}

fn render_sitemap(config: &SiteConfig, posts: &[PostSummary]) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n");

    xml.push_str(&format!(
        "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n    <changefreq>weekly</changefreq>\n    <priority>1.0</priority>\n  </url>\n",
        escape_html(&config.url),
        Utc::now().format("%Y-%m-%d"),
    ));

    for post in posts {
        xml.push_str(&format!(
            "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n    <changefreq>monthly</changefreq>\n    <priority>0.8</priority>\n  </url>\n",
            escape_html(&config.absolute_url(&post.slug)),
            post.published_on.format("%Y-%m-%d"),
        ));
    }

    xml.push_str("</urlset>\n");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ReadingTime;
    use chrono::TimeZone;

    fn sample_posts() -> Vec<PostSummary> {
        vec![PostSummary {
            slug: "tags-and-friends".to_string(),
            title: "Tags & <Friends>".to_string(),
            abstract_: "On escaping".to_string(),
            published_on: Utc.with_ymd_and_hms(2024, 3, 5, 8, 0, 0).unwrap(),
            category: None,
            tags: vec!["rust".to_string()],
            reading_time: ReadingTime::Minutes(2),
        }]
    }

    fn config() -> SiteConfig {
        SiteConfig {
            title: "Test Blog".to_string(),
            url: "https://example.com".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_rss_items_and_escaping() {
        let xml = render_rss(&config(), &sample_posts());
        assert!(xml.contains("<title>Tags &amp; &lt;Friends&gt;</title>"));
        assert!(xml.contains("<link>https://example.com/tags-and-friends</link>"));
        assert!(xml.contains("<category>rust</category>"));
        assert!(xml.contains("Tue, 5 Mar 2024"));
    }

    #[test]
    fn test_sitemap_has_root_and_posts() {
        let xml = render_sitemap(&config(), &sample_posts());
        assert!(xml.contains("<loc>https://example.com</loc>"));
        assert!(xml.contains("<loc>https://example.com/tags-and-friends</loc>"));
        assert!(xml.contains("<lastmod>2024-03-05</lastmod>"));
    }
}
