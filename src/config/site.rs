//! Site configuration (paperboy.yml + environment secrets)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
///
/// Non-secret settings come from `paperboy.yml`; secrets are only ever read
/// from the environment (see [`SiteConfig::apply_env`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub language: String,

    // URL used for absolute links (permalinks, feed, unsubscribe links)
    pub url: String,

    // Directory with local post files, relative to the base directory
    pub content_dir: String,

    // Subscriber database (sqlite); empty disables newsletter storage
    pub database_url: String,

    #[serde(default)]
    pub cms: CmsConfig,

    #[serde(default)]
    pub email: EmailConfig,

    /// Admin password, environment-only
    #[serde(skip)]
    pub admin_password: Option<String>,

    /// Shared newsletter secret, environment-only
    #[serde(skip)]
    pub newsletter_secret: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Paperboy".to_string(),
            description: String::new(),
            language: "en".to_string(),
            url: "http://localhost:4000".to_string(),
            content_dir: "content".to_string(),
            database_url: "sqlite://data/paperboy.db".to_string(),
            cms: CmsConfig::default(),
            email: EmailConfig::default(),
            admin_password: None,
            newsletter_secret: None,
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Pull secrets and overrides from the environment.
    ///
    /// `CMS_PROJECT_ID` and `DATABASE_URL` may override the file so a
    /// deployment can switch backends without editing config.
    pub fn apply_env(&mut self) {
        if let Ok(v) = std::env::var("ADMIN_PASSWORD") {
            self.admin_password = Some(v);
        }
        if let Ok(v) = std::env::var("NEWSLETTER_SECRET") {
            self.newsletter_secret = Some(v);
        }
        if let Ok(v) = std::env::var("EMAIL_API_KEY") {
            self.email.api_key = Some(v);
        }
        if let Ok(v) = std::env::var("CMS_TOKEN") {
            self.cms.token = Some(v);
        }
        if let Ok(v) = std::env::var("CMS_PROJECT_ID") {
            self.cms.project_id = v;
        }
        if let Ok(v) = std::env::var("DATABASE_URL") {
            self.database_url = v;
        }
    }

    /// Presence of a CMS project id selects the CMS-primary content source
    pub fn cms_enabled(&self) -> bool {
        !self.cms.project_id.trim().is_empty()
    }

    /// Build an absolute URL from a site-relative path
    pub fn absolute_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Remote content store (headless CMS) settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CmsConfig {
    /// Project identifier; empty means local-only mode
    pub project_id: String,
    pub dataset: String,
    pub api_version: String,

    /// Write token, environment-only
    #[serde(skip)]
    pub token: Option<String>,
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            dataset: "production".to_string(),
            api_version: "2024-01-01".to_string(),
            token: None,
        }
    }
}

/// Transactional email service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    /// Sender address shown on newsletter emails
    pub from: String,

    /// API key, environment-only
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            from: "Paperboy <onboarding@resend.dev>".to_string(),
            api_key: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SiteConfig::default();
        assert_eq!(config.content_dir, "content");
        assert!(!config.cms_enabled());
        assert_eq!(config.cms.dataset, "production");
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = r#"
title: My Blog
url: https://example.com/
cms:
  project_id: abc123
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Blog");
        assert!(config.cms_enabled());
        // Unspecified fields keep their defaults
        assert_eq!(config.cms.dataset, "production");
        assert_eq!(config.content_dir, "content");
    }

    #[test]
    fn test_absolute_url() {
        let config = SiteConfig {
            url: "https://example.com/".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.absolute_url("/rss.xml"),
            "https://example.com/rss.xml"
        );
        assert_eq!(
            config.absolute_url("my-post"),
            "https://example.com/my-post"
        );
    }
}
