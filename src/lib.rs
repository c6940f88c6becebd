//! paperboy: a content-driven blog server with an admin API and
//! newsletter delivery
//!
//! Posts come from either a remote headless CMS or a local directory of
//! markdown files with front-matter header blocks, selected at startup
//! with transparent fallback. The server renders list/detail pages, an
//! RSS feed and a sitemap, and exposes a cookie-gated admin API plus
//! newsletter subscribe/unsubscribe/send endpoints.

pub mod commands;
pub mod config;
pub mod content;
pub mod helpers;
pub mod newsletter;
pub mod server;

use anyhow::Result;
use std::path::Path;

/// The main application: configuration plus resolved directories
#[derive(Clone)]
pub struct Paperboy {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Local content directory
    pub content_dir: std::path::PathBuf,
}

impl Paperboy {
    /// Create an instance from a base directory, reading `paperboy.yml`
    /// when present and applying environment overrides.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("paperboy.yml");

        let mut config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };
        config.apply_env();

        let content_dir = base_dir.join(&config.content_dir);

        Ok(Self {
            config,
            base_dir,
            content_dir,
        })
    }
}
