//! Content source selection and fallback.
//!
//! The backend is picked once at startup: a configured CMS project id
//! selects CMS-primary mode, otherwise the local file store runs alone.
//! In CMS-primary mode every read falls back to the local store when the
//! CMS fails; writes go to the active backend only.

mod cms;
mod local;

pub use cms::CmsStore;
pub use local::LocalStore;

use anyhow::Result;
use std::path::Path;

use crate::config::SiteConfig;
use crate::content::publish::{NewPost, PublishError};
use crate::content::{Post, PostSummary};

/// Outcome of a successful post creation
#[derive(Debug, Clone, serde::Serialize)]
pub struct CreatedPost {
    pub title: String,
    pub slug: String,
    /// Which backend took the write: `"cms"` or `"local"`
    pub source: &'static str,
}

/// The active content source
pub enum ContentSource {
    /// CMS primary with transparent local fallback on read failures
    Cms { cms: CmsStore, fallback: LocalStore },
    /// Local files only
    Local(LocalStore),
}

impl ContentSource {
    pub fn from_config(config: &SiteConfig, base_dir: &Path) -> Self {
        let local = LocalStore::new(base_dir.join(&config.content_dir));
        if config.cms_enabled() {
            tracing::info!("Content source: CMS project \"{}\"", config.cms.project_id);
            ContentSource::Cms {
                cms: CmsStore::new(&config.cms),
                fallback: local,
            }
        } else {
            tracing::info!("Content source: local files");
            ContentSource::Local(local)
        }
    }

    /// List all posts, newest first
    pub async fn list_posts(&self) -> Result<Vec<PostSummary>> {
        match self {
            ContentSource::Cms { cms, fallback } => match cms.list_posts().await {
                Ok(posts) => Ok(posts),
                Err(e) => {
                    tracing::warn!("CMS post listing failed, falling back to local: {:#}", e);
                    fallback.list_posts()
                }
            },
            ContentSource::Local(local) => local.list_posts(),
        }
    }

    /// Load one post by slug
    pub async fn load_post(&self, slug: &str) -> Result<Option<Post>> {
        match self {
            ContentSource::Cms { cms, fallback } => match cms.load_post(slug).await {
                Ok(post) => Ok(post),
                Err(e) => {
                    tracing::warn!("CMS load of \"{}\" failed, falling back to local: {:#}", slug, e);
                    fallback.load_post(slug)
                }
            },
            ContentSource::Local(local) => local.load_post(slug),
        }
    }

    /// List all slugs
    pub async fn list_slugs(&self) -> Result<Vec<String>> {
        match self {
            ContentSource::Cms { cms, fallback } => match cms.list_slugs().await {
                Ok(slugs) => Ok(slugs),
                Err(e) => {
                    tracing::warn!("CMS slug listing failed, falling back to local: {:#}", e);
                    fallback.list_slugs()
                }
            },
            ContentSource::Local(local) => local.list_slugs(),
        }
    }

    /// Write a draft to the active backend. Duplicate slugs are rejected;
    /// write failures surface instead of falling back.
    pub async fn create_post(&self, draft: &NewPost) -> Result<CreatedPost, PublishError> {
        let source = match self {
            ContentSource::Cms { cms, .. } => {
                cms.create_post(draft).await?;
                "cms"
            }
            ContentSource::Local(local) => {
                local.create_post(draft)?;
                "local"
            }
        };

        Ok(CreatedPost {
            title: draft.title.clone(),
            slug: draft.slug.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CmsConfig;
    use std::fs;
    use tempfile::tempdir;

    fn unreachable_cms() -> CmsStore {
        // Reserved TLD, so requests fail without touching a real project
        CmsStore::new(&CmsConfig {
            project_id: "no-such-project.invalid".to_string(),
            dataset: "production".to_string(),
            api_version: "2024-01-01".to_string(),
            token: None,
        })
    }

    #[tokio::test]
    async fn test_reads_fall_back_to_local_when_cms_fails() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("local-only.mdx"),
            "---\ntitle: Local Only\nabstract: Still here\npublishedOn: \"2024-03-01\"\n---\n\nServed from disk.\n",
        )
        .unwrap();

        let source = ContentSource::Cms {
            cms: unreachable_cms(),
            fallback: LocalStore::new(dir.path()),
        };

        let posts = source.list_posts().await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, "local-only");

        let post = source.load_post("local-only").await.unwrap().unwrap();
        assert_eq!(post.title, "Local Only");

        assert_eq!(source.list_slugs().await.unwrap(), vec!["local-only"]);
    }
}
