//! Local flat-file content backend.
//!
//! Posts live as `<slug>.mdx` (or `.md`) files in a single content
//! directory, each with a front-matter header block followed by the
//! markdown body.

use anyhow::{anyhow, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::content::publish::{NewPost, PublishError};
use crate::content::{FrontMatter, Post, PostSummary, ReadingTime};

/// File-backed content store
#[derive(Debug, Clone)]
pub struct LocalStore {
    content_dir: PathBuf,
}

impl LocalStore {
    pub fn new<P: Into<PathBuf>>(content_dir: P) -> Self {
        Self {
            content_dir: content_dir.into(),
        }
    }

    /// List all posts, newest first
    pub fn list_posts(&self) -> Result<Vec<PostSummary>> {
        let mut posts = Vec::new();

        for (path, slug) in self.post_files() {
            match self.read_post(&path, slug) {
                Ok(post) => posts.push(post.summary()),
                Err(e) => {
                    tracing::warn!("Failed to load post {:?}: {}", path, e);
                }
            }
        }

        posts.sort_by(|a, b| b.published_on.cmp(&a.published_on));
        Ok(posts)
    }

    /// Load one post by slug; `None` when no matching file exists
    pub fn load_post(&self, slug: &str) -> Result<Option<Post>> {
        let Some(path) = self.post_path(slug) else {
            return Ok(None);
        };
        self.read_post(&path, slug.to_string()).map(Some)
    }

    /// List all slugs (file stems)
    pub fn list_slugs(&self) -> Result<Vec<String>> {
        Ok(self.post_files().map(|(_, slug)| slug).collect())
    }

    pub fn slug_exists(&self, slug: &str) -> bool {
        self.post_path(slug).is_some()
    }

    /// Write a new post file; refuses to overwrite an existing slug
    pub fn create_post(&self, draft: &NewPost) -> Result<(), PublishError> {
        if self.slug_exists(&draft.slug) {
            return Err(PublishError::SlugExists(draft.slug.clone()));
        }

        let document = draft.to_document()?;
        fs::create_dir_all(&self.content_dir).map_err(anyhow::Error::from)?;
        let path = self.content_dir.join(format!("{}.mdx", draft.slug));
        fs::write(&path, document).map_err(anyhow::Error::from)?;

        tracing::info!("Created local post {:?}", path);
        Ok(())
    }

    fn post_files(&self) -> impl Iterator<Item = (PathBuf, String)> + '_ {
        WalkDir::new(&self.content_dir)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file() && is_post_file(e.path()))
            .filter_map(|e| {
                let slug = e.path().file_stem()?.to_string_lossy().to_string();
                Some((e.path().to_path_buf(), slug))
            })
    }

    /// Resolve a slug to an existing file, trying both extensions.
    /// Slugs with path separators never resolve.
    fn post_path(&self, slug: &str) -> Option<PathBuf> {
        if slug.contains('/') || slug.contains('\\') || slug.contains("..") {
            return None;
        }
        for ext in ["mdx", "md"] {
            let path = self.content_dir.join(format!("{}.{}", slug, ext));
            if path.is_file() {
                return Some(path);
            }
        }
        None
    }

    fn read_post(&self, path: &Path, slug: String) -> Result<Post> {
        let raw = fs::read_to_string(path)?;
        let (fm, body) = FrontMatter::parse(&raw);

        let title = fm
            .title
            .clone()
            .ok_or_else(|| anyhow!("missing title in front matter"))?;
        let abstract_ = fm
            .abstract_
            .clone()
            .ok_or_else(|| anyhow!("missing abstract in front matter"))?;
        let published_on = fm
            .parse_published()
            .ok_or_else(|| anyhow!("missing or invalid publishedOn in front matter"))?;

        Ok(Post {
            slug,
            title,
            abstract_,
            published_on,
            category: fm.category.clone(),
            tags: fm.tags.clone(),
            reading_time: ReadingTime::estimate(body),
            body: body.to_string(),
        })
    }
}

fn is_post_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("md") | Some("mdx")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_with_posts(posts: &[(&str, &str, &str)]) -> (tempfile::TempDir, LocalStore) {
        let dir = tempdir().unwrap();
        for (slug, date, title) in posts {
            let content = format!(
                "---\ntitle: {}\nabstract: About {}\npublishedOn: \"{}\"\n---\n\nBody of {}.\n",
                title, slug, date, slug
            );
            fs::write(dir.path().join(format!("{}.mdx", slug)), content).unwrap();
        }
        let store = LocalStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn test_list_sorted_descending() {
        let (_dir, store) = store_with_posts(&[
            ("older", "2023-01-01", "Older"),
            ("newest", "2024-06-01", "Newest"),
            ("middle", "2024-01-01", "Middle"),
        ]);

        let posts = store.list_posts().unwrap();
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["newest", "middle", "older"]);
    }

    #[test]
    fn test_load_slug_inverse() {
        let (_dir, store) = store_with_posts(&[("my-first-post", "2024-01-01", "First")]);

        for slug in store.list_slugs().unwrap() {
            let post = store.load_post(&slug).unwrap().unwrap();
            assert_eq!(post.slug, slug);
        }
    }

    #[test]
    fn test_load_missing_is_none() {
        let (_dir, store) = store_with_posts(&[("exists", "2024-01-01", "Exists")]);
        assert!(store.load_post("does-not-exist").unwrap().is_none());
    }

    #[test]
    fn test_traversal_slug_is_none() {
        let (_dir, store) = store_with_posts(&[("exists", "2024-01-01", "Exists")]);
        assert!(store.load_post("../exists").unwrap().is_none());
        assert!(!store.slug_exists("../../etc/passwd"));
    }

    #[test]
    fn test_malformed_post_skipped_in_list() {
        let (dir, store) = store_with_posts(&[("good", "2024-01-01", "Good")]);
        fs::write(dir.path().join("bad.mdx"), "no header at all").unwrap();

        let posts = store.list_posts().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, "good");
    }

    #[test]
    fn test_create_post_and_conflict() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(dir.path());

        let draft = NewPost::from_fields(
            "A New Post",
            "a-new-post",
            "Fresh off the press",
            "Hello.\n",
            None,
            vec!["rust".to_string()],
        )
        .unwrap();

        store.create_post(&draft).unwrap();
        let loaded = store.load_post("a-new-post").unwrap().unwrap();
        assert_eq!(loaded.title, "A New Post");
        assert_eq!(loaded.tags, vec!["rust"]);

        let err = store.create_post(&draft).unwrap_err();
        assert!(matches!(err, PublishError::SlugExists(s) if s == "a-new-post"));
    }

    #[test]
    fn test_reading_time_from_body() {
        let dir = tempdir().unwrap();
        let body = vec!["word"; 450].join(" ");
        fs::write(
            dir.path().join("long.mdx"),
            format!("---\ntitle: Long\nabstract: Long one\npublishedOn: \"2024-01-01\"\n---\n\n{}", body),
        )
        .unwrap();

        let store = LocalStore::new(dir.path());
        let post = store.load_post("long").unwrap().unwrap();
        assert_eq!(post.reading_time.minutes(), 3);
    }
}
