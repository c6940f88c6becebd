//! New-post drafts for the admin content mutator.
//!
//! A draft comes in one of two shapes: structured form fields, or a raw
//! uploaded post file whose header block supplies the same fields.

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::path::Path;
use thiserror::Error;

use super::FrontMatter;

/// Rejected draft input
#[derive(Debug, Error)]
pub enum DraftError {
    #[error("title, slug, abstract, and body are required")]
    MissingFields,
    #[error("filename and content are required")]
    MissingUpload,
    #[error("uploaded file must have \"title\" and \"abstract\" in its front matter")]
    MissingUploadFields,
}

/// Failure while writing a draft to the active backend
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("a post with slug \"{0}\" already exists")]
    SlugExists(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// A validated post draft, ready to write to either backend
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub slug: String,
    pub abstract_: String,
    pub body: String,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub published_on: DateTime<Utc>,
}

impl NewPost {
    /// Build a draft from structured form fields
    pub fn from_fields(
        title: &str,
        slug: &str,
        abstract_: &str,
        body: &str,
        category: Option<String>,
        tags: Vec<String>,
    ) -> Result<Self, DraftError> {
        let title = title.trim();
        let slug = slug.trim();
        let abstract_ = abstract_.trim();

        if title.is_empty() || slug.is_empty() || abstract_.is_empty() || body.trim().is_empty() {
            return Err(DraftError::MissingFields);
        }

        Ok(Self {
            title: title.to_string(),
            slug: slug.to_string(),
            abstract_: abstract_.to_string(),
            body: body.to_string(),
            category: category.filter(|c| !c.trim().is_empty()),
            tags,
            published_on: Utc::now(),
        })
    }

    /// Build a draft from an uploaded post file.
    /// The slug comes from the file name; title and abstract must be
    /// present in the front matter.
    pub fn from_upload(filename: &str, content: &str) -> Result<Self, DraftError> {
        if filename.trim().is_empty() || content.trim().is_empty() {
            return Err(DraftError::MissingUpload);
        }

        let slug = Path::new(filename.trim())
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .filter(|s| !s.is_empty())
            .ok_or(DraftError::MissingUpload)?;

        let (fm, body) = FrontMatter::parse(content);

        let (Some(title), Some(abstract_)) = (fm.title.clone(), fm.abstract_.clone()) else {
            return Err(DraftError::MissingUploadFields);
        };

        Ok(Self {
            title,
            slug,
            abstract_,
            body: body.to_string(),
            category: fm.category.clone().filter(|c| !c.trim().is_empty()),
            tags: fm.tags.clone(),
            published_on: fm.parse_published().unwrap_or_else(Utc::now),
        })
    }

    /// Reconstructed header block for a local file write
    pub fn front_matter(&self) -> FrontMatter {
        FrontMatter {
            title: Some(self.title.clone()),
            abstract_: Some(self.abstract_.clone()),
            published_on: Some(self.published_on.to_rfc3339()),
            category: self.category.clone(),
            tags: self.tags.clone(),
            extra: Default::default(),
        }
    }

    /// Full file content: header block + body
    pub fn to_document(&self) -> Result<String> {
        self.front_matter().to_document(&self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_fields_requires_all() {
        let err = NewPost::from_fields("Title", "slug", "", "body", None, vec![]);
        assert!(matches!(err, Err(DraftError::MissingFields)));

        let err = NewPost::from_fields("Title", "  ", "abstract", "body", None, vec![]);
        assert!(matches!(err, Err(DraftError::MissingFields)));
    }

    #[test]
    fn test_from_fields_drops_empty_category() {
        let post = NewPost::from_fields(
            "Title",
            "my-post",
            "An abstract",
            "Body text",
            Some("".to_string()),
            vec!["rust".to_string()],
        )
        .unwrap();
        assert_eq!(post.category, None);
        assert_eq!(post.tags, vec!["rust"]);
    }

    #[test]
    fn test_from_upload() {
        let content = r#"---
title: Uploaded Post
abstract: From a file
publishedOn: "2024-02-01T00:00:00Z"
tags:
  - upload
---

Uploaded body.
"#;
        let post = NewPost::from_upload("uploaded-post.mdx", content).unwrap();
        assert_eq!(post.slug, "uploaded-post");
        assert_eq!(post.title, "Uploaded Post");
        assert_eq!(post.tags, vec!["upload"]);
        assert!(post.body.starts_with("Uploaded body."));
        assert_eq!(
            post.published_on.format("%Y-%m-%d").to_string(),
            "2024-02-01"
        );
    }

    #[test]
    fn test_from_upload_requires_header_fields() {
        let err = NewPost::from_upload("post.mdx", "---\ntitle: Only Title\n---\n\nBody");
        assert!(matches!(err, Err(DraftError::MissingUploadFields)));
    }

    #[test]
    fn test_upload_document_round_trip() {
        let post = NewPost::from_fields(
            "Round Trip",
            "round-trip",
            "Abstract here",
            "Body here.\n",
            Some("rust".to_string()),
            vec![],
        )
        .unwrap();

        let doc = post.to_document().unwrap();
        let reparsed = NewPost::from_upload("round-trip.mdx", &doc).unwrap();
        assert_eq!(reparsed.title, "Round Trip");
        assert_eq!(reparsed.abstract_, "Abstract here");
        assert_eq!(reparsed.category, Some("rust".to_string()));
    }
}
