//! Post models and reading-time estimation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reading speed used by both backends
pub const WORDS_PER_MINUTE: usize = 200;

/// A reading-time estimate.
///
/// The two content backends historically disagree on the wire format: the
/// local backend produces whole minutes, while the CMS projection computes
/// the estimate server-side and returns a `"N min read"` label. Both shapes
/// are accepted here; callers must normalize through [`ReadingTime::minutes`]
/// (or `Display`) before showing the value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReadingTime {
    Minutes(u32),
    Label(String),
}

impl ReadingTime {
    /// Estimate from a post body: `max(1, ceil(words / 200))`
    pub fn estimate(body: &str) -> Self {
        let words = body.split_whitespace().count();
        ReadingTime::Minutes(words.div_ceil(WORDS_PER_MINUTE).max(1) as u32)
    }

    /// Normalize to whole minutes, always at least 1
    pub fn minutes(&self) -> u32 {
        match self {
            ReadingTime::Minutes(m) => (*m).max(1),
            ReadingTime::Label(label) => label
                .split_whitespace()
                .next()
                .and_then(|n| n.parse::<u32>().ok())
                .unwrap_or(1)
                .max(1),
        }
    }
}

impl fmt::Display for ReadingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} min read", self.minutes())
    }
}

/// Post metadata as shown on list pages and in the admin API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostSummary {
    /// URL-safe unique identifier
    pub slug: String,

    pub title: String,

    #[serde(rename = "abstract")]
    pub abstract_: String,

    #[serde(rename = "publishedOn")]
    pub published_on: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(rename = "readingTime")]
    pub reading_time: ReadingTime,
}

/// A full post, body included
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub slug: String,

    pub title: String,

    #[serde(rename = "abstract")]
    pub abstract_: String,

    #[serde(rename = "publishedOn")]
    pub published_on: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Raw markdown body
    pub body: String,

    #[serde(rename = "readingTime")]
    pub reading_time: ReadingTime,
}

impl Post {
    /// Drop the body, keeping list-page metadata
    pub fn summary(&self) -> PostSummary {
        PostSummary {
            slug: self.slug.clone(),
            title: self.title.clone(),
            abstract_: self.abstract_.clone(),
            published_on: self.published_on,
            category: self.category.clone(),
            tags: self.tags.clone(),
            reading_time: self.reading_time.clone(),
        }
    }
}
