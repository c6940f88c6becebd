//! Remote CMS content backend.
//!
//! Talks to a Sanity-style HTTP API: GROQ queries against the query
//! endpoint, document creation through the mutation endpoint.

use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use crate::config::CmsConfig;
use crate::content::publish::{NewPost, PublishError};
use crate::content::{Post, PostSummary};

/// Projection for list queries. The reading time is computed server-side
/// from average character length at the same 200-words-per-minute constant
/// the local backend uses, but comes back as a `"N min read"` label.
const SUMMARY_PROJECTION: &str = concat!(
    "{\"slug\": slug.current, title, abstract, ",
    "\"publishedOn\": publishedAt, category, \"tags\": coalesce(tags, []), ",
    "\"readingTime\": string(round(length(coalesce(mdxContent, \"\")) / 5 / 200)) + \" min read\"}"
);

/// Same projection plus the raw body, for detail loads
const POST_PROJECTION: &str = concat!(
    "{\"slug\": slug.current, title, abstract, ",
    "\"publishedOn\": publishedAt, category, \"tags\": coalesce(tags, []), ",
    "\"body\": coalesce(mdxContent, \"\"), ",
    "\"readingTime\": string(round(length(coalesce(mdxContent, \"\")) / 5 / 200)) + \" min read\"}"
);

/// HTTP client for the remote content store
#[derive(Debug, Clone)]
pub struct CmsStore {
    http: reqwest::Client,
    project_id: String,
    dataset: String,
    api_version: String,
    token: Option<String>,
}

#[derive(Deserialize)]
struct QueryResponse<T> {
    result: T,
}

impl CmsStore {
    pub fn new(config: &CmsConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            project_id: config.project_id.clone(),
            dataset: config.dataset.clone(),
            api_version: config.api_version.clone(),
            token: config.token.clone(),
        }
    }

    /// List all posts, newest first
    pub async fn list_posts(&self) -> Result<Vec<PostSummary>> {
        let query = format!(
            "*[_type == \"post\"] | order(publishedAt desc) {}",
            SUMMARY_PROJECTION
        );
        self.query(&query, &[]).await
    }

    /// Load one post by slug
    pub async fn load_post(&self, slug: &str) -> Result<Option<Post>> {
        let query = format!(
            "*[_type == \"post\" && slug.current == $slug][0] {}",
            POST_PROJECTION
        );
        self.query(&query, &[("slug", slug)]).await
    }

    /// List all slugs
    pub async fn list_slugs(&self) -> Result<Vec<String>> {
        self.query("*[_type == \"post\"].slug.current", &[]).await
    }

    pub async fn slug_exists(&self, slug: &str) -> Result<bool> {
        let count: i64 = self
            .query(
                "count(*[_type == \"post\" && slug.current == $slug])",
                &[("slug", slug)],
            )
            .await?;
        Ok(count > 0)
    }

    /// Create a new post document; refuses an already-taken slug
    pub async fn create_post(&self, draft: &NewPost) -> Result<(), PublishError> {
        if self.slug_exists(&draft.slug).await? {
            return Err(PublishError::SlugExists(draft.slug.clone()));
        }

        let token = self
            .token
            .as_deref()
            .ok_or_else(|| anyhow!("CMS write token not configured"))?;

        let mut doc = json!({
            "_type": "post",
            "title": draft.title,
            "slug": { "_type": "slug", "current": draft.slug },
            "abstract": draft.abstract_,
            "publishedAt": draft.published_on.to_rfc3339(),
            "tags": draft.tags,
            "mdxContent": draft.body,
        });
        if let Some(category) = &draft.category {
            doc["category"] = json!(category);
        }

        let response = self
            .http
            .post(self.mutate_url())
            .bearer_auth(token)
            .json(&json!({ "mutations": [{ "create": doc }] }))
            .send()
            .await
            .context("CMS mutation request failed")?;

        response
            .error_for_status()
            .context("CMS rejected the mutation")?;

        tracing::info!("Created CMS post \"{}\"", draft.slug);
        Ok(())
    }

    /// Run a GROQ query with string parameters
    async fn query<T: DeserializeOwned>(&self, query: &str, params: &[(&str, &str)]) -> Result<T> {
        let mut request = self.http.get(self.query_url()).query(&[("query", query)]);

        for (name, value) in params {
            request = request.query(&[(format!("${}", name), encode_param(value)?)]);
        }
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .context("CMS query request failed")?
            .error_for_status()
            .context("CMS query returned an error status")?;

        let body: QueryResponse<T> = response
            .json()
            .await
            .context("failed to decode CMS query response")?;
        Ok(body.result)
    }

    fn query_url(&self) -> String {
        format!(
            "https://{}.api.sanity.io/v{}/data/query/{}",
            self.project_id, self.api_version, self.dataset
        )
    }

    fn mutate_url(&self) -> String {
        format!(
            "https://{}.api.sanity.io/v{}/data/mutate/{}",
            self.project_id, self.api_version, self.dataset
        )
    }
}

/// GROQ parameters travel JSON-encoded, so quotes and backslashes in a
/// value must be escaped rather than pasted into the query string
fn encode_param(value: &str) -> Result<String> {
    serde_json::to_string(value).context("failed to encode CMS parameter")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CmsConfig;

    fn store() -> CmsStore {
        CmsStore::new(&CmsConfig {
            project_id: "abc123".to_string(),
            dataset: "production".to_string(),
            api_version: "2024-01-01".to_string(),
            token: None,
        })
    }

    #[test]
    fn test_endpoint_urls() {
        let store = store();
        assert_eq!(
            store.query_url(),
            "https://abc123.api.sanity.io/v2024-01-01/data/query/production"
        );
        assert_eq!(
            store.mutate_url(),
            "https://abc123.api.sanity.io/v2024-01-01/data/mutate/production"
        );
    }

    #[test]
    fn test_param_encoding_escapes_specials() {
        assert_eq!(encode_param("plain-slug").unwrap(), "\"plain-slug\"");
        // Quotes and backslashes must not break out of the JSON string
        assert_eq!(
            encode_param("has\"quote").unwrap(),
            "\"has\\\"quote\""
        );
        assert_eq!(
            encode_param("back\\slash").unwrap(),
            "\"back\\\\slash\""
        );
    }

    #[test]
    fn test_summary_decodes_cms_result() {
        // Shape returned by the list projection
        let json = r#"[{
            "slug": "from-the-cms",
            "title": "From the CMS",
            "abstract": "Remote post",
            "publishedOn": "2024-05-01T12:00:00Z",
            "category": null,
            "tags": ["remote"],
            "readingTime": "4 min read"
        }]"#;

        let posts: Vec<PostSummary> = serde_json::from_str(json).unwrap();
        assert_eq!(posts[0].slug, "from-the-cms");
        assert_eq!(posts[0].reading_time.minutes(), 4);
    }
}
