// ABOUTME: Serde data models for the posts API and local documents
// ABOUTME: Tolerant parsing with null-as-empty strings and ok/error envelopes

use serde::{Deserialize, Deserializer, Serialize};

/// A blog post, either decoded from a local document or returned by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub slug: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub body: String,
    /// `YYYY-MM-DD`, empty for drafts.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub published_at: String,
    /// Only ever filled in by the server.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub url: String,
}

impl Post {
    pub fn is_draft(&self) -> bool {
        self.published_at.is_empty()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatePostRequest<'a> {
    pub title: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub body: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub published_at: &'a str,
}

impl<'a> From<&'a Post> for CreatePostRequest<'a> {
    fn from(post: &'a Post) -> Self {
        CreatePostRequest {
            title: &post.title,
            body: &post.body,
            published_at: &post.published_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdatePostRequest<'a> {
    #[serde(skip_serializing_if = "str::is_empty")]
    pub title: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub slug: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub body: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub published_at: &'a str,
}

impl<'a> From<&'a Post> for UpdatePostRequest<'a> {
    fn from(post: &'a Post) -> Self {
        UpdatePostRequest {
            title: &post.title,
            slug: &post.slug,
            body: &post.body,
            published_at: &post.published_at,
        }
    }
}

/// Slug and public URL returned by create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostReceipt {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub slug: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub url: String,
}

/// Every response carries `ok` and, on failure, an `error` message next to the payload.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(flatten)]
    pub data: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostList {
    #[serde(default)]
    pub post_list: Vec<Post>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Empty {}


#[cfg(test)]
mod request_tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_request_never_sends_slug_or_url() {
        let post = Post {
            title: "Hello".into(),
            slug: "hello".into(),
            body: "Body".into(),
            published_at: "2022-01-02".into(),
            url: "https://example.com".into(),
        };
        let value = serde_json::to_value(CreatePostRequest::from(&post)).unwrap();
        assert_eq!(
            value,
            json!({"title": "Hello", "body": "Body", "published_at": "2022-01-02"})
        );
    }

    #[test]
    fn test_update_request_omits_empty_fields() {
        let post = Post {
            title: "Hello".into(),
            slug: "hello".into(),
            body: "Body".into(),
            ..Default::default()
        };
        let value = serde_json::to_value(UpdatePostRequest::from(&post)).unwrap();
        assert_eq!(
            value,
            json!({"title": "Hello", "slug": "hello", "body": "Body"})
        );
    }
}
