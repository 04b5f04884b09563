// ABOUTME: Blocking HTTP client for the posts REST API
// ABOUTME: Handles auth headers, ok/error envelopes and fail-fast errors

use crate::model::{CreatePostRequest, Empty, Envelope, PostList, UpdatePostRequest};
use crate::{Error, Post, PostReceipt, Result};
use reqwest::blocking::Client;
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_ENDPOINT: &str = "https://mataroa.blog/api";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Remote operations on posts. The reconciler and commands only see this trait.
pub trait PostsApi {
    fn list_posts(&self) -> Result<Vec<Post>>;
    fn get_post(&self, slug: &str) -> Result<Post>;
    fn create_post(&self, post: &Post) -> Result<PostReceipt>;
    fn update_post(&self, slug: &str, post: &Post) -> Result<PostReceipt>;
    fn delete_post(&self, slug: &str) -> Result<()>;
}

fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.len() <= max_chars {
        return s.to_string();
    }

    // Find a valid UTF-8 boundary at or before max_chars
    let mut boundary = max_chars;
    while boundary > 0 && !s.is_char_boundary(boundary) {
        boundary -= 1;
    }

    if boundary == 0 {
        return String::new();
    }

    format!("{}...", &s[..boundary])
}

pub struct ApiClient {
    client: Client,
    base_url: Url,
    key: String,
}

impl ApiClient {
    pub fn new(endpoint: impl Into<String>, key: impl Into<String>) -> Result<Self> {
        let endpoint = endpoint.into();
        let key = key.into();

        let trimmed = endpoint.trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(Error::Config("please, provide a non-empty endpoint".into()));
        }
        if key.is_empty() {
            return Err(Error::Config("please, provide a non-empty key".into()));
        }

        let base_url = Url::parse(trimmed)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| Error::Config(format!("'{}' is not a valid endpoint URL", endpoint)))?;

        let client = Client::builder().timeout(DEFAULT_TIMEOUT).build()?;

        Ok(ApiClient {
            client,
            base_url,
            key,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    /// `base/seg1/seg2/`, each segment percent-encoded so a slug stays one segment.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments).push("");
        }
        url
    }

    fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        slug: Option<&str>,
        body: Option<&impl Serialize>,
    ) -> Result<T> {
        let url = self.url(segments);
        let endpoint = segments.join("/");
        debug!(%method, %url, "sending request");

        let mut request = self
            .client
            .request(method, url)
            .header("Authorization", format!("Bearer {}", self.key))
            .header("Accept", "application/json")
            .header("User-Agent", concat!("mata/", env!("CARGO_PKG_VERSION")));
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send()?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            if let Some(slug) = slug {
                return Err(Error::NotFound(slug.to_string()));
            }
        }
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            return Err(Error::Api {
                endpoint,
                status: status.as_u16(),
                message: truncate_str(&message, 100),
            });
        }

        let text = response.text()?;
        let envelope: Envelope<T> = serde_json::from_str(&text).map_err(|e| {
            debug!(%endpoint, body = %truncate_str(&text, 500), "unparseable response");
            Error::Parse(e)
        })?;

        if !envelope.ok {
            return Err(Error::Logical(
                envelope
                    .error
                    .unwrap_or_else(|| "request was not successful".into()),
            ));
        }

        Ok(envelope.data)
    }
}

impl PostsApi for ApiClient {
    fn list_posts(&self) -> Result<Vec<Post>> {
        let list: PostList = self.request(Method::GET, &["posts"], None, None::<&()>)?;
        Ok(list.post_list)
    }

    fn get_post(&self, slug: &str) -> Result<Post> {
        self.request(
            Method::GET,
            &["posts", slug],
            Some(slug),
            None::<&()>,
        )
    }

    fn create_post(&self, post: &Post) -> Result<PostReceipt> {
        self.request(
            Method::POST,
            &["posts"],
            None,
            Some(&CreatePostRequest::from(post)),
        )
    }

    fn update_post(&self, slug: &str, post: &Post) -> Result<PostReceipt> {
        self.request(
            Method::PATCH,
            &["posts", slug],
            Some(slug),
            Some(&UpdatePostRequest::from(post)),
        )
    }

    fn delete_post(&self, slug: &str) -> Result<()> {
        let _: Empty = self.request(
            Method::DELETE,
            &["posts", slug],
            Some(slug),
            None::<&()>,
        )?;
        Ok(())
    }
}
