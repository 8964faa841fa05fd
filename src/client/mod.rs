//! Typed HTTP client for the Vintage Reads API.

use anyhow::Context;
use reqwest::{Response, Url};
use serde::{Deserialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::reader::{ProgressReport, ProgressSink};

#[derive(Clone, Debug)]
pub struct VintageClient {
    base_url: String,
    client: reqwest::Client,
}

impl VintageClient {
    /// Create a new client with the given base URL (e.g. "http://localhost:3000").
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().build()?;
        let base_url_str = base_url.into();
        tracing::debug!(base_url = %base_url_str, "creating VintageClient");
        Url::parse(&base_url_str).with_context(|| format!("Invalid base URL: {}", base_url_str))?;
        Ok(VintageClient {
            base_url: base_url_str.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Build a URL from raw path segments, percent-encoding each one.
    fn segments_url(&self, segments: &[&str]) -> anyhow::Result<Url> {
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("base URL cannot carry a path: {}", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn read_json<T: DeserializeOwned>(resp: Response) -> anyhow::Result<T> {
        let status = resp.status();
        let url = resp.url().clone();
        let body = resp.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<MessageResponse>(&body)
                .map(|m| m.message)
                .unwrap_or(body);
            anyhow::bail!("{} returned {}: {}", url, status, message);
        }
        let parsed = serde_json::from_str(&body)
            .with_context(|| format!("Unexpected response body from {}", url))?;
        Ok(parsed)
    }

    /// POST /api/progress
    #[tracing::instrument(
        level = "debug",
        skip(self, report),
        fields(title = %report.title, page = report.current_page)
    )]
    pub async fn post_progress(&self, report: &ProgressReport) -> anyhow::Result<MessageResponse> {
        let url = self.url("/api/progress");
        tracing::debug!(%url, "POST progress");
        let resp = self.client.post(&url).json(report).send().await?;
        Self::read_json(resp).await
    }

    /// GET /api/wishlist/:email
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn get_wishlist(&self, email: &str) -> anyhow::Result<Vec<LibraryEntryResponse>> {
        let url = self.segments_url(&["api", "wishlist", email])?;
        tracing::debug!(%url, "GET wishlist");
        let resp = self.client.get(url).send().await?;
        Self::read_json(resp).await
    }

    /// GET /api/library/:email
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn get_library(&self, email: &str) -> anyhow::Result<Vec<LibraryEntryResponse>> {
        let url = self.segments_url(&["api", "library", email])?;
        tracing::debug!(%url, "GET library");
        let resp = self.client.get(url).send().await?;
        Self::read_json(resp).await
    }

    /// GET /api/books
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn list_books(&self, author: Option<&str>) -> anyhow::Result<Vec<BookResponse>> {
        let url = self.url("/api/books");
        tracing::debug!(%url, author = author.unwrap_or(""), "GET books");
        let mut req = self.client.get(&url);
        if let Some(author) = author {
            req = req.query(&[("author", author)]);
        }
        let resp = req.send().await?;
        Self::read_json(resp).await
    }

    /// Download a book's plain-text content. Relative paths resolve against the base URL.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn fetch_text(&self, content_url: &str) -> anyhow::Result<String> {
        let url = if content_url.starts_with("http://") || content_url.starts_with("https://") {
            content_url.to_string()
        } else {
            self.url(content_url)
        };
        let resp = self.client.get(&url).send().await?;
        let status = resp.error_for_status()?;
        Ok(status.text().await?)
    }
}

#[async_trait::async_trait]
impl ProgressSink for VintageClient {
    async fn report(&self, report: &ProgressReport) -> anyhow::Result<()> {
        self.post_progress(report).await?;
        Ok(())
    }
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LibraryEntryResponse {
    pub title: String,
    #[serde(default)]
    pub image: Option<String>,
    pub current_page: u32,
    pub percentage_read: u8,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookResponse {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub content_url: Option<String>,
}
