//! HTTP client for the `/blogs` collection (json-server conventions).

use std::time::Duration;

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::{Config, ListingConfig};
use crate::post::{NewPost, Post, PostId};

/// Header carrying the size of the (filtered) collection on list responses.
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// Connection refused, timeout, DNS and friends.
    #[error("Error {url} {message}")]
    Transport { url: String, message: String },

    /// Any non-2xx answer.
    #[error("Error {url} {status_text}")]
    Request {
        url: String,
        status: u16,
        status_text: String,
    },

    #[error("Error {url} Not Found")]
    NotFound { url: String },

    #[error("Error {url} unexpected response body: {message}")]
    Decode { url: String, message: String },
}

impl ApiError {
    fn transport(url: &str, err: &reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "request timed out".to_string()
        } else if err.is_connect() {
            "connection failed".to_string()
        } else {
            err.to_string()
        };
        Self::Transport {
            url: url.to_string(),
            message,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request { status, .. } => Some(*status),
            Self::NotFound { .. } => Some(StatusCode::NOT_FOUND.as_u16()),
            _ => None,
        }
    }
}

/// Parameters of a list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// 1-indexed.
    pub page: usize,
    pub page_size: usize,
    pub sort_field: String,
    pub sort_order: String,
    /// Full-text filter, applied server side.
    pub query: Option<String>,
}

impl ListQuery {
    pub fn first_page(listing: &ListingConfig) -> Self {
        Self {
            page: 1,
            page_size: listing.page_size,
            sort_field: listing.sort_field.clone(),
            sort_order: listing.sort_order.clone(),
            query: None,
        }
    }

    pub fn page(mut self, page: usize) -> Self {
        self.page = page.max(1);
        self
    }

    /// Blank or whitespace-only text clears the filter.
    pub fn search(mut self, text: Option<&str>) -> Self {
        self.query = text
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        self
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(5);
        if let Some(q) = &self.query {
            params.push(("q", q.clone()));
        }
        params.push(("_page", self.page.to_string()));
        params.push(("_limit", self.page_size.to_string()));
        params.push(("_sort", self.sort_field.clone()));
        params.push(("_order", self.sort_order.clone()));
        params
    }
}

/// One page of posts plus the size of the whole (filtered) collection.
#[derive(Debug, Clone, PartialEq)]
pub struct PostPage {
    pub posts: Vec<Post>,
    pub total_count: usize,
}

#[derive(Debug, Clone)]
pub struct BlogClient {
    http: reqwest::Client,
    collection_url: String,
}

impl BlogClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let collection_url = config.collection_url();
        let http = reqwest::Client::builder()
            .user_agent(concat!("blogdeck/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.api.timeout_secs.max(1)))
            .build()
            .map_err(|e| ApiError::transport(&collection_url, &e))?;
        Ok(Self {
            http,
            collection_url,
        })
    }

    pub fn collection_url(&self) -> &str {
        &self.collection_url
    }

    fn item_url(&self, id: &PostId) -> String {
        format!("{}/{}", self.collection_url, id)
    }

    pub async fn list(&self, query: &ListQuery) -> Result<PostPage, ApiError> {
        debug!("GET {} {:?}", self.collection_url, query);
        let sent = self
            .http
            .get(&self.collection_url)
            .query(&query.params())
            .send()
            .await;
        let response = check(&self.collection_url, sent).await?;

        let header_total = response
            .headers()
            .get(TOTAL_COUNT_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<usize>().ok());
        let posts: Vec<Post> = decode(response).await?;
        let total_count = header_total
            .unwrap_or_else(|| (query.page.saturating_sub(1)) * query.page_size + posts.len());

        Ok(PostPage { posts, total_count })
    }

    pub async fn get(&self, id: &PostId) -> Result<Post, ApiError> {
        let url = self.item_url(id);
        debug!("GET {}", url);
        let sent = self.http.get(&url).send().await;
        match check(&url, sent).await {
            Ok(response) => decode(response).await,
            Err(ApiError::Request { url, status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Err(ApiError::NotFound { url })
            }
            Err(e) => Err(e),
        }
    }

    pub async fn create(&self, post: &NewPost) -> Result<Post, ApiError> {
        debug!("POST {} title={:?}", self.collection_url, post.title);
        let sent = self.http.post(&self.collection_url).json(post).send().await;
        let response = check(&self.collection_url, sent).await?;
        decode(response).await
    }

    pub async fn update(&self, id: &PostId, post: &NewPost) -> Result<Post, ApiError> {
        let url = self.item_url(id);
        debug!("PUT {} title={:?}", url, post.title);
        let sent = self.http.put(&url).json(post).send().await;
        let response = check(&url, sent).await?;
        decode(response).await
    }

    pub async fn delete(&self, id: &PostId) -> Result<(), ApiError> {
        let url = self.item_url(id);
        debug!("DELETE {}", url);
        let sent = self.http.delete(&url).send().await;
        // Body may be empty or echo the record; either way it's ignored.
        check(&url, sent).await.map(|_| ())
    }
}

async fn check(url: &str, sent: reqwest::Result<Response>) -> Result<Response, ApiError> {
    let response = sent.map_err(|e| ApiError::transport(url, &e))?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    Err(ApiError::Request {
        url: response.url().to_string(),
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or("").to_string(),
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let url = response.url().to_string();
    let bytes = response
        .bytes()
        .await
        .map_err(|e| ApiError::transport(&url, &e))?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode {
        url,
        message: e.to_string(),
    })
}
