/*
 * SPDX-FileCopyrightText: 2026 Ripple Project
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use ripple_protocol::{LikeResponse, LikeStatus, Post, PostCreate};
use serde::de::DeserializeOwned;

use crate::config::FeedConfig;
use crate::error::{FeedError, Result};

/// The backend seam. The engine only ever pulls through these four calls;
/// tests inject an in-memory implementation here.
#[async_trait]
pub trait FeedBackend: Send + Sync {
    /// `GET /posts?skip=&limit=`, most-recent-first page semantics.
    async fn fetch_page(&self, skip: u64, limit: u32) -> Result<Vec<Post>>;
    /// `GET /posts?after=&limit=`, posts strictly newer than `after_ms`.
    async fn fetch_after(&self, after_ms: i64, limit: u32) -> Result<Vec<Post>>;
    /// `POST /posts`, returns the created post.
    async fn create_post(&self, content: &str) -> Result<Post>;
    /// `POST /posts/{id}/like`, returns the server-confirmed status.
    async fn toggle_like(&self, post_id: &str) -> Result<LikeStatus>;
}

pub struct HttpFeedBackend {
    http: reqwest::Client,
    base_url: String,
    bearer_token: Option<String>,
}

impl HttpFeedBackend {
    pub fn new(http: reqwest::Client, base_url: &str, bearer_token: Option<String>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            bearer_token,
        }
    }

    pub fn from_config(cfg: &FeedConfig) -> Result<Self> {
        let timeout_secs = cfg.http_timeout_secs.unwrap_or(30).clamp(5, 120);
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self::new(http, &cfg.base_url, cfg.bearer_token.clone()))
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.bearer_token.as_ref().map(|s| s.trim()).filter(|s| !s.is_empty()) {
            Some(tok) => req.header("Authorization", format!("Bearer {tok}")),
            None => req,
        }
    }

    async fn expect_json<T: DeserializeOwned>(&self, req: reqwest::RequestBuilder) -> Result<T> {
        let resp = self.authorize(req).send().await?;
        if resp.status() == StatusCode::UNAUTHORIZED {
            return Err(FeedError::Auth);
        }
        let resp = resp.error_for_status()?;
        let body = resp
            .json::<T>()
            .await
            .map_err(|e| FeedError::Protocol(e.to_string()))?;
        Ok(body)
    }
}

#[async_trait]
impl FeedBackend for HttpFeedBackend {
    async fn fetch_page(&self, skip: u64, limit: u32) -> Result<Vec<Post>> {
        let req = self
            .http
            .get(format!("{}/posts", self.base_url))
            .query(&[("skip", skip.to_string()), ("limit", limit.to_string())]);
        self.expect_json(req).await
    }

    async fn fetch_after(&self, after_ms: i64, limit: u32) -> Result<Vec<Post>> {
        let req = self
            .http
            .get(format!("{}/posts", self.base_url))
            .query(&[("after", after_ms.to_string()), ("limit", limit.to_string())]);
        self.expect_json(req).await
    }

    async fn create_post(&self, content: &str) -> Result<Post> {
        let req = self
            .http
            .post(format!("{}/posts", self.base_url))
            .json(&PostCreate {
                content: content.to_string(),
            });
        self.expect_json(req).await
    }

    async fn toggle_like(&self, post_id: &str) -> Result<LikeStatus> {
        let req = self
            .http
            .post(format!("{}/posts/{post_id}/like", self.base_url));
        let resp: LikeResponse = self.expect_json(req).await?;
        Ok(resp.status)
    }
}
