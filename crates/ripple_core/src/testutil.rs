/*
 * SPDX-FileCopyrightText: 2026 Ripple Project
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use ripple_protocol::{LikeStatus, Post};

use crate::backend::FeedBackend;
use crate::config::FeedConfig;
use crate::engine::EngineCtx;
use crate::error::Result;
use crate::renderer::{FeedRenderer, Position};

pub(crate) fn post(id: &str, ts: i64) -> Post {
    Post {
        id: id.to_string(),
        author: "alice".to_string(),
        content: format!("post {id}"),
        created_at: ts,
        like_count: 0,
        comment_count: 0,
        share_count: 0,
        liked: false,
    }
}

/// Backend fake fed from scripted response queues. An exhausted queue
/// behaves like an empty backend rather than an error.
#[derive(Default)]
pub(crate) struct ScriptedBackend {
    pages: Mutex<VecDeque<Result<Vec<Post>>>>,
    after: Mutex<VecDeque<Result<Vec<Post>>>>,
    page_delay: Mutex<Duration>,
    after_delay: Mutex<Duration>,
    page_calls: AtomicU64,
    after_calls: AtomicU64,
    create_seq: AtomicU64,
    last_after: Mutex<Option<i64>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_page(&self, resp: Result<Vec<Post>>) {
        self.pages.lock().unwrap().push_back(resp);
    }

    pub fn push_after(&self, resp: Result<Vec<Post>>) {
        self.after.lock().unwrap().push_back(resp);
    }

    /// Makes `fetch_page` yield, so overlapping callers actually overlap.
    pub fn set_page_delay(&self, d: Duration) {
        *self.page_delay.lock().unwrap() = d;
    }

    /// Same for `fetch_after`: holds the response so state can change
    /// while the poll is in flight.
    pub fn set_after_delay(&self, d: Duration) {
        *self.after_delay.lock().unwrap() = d;
    }

    pub fn page_calls(&self) -> u64 {
        self.page_calls.load(Ordering::Relaxed)
    }

    pub fn after_calls(&self) -> u64 {
        self.after_calls.load(Ordering::Relaxed)
    }

    pub fn last_after(&self) -> Option<i64> {
        *self.last_after.lock().unwrap()
    }
}

#[async_trait]
impl FeedBackend for ScriptedBackend {
    async fn fetch_page(&self, _skip: u64, _limit: u32) -> Result<Vec<Post>> {
        self.page_calls.fetch_add(1, Ordering::Relaxed);
        let delay = *self.page_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(Vec::new()))
    }

    async fn fetch_after(&self, after_ms: i64, _limit: u32) -> Result<Vec<Post>> {
        self.after_calls.fetch_add(1, Ordering::Relaxed);
        *self.last_after.lock().unwrap() = Some(after_ms);
        let delay = *self.after_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.after
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(Vec::new()))
    }

    async fn create_post(&self, content: &str) -> Result<Post> {
        let n = self.create_seq.fetch_add(1, Ordering::Relaxed) + 1;
        let mut p = post(&format!("own-{n}"), 1_000 + n as i64);
        p.content = content.to_string();
        Ok(p)
    }

    async fn toggle_like(&self, _post_id: &str) -> Result<LikeStatus> {
        Ok(LikeStatus::Liked)
    }
}

#[derive(Default)]
pub(crate) struct RecordingRenderer {
    delivered: Mutex<Vec<(String, Position)>>,
    signals: Mutex<Vec<bool>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delivered(&self) -> Vec<(String, Position)> {
        self.delivered.lock().unwrap().clone()
    }

    pub fn delivered_ids(&self) -> Vec<String> {
        self.delivered
            .lock()
            .unwrap()
            .iter()
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub fn signals(&self) -> Vec<bool> {
        self.signals.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeedRenderer for RecordingRenderer {
    async fn deliver(&self, post: Post, position: Position) {
        self.delivered.lock().unwrap().push((post.id, position));
    }

    async fn set_new_content_signal(&self, visible: bool) {
        self.signals.lock().unwrap().push(visible);
    }
}

pub(crate) fn test_ctx(
    backend: Arc<ScriptedBackend>,
    renderer: Arc<RecordingRenderer>,
    page_size: u32,
) -> EngineCtx {
    let mut cfg = FeedConfig::new("http://127.0.0.1:9");
    cfg.page_size = page_size;
    EngineCtx::new(cfg, backend, renderer)
}
