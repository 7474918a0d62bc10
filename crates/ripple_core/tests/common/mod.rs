#![allow(dead_code)]
/*
 * SPDX-FileCopyrightText: 2026 Ripple Project
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use ripple_core::renderer::{FeedRenderer, Position};
use ripple_protocol::Post;

pub fn mkpost(id: &str, ts: i64) -> Post {
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

/// Renderer that remembers every delivery and signal change.
#[derive(Default)]
pub struct Recorder {
    delivered: Mutex<Vec<(Post, Position)>>,
    signals: Mutex<Vec<bool>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(String, Position)> {
        self.delivered
            .lock()
            .unwrap()
            .iter()
            .map(|(p, pos)| (p.id.clone(), *pos))
            .collect()
    }

    pub fn ids(&self) -> Vec<String> {
        self.delivered
            .lock()
            .unwrap()
            .iter()
            .map(|(p, _)| p.id.clone())
            .collect()
    }

    pub fn count_id(&self, id: &str) -> usize {
        self.delivered
            .lock()
            .unwrap()
            .iter()
            .filter(|(p, _)| p.id == id)
            .count()
    }

    pub fn signals(&self) -> Vec<bool> {
        self.signals.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeedRenderer for Recorder {
    async fn deliver(&self, post: Post, position: Position) {
        self.delivered.lock().unwrap().push((post, position));
    }

    async fn set_new_content_signal(&self, visible: bool) {
        self.signals.lock().unwrap().push(visible);
    }
}

/// Polls `f` every 10 ms until it holds or the timeout passes.
pub async fn wait_until<F: Fn() -> bool>(timeout: Duration, f: F) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if f() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    f()
}
