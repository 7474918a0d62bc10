/*
 * SPDX-FileCopyrightText: 2026 Ripple Project
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Counters for the three sync paths. Cheap to update from any worker.
#[derive(Default)]
pub struct SyncMetrics {
    pub push_connected: AtomicBool,
    pub push_last_change_ms: AtomicU64,
    pub push_frames_rx: AtomicU64,
    pub push_rx_bytes: AtomicU64,
    pub frames_discarded: AtomicU64,

    pub posts_delivered: AtomicU64,
    pub duplicates_dropped: AtomicU64,
    pub posts_staged: AtomicU64,
    pub backfill_pages: AtomicU64,
    pub poll_fetches: AtomicU64,

    pub http_errors: AtomicU64,
    pub auth_failures: AtomicU64,

    push_last_error: Mutex<Option<String>>,
}

impl SyncMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_push_connected(&self, v: bool) {
        self.push_connected.store(v, Ordering::Relaxed);
        self.push_last_change_ms.store(now_ms(), Ordering::Relaxed);
        if v {
            let mut g = self.push_last_error.lock().unwrap();
            *g = None;
        }
    }

    pub fn set_push_error(&self, err: String) {
        self.set_push_connected(false);
        let mut g = self.push_last_error.lock().unwrap();
        *g = Some(err);
    }

    pub fn push_frame_rx(&self, bytes: u64) {
        self.push_frames_rx.fetch_add(1, Ordering::Relaxed);
        self.push_rx_bytes.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn frame_discarded(&self) {
        self.frames_discarded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn post_delivered(&self) {
        self.posts_delivered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn duplicate_dropped(&self) {
        self.duplicates_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn duplicates_add(&self, n: u64) {
        self.duplicates_dropped.fetch_add(n, Ordering::Relaxed);
    }

    pub fn staged_add(&self, n: u64) {
        self.posts_staged.fetch_add(n, Ordering::Relaxed);
    }

    pub fn backfill_page(&self) {
        self.backfill_pages.fetch_add(1, Ordering::Relaxed);
    }

    pub fn poll_fetch(&self) {
        self.poll_fetches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn http_error(&self) {
        self.http_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn auth_failure(&self) {
        self.auth_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot_json(&self) -> serde_json::Value {
        let last_error = self.push_last_error.lock().unwrap().clone();
        serde_json::json!({
            "ts_ms": now_ms(),
            "push": {
                "connected": self.push_connected.load(Ordering::Relaxed),
                "frames_rx": self.push_frames_rx.load(Ordering::Relaxed),
                "rx_bytes": self.push_rx_bytes.load(Ordering::Relaxed),
                "discarded": self.frames_discarded.load(Ordering::Relaxed),
                "last_change_ms": self.push_last_change_ms.load(Ordering::Relaxed),
                "last_error": last_error,
            },
            "feed": {
                "delivered": self.posts_delivered.load(Ordering::Relaxed),
                "duplicates_dropped": self.duplicates_dropped.load(Ordering::Relaxed),
                "staged": self.posts_staged.load(Ordering::Relaxed),
                "backfill_pages": self.backfill_pages.load(Ordering::Relaxed),
                "poll_fetches": self.poll_fetches.load(Ordering::Relaxed),
            },
            "errors": {
                "http_errors": self.http_errors.load(Ordering::Relaxed),
                "auth_failures": self.auth_failures.load(Ordering::Relaxed),
            },
        })
    }
}
