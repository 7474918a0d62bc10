/*
 * SPDX-FileCopyrightText: 2026 Ripple Project
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use std::collections::HashSet;
use std::sync::Mutex;

use ripple_protocol::Post;

/// Result of staging one batch of poll-discovered posts.
#[derive(Debug, Default, Clone, Copy)]
pub struct StageOutcome {
    /// Posts added to the pending queue.
    pub staged: usize,
    /// Candidates dropped because their id was already seen.
    pub duplicates: usize,
    /// True when this batch flipped the "new content available" signal
    /// from lowered to raised. Re-raising an already raised signal is a no-op.
    pub signal_raised: bool,
}

#[derive(Default)]
struct Inner {
    seen: HashSet<String>,
    offset: u64,
    newest_seen_ms: Option<i64>,
    loading: bool,
    exhausted: bool,
    pending: Vec<Post>,
    signal_raised: bool,
}

/// Shared cursor state, seen-set and pending queue.
///
/// Every method is a single lock acquisition, so the check-and-act pairs
/// (`record_seen`, `begin_backfill`, `stage_candidates`) are atomic. The
/// seen-set never shrinks during a session; `reset` is the only way back.
#[derive(Default)]
pub struct FeedState {
    inner: Mutex<Inner>,
}

impl FeedState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The sole dedup primitive: inserts the id and reports whether it was
    /// new. Must be called exactly once per candidate post, before any
    /// delivery decision.
    pub fn record_seen(&self, id: &str) -> bool {
        self.inner.lock().unwrap().seen.insert(id.to_string())
    }

    /// Max-merge into `newest_seen_ms`; monotonically non-decreasing even
    /// when a misbehaving source hands over out-of-order timestamps.
    pub fn observe_timestamp(&self, ts_ms: i64) {
        let mut g = self.inner.lock().unwrap();
        g.newest_seen_ms = Some(g.newest_seen_ms.map_or(ts_ms, |cur| cur.max(ts_ms)));
    }

    pub fn newest_seen_ms(&self) -> Option<i64> {
        self.inner.lock().unwrap().newest_seen_ms
    }

    /// Admission gate for backfill. Returns false (and changes nothing)
    /// while a page is already in flight or the feed is exhausted.
    pub fn begin_backfill(&self) -> bool {
        let mut g = self.inner.lock().unwrap();
        if g.loading || g.exhausted {
            return false;
        }
        g.loading = true;
        true
    }

    /// Settles a backfill page. A short page marks the feed exhausted
    /// (terminal); a full page advances the offset by the requested page
    /// size, not the delivered count.
    pub fn complete_backfill(&self, page_size: u64, result_count: usize) {
        let mut g = self.inner.lock().unwrap();
        g.loading = false;
        if (result_count as u64) < page_size {
            g.exhausted = true;
        } else {
            g.offset += page_size;
        }
    }

    /// Clears `loading` after a failed fetch so the gate never latches shut.
    pub fn abort_backfill(&self) {
        self.inner.lock().unwrap().loading = false;
    }

    pub fn offset(&self) -> u64 {
        self.inner.lock().unwrap().offset
    }

    pub fn loading(&self) -> bool {
        self.inner.lock().unwrap().loading
    }

    pub fn exhausted(&self) -> bool {
        self.inner.lock().unwrap().exhausted
    }

    /// Filters one poll batch and appends the survivors to the pending
    /// queue. A candidate survives when its timestamp is strictly newer
    /// than `after_ms` (the bound the fetch was issued with, not the
    /// current watermark, which may have advanced while the fetch was in
    /// flight) and its id passes the seen-set. Staged posts do not advance
    /// `newest_seen_ms`; that happens at release.
    pub fn stage_candidates(&self, after_ms: i64, posts: Vec<Post>) -> StageOutcome {
        let mut g = self.inner.lock().unwrap();
        let mut out = StageOutcome::default();
        for post in posts {
            if post.id.is_empty() || post.created_at <= after_ms {
                continue;
            }
            if !g.seen.insert(post.id.clone()) {
                out.duplicates += 1;
                continue;
            }
            g.pending.push(post);
            out.staged += 1;
        }
        if out.staged > 0 && !g.signal_raised {
            g.signal_raised = true;
            out.signal_raised = true;
        }
        out
    }

    /// Drains the pending queue in oldest-first timestamp order and lowers
    /// the signal. The queue arrives newest-first from the poll source, so
    /// it is flipped and ordered by creation time before delivery.
    pub fn take_pending(&self) -> Vec<Post> {
        let mut posts = {
            let mut g = self.inner.lock().unwrap();
            g.signal_raised = false;
            std::mem::take(&mut g.pending)
        };
        posts.reverse();
        posts.sort_by_key(|p| p.created_at);
        posts
    }

    pub fn pending_len(&self) -> usize {
        self.inner.lock().unwrap().pending.len()
    }

    pub fn signal_raised(&self) -> bool {
        self.inner.lock().unwrap().signal_raised
    }

    /// Full feed reset: clears the seen-set, both cursors, the pending
    /// queue and all flags. Used when the feed is rebuilt from scratch.
    pub fn reset(&self) {
        let mut g = self.inner.lock().unwrap();
        *g = Inner::default();
    }
}
