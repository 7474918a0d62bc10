/*
 * SPDX-FileCopyrightText: 2026 Ripple Project
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ripple_protocol::{LikeStatus, Post};
use tokio::sync::{broadcast, watch};
use tracing::{info, warn};

use crate::backend::FeedBackend;
use crate::backfill::{self, BackfillOutcome};
use crate::config::FeedConfig;
use crate::error::{FeedError, Result};
use crate::events::{EngineEvent, EngineEventKind};
use crate::metrics::SyncMetrics;
use crate::poll::start_poll_worker;
use crate::push::{start_push_worker, PushState};
use crate::renderer::{FeedRenderer, Position};
use crate::state::FeedState;

/// Everything the workers share. Cloning is cheap; all mutable state sits
/// behind `FeedState` or the channels.
#[derive(Clone)]
pub struct EngineCtx {
    pub cfg: FeedConfig,
    pub feed: Arc<FeedState>,
    pub backend: Arc<dyn FeedBackend>,
    pub renderer: Arc<dyn FeedRenderer>,
    pub metrics: Arc<SyncMetrics>,
    pub events: broadcast::Sender<EngineEvent>,
    pub push_state: Arc<watch::Sender<PushState>>,
    pub shutdown: Arc<watch::Sender<bool>>,
}

impl EngineCtx {
    pub fn new(
        cfg: FeedConfig,
        backend: Arc<dyn FeedBackend>,
        renderer: Arc<dyn FeedRenderer>,
    ) -> Self {
        let (events, _) = broadcast::channel(512);
        let (push_state, _) = watch::channel(PushState::Disconnected);
        let (shutdown, _) = watch::channel(false);
        Self {
            cfg,
            feed: Arc::new(FeedState::new()),
            backend,
            renderer,
            metrics: Arc::new(SyncMetrics::new()),
            events,
            push_state: Arc::new(push_state),
            shutdown: Arc::new(shutdown),
        }
    }
}

/// One owned instance of the feed synchronization engine.
///
/// Reconciles backfill, push and poll into a single deduplicated feed:
/// backfill pages append, push posts prepend immediately, poll discoveries
/// wait behind the release gate. `stop()` tears down every worker and
/// cancels any scheduled reconnect.
pub struct FeedEngine {
    ctx: EngineCtx,
    started: AtomicBool,
}

impl FeedEngine {
    pub fn new(
        cfg: FeedConfig,
        backend: Arc<dyn FeedBackend>,
        renderer: Arc<dyn FeedRenderer>,
    ) -> Self {
        Self {
            ctx: EngineCtx::new(cfg, backend, renderer),
            started: AtomicBool::new(false),
        }
    }

    /// Loads the first backfill page, then brings up the push channel and
    /// the poll fallback. An unauthenticated session aborts before any
    /// worker starts; a transport failure on the first page still starts
    /// the workers and surfaces the error (the next scroll retries).
    pub async fn start(&self) -> Result<()> {
        if self.started.swap(true, Ordering::SeqCst) {
            warn!("engine already started");
            return Ok(());
        }
        let first = self.load_more().await;
        if matches!(first, Err(FeedError::Auth)) {
            return Err(FeedError::Auth);
        }
        start_push_worker(self.ctx.clone(), self.ctx.shutdown.subscribe());
        start_poll_worker(self.ctx.clone(), self.ctx.shutdown.subscribe());
        first.map(drop)
    }

    /// Next backfill page, for infinite-scroll continuation. A no-op
    /// (`Ok(None)`) while a page is in flight or after exhaustion.
    pub async fn load_more(&self) -> Result<Option<BackfillOutcome>> {
        match backfill::load_next_page(&self.ctx).await {
            Err(FeedError::Auth) => {
                self.signal_auth_required();
                Err(FeedError::Auth)
            }
            other => other,
        }
    }

    /// Releases the pending queue: staged posts are prepended oldest-first
    /// so the newest ends up on top, the newest released timestamp is
    /// observed, and the signal is lowered. Only ever caller-initiated.
    pub async fn release_pending(&self) -> usize {
        let posts = self.ctx.feed.take_pending();
        let mut released = 0usize;
        let mut max_ts: Option<i64> = None;
        for post in posts {
            max_ts = Some(max_ts.map_or(post.created_at, |m| m.max(post.created_at)));
            self.ctx.renderer.deliver(post, Position::Prepend).await;
            self.ctx.metrics.post_delivered();
            released += 1;
        }
        if let Some(ts) = max_ts {
            self.ctx.feed.observe_timestamp(ts);
        }
        self.ctx.renderer.set_new_content_signal(false).await;
        released
    }

    /// Publishes a post as the current user and delivers it directly,
    /// bypassing push and poll. The seen-set still guards it, so a racing
    /// push broadcast of the same post cannot double-deliver.
    pub async fn create_post(&self, content: &str) -> Result<Post> {
        let post = match self.ctx.backend.create_post(content).await {
            Err(FeedError::Auth) => {
                self.signal_auth_required();
                return Err(FeedError::Auth);
            }
            other => other?,
        };
        if !post.id.is_empty() && self.ctx.feed.record_seen(&post.id) {
            self.ctx.feed.observe_timestamp(post.created_at);
            self.ctx.renderer.deliver(post.clone(), Position::Prepend).await;
            self.ctx.metrics.post_delivered();
        }
        Ok(post)
    }

    /// Server-confirmed like toggle. Counters are never mutated locally.
    pub async fn toggle_like(&self, post_id: &str) -> Result<LikeStatus> {
        match self.ctx.backend.toggle_like(post_id).await {
            Err(FeedError::Auth) => {
                self.signal_auth_required();
                Err(FeedError::Auth)
            }
            other => other,
        }
    }

    /// Full feed reset: seen-set, cursors, pending queue and the signal
    /// all return to their initial state. The consumer is expected to have
    /// cleared its rendering before the next backfill repopulates.
    pub async fn reset(&self) {
        self.ctx.feed.reset();
        self.ctx.renderer.set_new_content_signal(false).await;
        info!("feed state reset");
    }

    /// Stops all workers and cancels any pending reconnect timer.
    pub fn stop(&self) {
        self.ctx.shutdown.send_replace(true);
        info!("engine stopped");
    }

    pub fn events(&self) -> broadcast::Receiver<EngineEvent> {
        self.ctx.events.subscribe()
    }

    pub fn push_state(&self) -> PushState {
        *self.ctx.push_state.borrow()
    }

    pub fn subscribe_push_state(&self) -> watch::Receiver<PushState> {
        self.ctx.push_state.subscribe()
    }

    pub fn metrics(&self) -> Arc<SyncMetrics> {
        self.ctx.metrics.clone()
    }

    pub fn new_content_available(&self) -> bool {
        self.ctx.feed.signal_raised()
    }

    pub fn pending_len(&self) -> usize {
        self.ctx.feed.pending_len()
    }

    fn signal_auth_required(&self) {
        self.ctx.metrics.auth_failure();
        let _ = self
            .ctx
            .events
            .send(EngineEvent::new(EngineEventKind::AuthRequired, None));
        // Fatal to the session: tear the engine down; the caller redirects.
        self.ctx.shutdown.send_replace(true);
    }
}
