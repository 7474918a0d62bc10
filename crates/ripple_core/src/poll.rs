/*
 * SPDX-FileCopyrightText: 2026 Ripple Project
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use tokio::sync::watch;
use tracing::debug;

use crate::engine::EngineCtx;
use crate::error::{FeedError, Result};
use crate::events::{EngineEvent, EngineEventKind};
use crate::push::PushState;

/// Periodic fallback pull, active only while the push channel is down.
/// Discovered posts are staged behind the release gate, never injected
/// into the feed directly.
pub fn start_poll_worker(ctx: EngineCtx, mut shutdown: watch::Receiver<bool>) {
    let mut push_state = ctx.push_state.subscribe();
    tokio::spawn(async move {
        let period = ctx.cfg.poll_interval();
        // First tick fires one full period after start.
        let mut tick =
            tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            if *shutdown.borrow() {
                break;
            }
            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() { break; }
                }
                _ = tick.tick() => {}
            }
            if *shutdown.borrow() {
                break;
            }
            // Push supersedes poll while healthy. Checked per tick so a
            // reconnection that just succeeded is never raced.
            if *push_state.borrow() == PushState::Connected {
                continue;
            }
            match poll_once(&ctx).await {
                Ok(staged) => {
                    if staged > 0 {
                        debug!("poll staged {staged} new posts");
                    }
                }
                Err(FeedError::Auth) => {
                    ctx.metrics.auth_failure();
                    let _ = ctx
                        .events
                        .send(EngineEvent::new(EngineEventKind::AuthRequired, None));
                    ctx.shutdown.send_replace(true);
                    break;
                }
                Err(e) => {
                    // Best-effort tick; the next interval tries again.
                    ctx.metrics.http_error();
                    debug!("poll tick failed: {e:#}");
                }
            }
        }
    });
}

/// One fallback pull. Skipped entirely until backfill has observed at
/// least one post, so there is never a poll with an undefined lower bound.
pub(crate) async fn poll_once(ctx: &EngineCtx) -> Result<usize> {
    let Some(after_ms) = ctx.feed.newest_seen_ms() else {
        return Ok(0);
    };
    let posts = ctx.backend.fetch_after(after_ms, ctx.cfg.poll_limit).await?;
    ctx.metrics.poll_fetch();

    // Filter against the bound this fetch was issued with. The watermark
    // may have advanced mid-flight (own post, push reconnect) past posts
    // that are still newer than what this fetch asked for.
    let outcome = ctx.feed.stage_candidates(after_ms, posts);
    if outcome.duplicates > 0 {
        ctx.metrics.duplicates_add(outcome.duplicates as u64);
    }
    if outcome.staged > 0 {
        ctx.metrics.staged_add(outcome.staged as u64);
    }
    if outcome.signal_raised {
        ctx.renderer.set_new_content_signal(true).await;
        let _ = ctx.events.send(EngineEvent::new(
            EngineEventKind::NewContentAvailable,
            Some(ctx.feed.pending_len()),
        ));
    }
    Ok(outcome.staged)
}
