/*
 * SPDX-FileCopyrightText: 2026 Ripple Project
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use tracing::debug;

use crate::engine::EngineCtx;
use crate::error::Result;
use crate::renderer::Position;

/// What a settled backfill page looked like.
#[derive(Debug, Clone, Copy)]
pub struct BackfillOutcome {
    /// Posts actually handed to the renderer (seen ids are skipped).
    pub delivered: usize,
    /// True once the backend signalled the end of history.
    pub exhausted: bool,
}

/// Fetches and delivers the next backfill page in append order.
///
/// Returns `Ok(None)` without touching the network when a page is already
/// in flight or the feed is exhausted, so rapid scroll events collapse into
/// one request. On transport failure the loading flag is cleared and the
/// error is surfaced to the caller; the next scroll event retries.
pub async fn load_next_page(ctx: &EngineCtx) -> Result<Option<BackfillOutcome>> {
    if !ctx.feed.begin_backfill() {
        return Ok(None);
    }
    let skip = ctx.feed.offset();
    let page_size = ctx.cfg.page_size;

    let posts = match ctx.backend.fetch_page(skip, page_size).await {
        Ok(v) => v,
        Err(e) => {
            ctx.feed.abort_backfill();
            if !e.is_auth() {
                ctx.metrics.http_error();
            }
            return Err(e);
        }
    };

    let result_count = posts.len();
    let mut delivered = 0usize;
    for post in posts {
        if post.id.is_empty() || !ctx.feed.record_seen(&post.id) {
            ctx.metrics.duplicate_dropped();
            continue;
        }
        ctx.feed.observe_timestamp(post.created_at);
        ctx.renderer.deliver(post, Position::Append).await;
        ctx.metrics.post_delivered();
        delivered += 1;
    }

    ctx.feed.complete_backfill(page_size as u64, result_count);
    ctx.metrics.backfill_page();
    debug!("backfill page: skip={skip} returned={result_count} delivered={delivered}");

    Ok(Some(BackfillOutcome {
        delivered,
        exhausted: ctx.feed.exhausted(),
    }))
}
