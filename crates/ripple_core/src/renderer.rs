/*
 * SPDX-FileCopyrightText: 2026 Ripple Project
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use async_trait::async_trait;
use ripple_protocol::Post;

/// Where a delivered post lands relative to the posts already rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Position {
    Prepend,
    Append,
}

/// The consumer side of the engine. Backfill pages append, push and
/// released posts prepend; the signal tells the consumer that staged posts
/// are waiting behind the release gate.
#[async_trait]
pub trait FeedRenderer: Send + Sync {
    async fn deliver(&self, post: Post, position: Position);
    async fn set_new_content_signal(&self, visible: bool);
}
