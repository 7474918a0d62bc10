/*
 * SPDX-FileCopyrightText: 2026 Ripple Project
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use std::sync::Arc;

use async_trait::async_trait;
use ripple_core::backend::HttpFeedBackend;
use ripple_core::config::FeedConfig;
use ripple_core::engine::FeedEngine;
use ripple_core::events::EngineEventKind;
use ripple_core::renderer::{FeedRenderer, Position};
use ripple_protocol::Post;
use tracing::{info, warn};

struct TerminalRenderer;

#[async_trait]
impl FeedRenderer for TerminalRenderer {
    async fn deliver(&self, post: Post, position: Position) {
        let marker = match position {
            Position::Prepend => "^",
            Position::Append => "v",
        };
        println!(
            "{marker} [{}] {}: {} (likes {} / comments {})",
            post.created_at, post.author, post.content, post.like_count, post.comment_count
        );
    }

    async fn set_new_content_signal(&self, visible: bool) {
        if visible {
            println!("-- new posts available (auto-releasing) --");
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("info".parse().unwrap()),
        )
        .init();

    let base_url =
        std::env::var("RIPPLE_BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:8000".to_string());
    let mut cfg = FeedConfig::new(base_url);
    cfg.bearer_token = std::env::var("RIPPLE_TOKEN").ok();
    cfg.push_url = std::env::var("RIPPLE_WS_URL").ok();

    let backend = Arc::new(HttpFeedBackend::from_config(&cfg)?);
    let engine = Arc::new(FeedEngine::new(cfg, backend, Arc::new(TerminalRenderer)));

    let mut events = engine.events();
    engine.start().await?;
    info!("feed engine running; ctrl-c to stop");

    let engine_for_events = engine.clone();
    tokio::spawn(async move {
        while let Ok(ev) = events.recv().await {
            match ev.kind {
                EngineEventKind::NewContentAvailable => {
                    let n = engine_for_events.release_pending().await;
                    info!("released {n} pending posts");
                }
                EngineEventKind::AuthRequired => {
                    warn!("session unauthenticated; log in again");
                    break;
                }
                EngineEventKind::PushConnected => info!("push channel up"),
                EngineEventKind::PushDisconnected => info!("push channel down, polling"),
            }
        }
    });

    tokio::signal::ctrl_c().await?;
    engine.stop();
    println!("{}", engine.metrics().snapshot_json());
    Ok(())
}
