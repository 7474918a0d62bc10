/*
 * SPDX-FileCopyrightText: 2026 Ripple Project
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use futures_util::{SinkExt, StreamExt};
use ripple_protocol::PushEvent;
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio_tungstenite::tungstenite;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use crate::engine::EngineCtx;
use crate::events::{EngineEvent, EngineEventKind};
use crate::renderer::Position;

/// Push channel lifecycle. The worker owns at most one live connection and
/// is the only writer of this state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PushState {
    Disconnected,
    Connecting,
    Connected,
}

/// Owns the push connection lifecycle: connect, read frames, fall back to
/// poll on failure, retry after a fixed delay. Stops when the engine's
/// shutdown channel flips, including mid-delay.
pub fn start_push_worker(ctx: EngineCtx, mut shutdown: watch::Receiver<bool>) {
    tokio::spawn(async move {
        let Some(url) = ctx.cfg.push_feed_url() else {
            warn!(
                "push channel disabled: cannot derive ws url from {}",
                ctx.cfg.base_url
            );
            return;
        };
        loop {
            if *shutdown.borrow() {
                break;
            }
            transition(&ctx, PushState::Connecting);
            match tokio_tungstenite::connect_async(&url).await {
                Ok((ws, _)) => {
                    transition(&ctx, PushState::Connected);
                    if let Err(e) = read_frames(&ctx, ws, &mut shutdown).await {
                        ctx.metrics.set_push_error(e.to_string());
                        debug!("push channel closed: {e:#}");
                    }
                }
                Err(e) => {
                    ctx.metrics.set_push_error(e.to_string());
                    warn!("push connect failed: {e}");
                }
            }
            transition(&ctx, PushState::Disconnected);
            if *shutdown.borrow() {
                break;
            }
            // Fixed post-disconnect delay, cancelled by stop().
            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() { break; }
                }
                _ = tokio::time::sleep(ctx.cfg.reconnect_delay()) => {}
            }
        }
    });
}

fn transition(ctx: &EngineCtx, next: PushState) {
    let prev = *ctx.push_state.borrow();
    if prev == next {
        return;
    }
    ctx.push_state.send_replace(next);
    info!("push channel {prev:?} -> {next:?}");
    match next {
        PushState::Connected => {
            ctx.metrics.set_push_connected(true);
            let _ = ctx
                .events
                .send(EngineEvent::new(EngineEventKind::PushConnected, None));
        }
        PushState::Disconnected => {
            ctx.metrics.set_push_connected(false);
            let _ = ctx
                .events
                .send(EngineEvent::new(EngineEventKind::PushDisconnected, None));
        }
        PushState::Connecting => {}
    }
}

async fn read_frames(
    ctx: &EngineCtx,
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
    shutdown: &mut watch::Receiver<bool>,
) -> anyhow::Result<()> {
    let (mut ws_tx, mut ws_rx) = ws.split();
    loop {
        tokio::select! {
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    let _ = ws_tx.send(tungstenite::Message::Close(None)).await;
                    return Ok(());
                }
            }
            msg = ws_rx.next() => {
                let Some(msg) = msg else { return Ok(()); };
                match msg? {
                    tungstenite::Message::Text(text) => {
                        ctx.metrics.push_frame_rx(text.len() as u64);
                        ingest_push_frame(ctx, &text).await;
                    }
                    tungstenite::Message::Ping(p) => {
                        let _ = ws_tx.send(tungstenite::Message::Pong(p)).await;
                    }
                    tungstenite::Message::Close(_) => return Ok(()),
                    _ => {}
                }
            }
        }
    }
}

/// Handles one inbound push frame. Best-effort channel: anything that does
/// not parse as a new-post event with a usable id is dropped without error.
pub(crate) async fn ingest_push_frame(ctx: &EngineCtx, text: &str) {
    let event = match serde_json::from_str::<PushEvent>(text) {
        Ok(v) => v,
        Err(_) => {
            ctx.metrics.frame_discarded();
            return;
        }
    };
    let PushEvent::NewPost { post } = event;
    if post.id.is_empty() {
        ctx.metrics.frame_discarded();
        return;
    }
    if !ctx.feed.record_seen(&post.id) {
        ctx.metrics.duplicate_dropped();
        return;
    }
    let ts = post.created_at;
    ctx.renderer.deliver(post, Position::Prepend).await;
    ctx.feed.observe_timestamp(ts);
    ctx.metrics.post_delivered();
}
