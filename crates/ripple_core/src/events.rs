/*
 * SPDX-FileCopyrightText: 2026 Ripple Project
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use serde::Serialize;

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineEventKind {
    PushConnected,
    PushDisconnected,
    NewContentAvailable,
    AuthRequired,
}

/// Lifecycle notification for an embedding UI. Post delivery itself goes
/// through the renderer; this channel only carries out-of-band signals.
#[derive(Clone, Debug, Serialize)]
pub struct EngineEvent {
    pub kind: EngineEventKind,
    pub ts_ms: u64,
    /// Pending-queue size for `NewContentAvailable`, absent otherwise.
    pub pending: Option<usize>,
}

impl EngineEvent {
    pub fn new(kind: EngineEventKind, pending: Option<usize>) -> Self {
        Self {
            kind,
            ts_ms: now_ms(),
            pending,
        }
    }
}
