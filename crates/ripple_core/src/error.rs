/*
 * SPDX-FileCopyrightText: 2026 Ripple Project
 * SPDX-License-Identifier: AGPL-3.0-only
 */

/// Failure taxonomy for the sync engine.
///
/// Backfill surfaces these to the caller without retrying (the next scroll
/// event retries naturally). Poll ticks swallow transport failures and try
/// again on the next interval. `Auth` is fatal to the session.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// Network-level failure: DNS, connect, reset, timeout, non-2xx status.
    #[error("transport failure: {0}")]
    Transport(String),
    /// The backend answered with a body the engine cannot interpret.
    #[error("protocol failure: {0}")]
    Protocol(String),
    /// The session is no longer authenticated; the caller must redirect to login.
    #[error("session unauthenticated")]
    Auth,
}

impl FeedError {
    pub fn is_auth(&self) -> bool {
        matches!(self, FeedError::Auth)
    }
}

impl From<reqwest::Error> for FeedError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            FeedError::Protocol(e.to_string())
        } else {
            FeedError::Transport(e.to_string())
        }
    }
}

pub type Result<T, E = FeedError> = std::result::Result<T, E>;
