/*
 * SPDX-FileCopyrightText: 2026 Ripple Project
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use serde::{Deserialize, Serialize};

/// A feed post as the backend serves it. Posts are immutable once created;
/// only the counters move, and only through explicit follow-up requests.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Post {
    pub id: String,
    pub author: String,
    pub content: String,
    /// Creation time, unix milliseconds.
    pub created_at: i64,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub comment_count: u64,
    #[serde(default)]
    pub share_count: u64,
    /// Viewer-relative; push payloads may omit it.
    #[serde(default)]
    pub liked: bool,
}

/// Tagged event delivered over the push channel. Frames that do not parse
/// as one of these variants are dropped by the receiver.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PushEvent {
    NewPost { post: Post },
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PostCreate {
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LikeStatus {
    Liked,
    Unliked,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LikeResponse {
    pub status: LikeStatus,
}
