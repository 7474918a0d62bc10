/*
 * SPDX-FileCopyrightText: 2026 Ripple Project
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use std::time::Duration;

#[derive(Clone, Debug, serde::Deserialize)]
pub struct FeedConfig {
    /// Backend base url, e.g. `https://feed.example`.
    pub base_url: String,
    /// Push endpoint. When absent it is derived from `base_url`.
    #[serde(default)]
    pub push_url: Option<String>,
    /// Bearer token attached to every HTTP request. The push endpoint is
    /// unauthenticated.
    #[serde(default)]
    pub bearer_token: Option<String>,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_poll_limit")]
    pub poll_limit: u32,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,
    /// HTTP client timeout for outbound requests (seconds).
    #[serde(default)]
    pub http_timeout_secs: Option<u64>,
}

fn default_page_size() -> u32 {
    10
}

fn default_poll_limit() -> u32 {
    5
}

fn default_poll_interval_ms() -> u64 {
    10_000
}

fn default_reconnect_delay_ms() -> u64 {
    3_000
}

impl FeedConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            push_url: None,
            bearer_token: None,
            page_size: default_page_size(),
            poll_limit: default_poll_limit(),
            poll_interval_ms: default_poll_interval_ms(),
            reconnect_delay_ms: default_reconnect_delay_ms(),
            http_timeout_secs: None,
        }
    }

    /// Resolved push endpoint: the configured url, or the http base with
    /// its scheme swapped to the matching websocket scheme.
    pub fn push_feed_url(&self) -> Option<String> {
        if let Some(url) = self.push_url.as_ref().map(|s| s.trim()).filter(|s| !s.is_empty()) {
            return Some(url.to_string());
        }
        infer_ws_from_base(&self.base_url).map(|ws| format!("{ws}/ws/feed"))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }
}

fn infer_ws_from_base(base: &str) -> Option<String> {
    let base = base.trim();
    if base.is_empty() {
        return None;
    }
    if let Some(rest) = base.strip_prefix("https://") {
        return Some(format!("wss://{}", rest.trim_end_matches('/')));
    }
    if let Some(rest) = base.strip_prefix("http://") {
        return Some(format!("ws://{}", rest.trim_end_matches('/')));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_url_is_inferred_from_base() {
        let cfg = FeedConfig::new("https://feed.example/");
        assert_eq!(
            cfg.push_feed_url().as_deref(),
            Some("wss://feed.example/ws/feed")
        );
        let cfg = FeedConfig::new("http://127.0.0.1:8000");
        assert_eq!(
            cfg.push_feed_url().as_deref(),
            Some("ws://127.0.0.1:8000/ws/feed")
        );
    }

    #[test]
    fn explicit_push_url_wins() {
        let mut cfg = FeedConfig::new("https://feed.example");
        cfg.push_url = Some("wss://push.example/ws/feed".to_string());
        assert_eq!(
            cfg.push_feed_url().as_deref(),
            Some("wss://push.example/ws/feed")
        );
    }

    #[test]
    fn unknown_scheme_disables_push() {
        let cfg = FeedConfig::new("ftp://feed.example");
        assert_eq!(cfg.push_feed_url(), None);
    }

    #[test]
    fn deserialize_fills_reference_defaults() {
        let cfg: FeedConfig =
            serde_json::from_str(r#"{"base_url": "https://feed.example"}"#).unwrap();
        assert_eq!(cfg.page_size, 10);
        assert_eq!(cfg.poll_limit, 5);
        assert_eq!(cfg.poll_interval_ms, 10_000);
        assert_eq!(cfg.reconnect_delay_ms, 3_000);
    }
}
