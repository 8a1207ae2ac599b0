//! Rolling-window rate limiting keyed by client address.
//!
//! Each client key keeps the instants of its recent requests; a request is
//! admitted while fewer than `max_requests` fall inside the window. Checks
//! run before any storage access.

use std::collections::{HashMap, VecDeque};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use tokio::sync::RwLock;

use crate::state::AppState;

/// Shared rolling-window limiter.
#[derive(Clone)]
pub struct RateLimiter {
    hits: Arc<RwLock<HashMap<String, VecDeque<Instant>>>>,
    max_requests: usize,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window_secs: u64) -> Self {
        Self {
            hits: Arc::new(RwLock::new(HashMap::new())),
            max_requests,
            window: Duration::from_secs(window_secs),
        }
    }

    /// Record a request from `key`; returns `false` if it exceeds the budget.
    ///
    /// Rejected requests are not recorded, so a client that keeps hammering
    /// regains access once its oldest admitted request leaves the window.
    pub async fn check(&self, key: &str) -> bool {
        self.check_at(key, Instant::now()).await
    }

    async fn check_at(&self, key: &str, now: Instant) -> bool {
        let mut hits = self.hits.write().await;
        let entry = hits.entry(key.to_string()).or_default();

        while entry
            .front()
            .is_some_and(|&t| now.duration_since(t) >= self.window)
        {
            entry.pop_front();
        }

        if entry.len() >= self.max_requests {
            return false;
        }
        entry.push_back(now);
        true
    }

    /// Drop keys whose requests have all left the window.
    pub async fn cleanup(&self) {
        let mut hits = self.hits.write().await;
        let now = Instant::now();
        hits.retain(|_, entry| {
            entry
                .back()
                .is_some_and(|&t| now.duration_since(t) < self.window)
        });
    }
}

/// The calling client's address.
///
/// Keyed on the socket peer. The first `X-Forwarded-For` hop is used instead
/// only when `trust_proxy` is set, since any caller can write that header.
/// Falls back to `"unknown"` when neither is available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientKey(pub String);

impl ClientKey {
    pub fn from_parts(parts: &Parts, trust_proxy: bool) -> Self {
        if trust_proxy {
            let forwarded = parts
                .headers
                .get("x-forwarded-for")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(',').next())
                .map(str::trim)
                .filter(|v| !v.is_empty());

            if let Some(ip) = forwarded {
                return ClientKey(ip.to_string());
            }
        }

        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string());

        ClientKey(peer.unwrap_or_else(|| "unknown".to_string()))
    }
}

impl FromRequestParts<AppState> for ClientKey {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(parts, state.config.rate_limit.trust_proxy))
    }
}
