//! # Rate Limiting Middleware
//!
//! Fixed-window rate limiting keyed by client IP. Each client gets a
//! counter that resets when its window elapses; requests past the limit
//! are rejected with 429 and a `Retry-After` hint for the window remainder.
//!
//! Two limiter instances run in the gateway: a general one for all API
//! traffic and a stricter one for authentication endpoints.
//!
//! `X-Forwarded-For` is consulted only when configuration marks it trusted
//! (the gateway sits behind an edge proxy that overwrites it); otherwise
//! the peer address keys the window and the header cannot be used to mint
//! fresh identities.

use crate::core::error::GatewayError;
use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header::RETRY_AFTER, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Debug)]
struct Window {
    started_at: Instant,
    count: u32,
}

/// Per-client fixed-window request counter
#[derive(Debug)]
pub struct FixedWindowLimiter {
    limit: u32,
    window: Duration,
    trust_forwarded_for: bool,
    windows: DashMap<String, Window>,
}

impl FixedWindowLimiter {
    pub fn new(limit: u32, window: Duration, trust_forwarded_for: bool) -> Self {
        Self {
            limit,
            window,
            trust_forwarded_for,
            windows: DashMap::new(),
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Count one request for `key`. Returns the time until the window
    /// resets when the request is over the limit.
    pub fn check(&self, key: &str) -> Result<(), Duration> {
        let now = Instant::now();
        let mut window = self.windows.entry(key.to_string()).or_insert_with(|| Window {
            started_at: now,
            count: 0,
        });

        if now.duration_since(window.started_at) >= self.window {
            window.started_at = now;
            window.count = 0;
        }

        if window.count < self.limit {
            window.count += 1;
            Ok(())
        } else {
            Err(self.window - now.duration_since(window.started_at))
        }
    }

    /// Drop windows that have fully elapsed. Cheap enough to call from a
    /// periodic task; correctness never depends on it running.
    pub fn sweep(&self) {
        let now = Instant::now();
        self.windows
            .retain(|_, window| now.duration_since(window.started_at) < self.window);
    }
}

pub async fn enforce_rate_limit(
    State(limiter): State<Arc<FixedWindowLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let key = client_key(&request, limiter.trust_forwarded_for);
    match limiter.check(&key) {
        Ok(()) => next.run(request).await,
        Err(retry_after) => {
            debug!(client = %key, limit = limiter.limit(), "rate limit exceeded");
            let error = GatewayError::RateLimitExceeded {
                limit: limiter.limit(),
                window_secs: limiter.window().as_secs(),
            };
            let mut response = error.into_response();
            let seconds = retry_after.as_secs().max(1);
            response
                .headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from(seconds));
            response
        }
    }
}

/// Identify the client: first `X-Forwarded-For` entry when the header is
/// trusted and present, otherwise the peer address.
fn client_key(request: &Request, trust_forwarded_for: bool) -> String {
    if trust_forwarded_for {
        if let Some(forwarded) = request
            .headers()
            .get("x-forwarded-for")
            .and_then(|value| value.to_str().ok())
        {
            if let Some(first) = forwarded.split(',').next() {
                let first = first.trim();
                if !first.is_empty() {
                    return first.to_string();
                }
            }
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_up_to_limit() {
        let limiter = FixedWindowLimiter::new(3, Duration::from_secs(60), true);
        assert!(limiter.check("10.0.0.1").is_ok());
        assert!(limiter.check("10.0.0.1").is_ok());
        assert!(limiter.check("10.0.0.1").is_ok());
        assert!(limiter.check("10.0.0.1").is_err());
    }

    #[test]
    fn test_clients_are_independent() {
        let limiter = FixedWindowLimiter::new(1, Duration::from_secs(60), true);
        assert!(limiter.check("10.0.0.1").is_ok());
        assert!(limiter.check("10.0.0.2").is_ok());
        assert!(limiter.check("10.0.0.1").is_err());
    }

    #[test]
    fn test_window_resets_after_elapse() {
        let limiter = FixedWindowLimiter::new(1, Duration::from_millis(20), true);
        assert!(limiter.check("10.0.0.1").is_ok());
        assert!(limiter.check("10.0.0.1").is_err());
        std::thread::sleep(Duration::from_millis(40));
        assert!(limiter.check("10.0.0.1").is_ok());
    }

    #[test]
    fn test_rejection_reports_window_remainder() {
        let limiter = FixedWindowLimiter::new(1, Duration::from_secs(60), true);
        limiter.check("10.0.0.1").unwrap();
        let retry_after = limiter.check("10.0.0.1").unwrap_err();
        assert!(retry_after <= Duration::from_secs(60));
        assert!(retry_after > Duration::from_secs(50));
    }

    #[test]
    fn test_forwarded_header_ignored_when_untrusted() {
        let request = Request::builder()
            .header("x-forwarded-for", "203.0.113.9")
            .body(axum::body::Body::empty())
            .unwrap();

        assert_eq!(client_key(&request, true), "203.0.113.9");
        // Untrusted header cannot mint a fresh identity; with no peer
        // address recorded either, the shared fallback key applies.
        assert_eq!(client_key(&request, false), "unknown");
    }

    #[test]
    fn test_sweep_drops_elapsed_windows() {
        let limiter = FixedWindowLimiter::new(5, Duration::from_millis(10), true);
        limiter.check("10.0.0.1").unwrap();
        std::thread::sleep(Duration::from_millis(30));
        limiter.sweep();
        assert!(limiter.windows.is_empty());
    }
}
