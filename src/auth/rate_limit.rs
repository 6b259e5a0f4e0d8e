//! Sliding-window rate limiting for the auth endpoints, backed by an
//! in-memory DashMap. Suitable for single-instance deployments.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Clone)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window_secs: u64,
}

#[derive(Clone)]
struct WindowEntry {
    request_count: u32,
    window_start: Instant,
}

pub struct RateLimiter {
    entries: Arc<DashMap<String, WindowEntry>>,
    config: RateLimitConfig,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        let entries = Arc::new(DashMap::new());

        // Periodically drop entries whose window has long expired.
        let cleanup_entries = entries.clone();
        let window_secs = config.window_secs;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(window_secs * 2));
            loop {
                interval.tick().await;
                let now = Instant::now();
                let window = Duration::from_secs(window_secs);
                cleanup_entries
                    .retain(|_, entry: &mut WindowEntry| now.duration_since(entry.window_start) < window);
            }
        });

        Self { entries, config }
    }

    /// Returns seconds until retry when the client is over its budget.
    pub fn check(&self, client_id: &str) -> Result<(), u64> {
        let now = Instant::now();
        let window = Duration::from_secs(self.config.window_secs);

        let mut entry = self
            .entries
            .entry(client_id.to_string())
            .or_insert_with(|| WindowEntry {
                request_count: 0,
                window_start: now,
            });

        if now.duration_since(entry.window_start) >= window {
            entry.request_count = 0;
            entry.window_start = now;
        }

        entry.request_count += 1;

        if entry.request_count > self.config.max_requests {
            let elapsed = now.duration_since(entry.window_start).as_secs();
            return Err(self.config.window_secs.saturating_sub(elapsed));
        }

        Ok(())
    }
}

#[derive(Clone)]
pub struct RateLimiterState(pub Arc<RateLimiter>);

impl RateLimiterState {
    pub fn auth(max_per_minute: u32) -> Self {
        Self(Arc::new(RateLimiter::new(RateLimitConfig {
            max_requests: max_per_minute,
            window_secs: 60,
        })))
    }
}

/// Keyed on X-Forwarded-For so the limiter works behind a proxy; falls
/// back to a shared bucket when the header is absent.
pub async fn rate_limit_middleware(
    axum::extract::State(limiter): axum::extract::State<RateLimiterState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let client_id = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.split(',').next())
        .unwrap_or("unknown")
        .trim()
        .to_string();

    match limiter.0.check(&client_id) {
        Ok(()) => Ok(next.run(request).await),
        Err(retry_after_secs) => {
            tracing::warn!(
                "Rate limit exceeded for client {}: retry after {}s",
                client_id,
                retry_after_secs
            );

            let mut response = Response::builder()
                .status(StatusCode::TOO_MANY_REQUESTS)
                .body(Body::from("Too many requests. Please try again later."))
                .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

            if let Ok(value) = retry_after_secs.to_string().parse() {
                response.headers_mut().insert("Retry-After", value);
            }

            Ok(response)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_limit_enforced_within_window() {
        let limiter = RateLimiter::new(RateLimitConfig {
            max_requests: 3,
            window_secs: 60,
        });

        assert!(limiter.check("1.2.3.4").is_ok());
        assert!(limiter.check("1.2.3.4").is_ok());
        assert!(limiter.check("1.2.3.4").is_ok());
        assert!(limiter.check("1.2.3.4").is_err());

        // A different client has its own window
        assert!(limiter.check("5.6.7.8").is_ok());
    }
}
