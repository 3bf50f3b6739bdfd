//! Per-client request-rate ceiling.
//!
//! One token bucket per client address. A bucket holds `per_minute` tokens, starts full and
//! refills continuously; a request spends one token or is answered with 429.

use crate::error::AppError;
use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header::RETRY_AFTER, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Buckets are pruned once the map grows past this many clients.
const PRUNE_THRESHOLD: usize = 4096;

#[derive(Clone, Copy, Debug)]
struct Bucket {
    tokens: f64,
    last: Instant,
}

pub struct RateLimiter {
    capacity: f64,
    /// Seconds per token.
    replenish_secs: f64,
    buckets: Mutex<HashMap<String, Bucket>>,
}

impl RateLimiter {
    /// `None` when `per_minute` is zero, meaning no ceiling.
    pub fn per_minute(per_minute: u32) -> Option<Self> {
        if per_minute == 0 {
            return None;
        }
        Some(RateLimiter {
            capacity: f64::from(per_minute),
            replenish_secs: 60.0 / f64::from(per_minute),
            buckets: Mutex::new(HashMap::new()),
        })
    }

    /// Spend one token for `key`. `Err` carries how long until the next token.
    pub fn check(&self, key: &str) -> Result<(), Duration> {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> Result<(), Duration> {
        let mut buckets = self.buckets.lock().unwrap_or_else(|e| e.into_inner());
        if buckets.len() >= PRUNE_THRESHOLD {
            let full_after = Duration::from_secs_f64(self.capacity * self.replenish_secs);
            buckets.retain(|_, b| now.saturating_duration_since(b.last) < full_after);
        }
        let bucket = buckets.entry(key.to_string()).or_insert(Bucket {
            tokens: self.capacity,
            last: now,
        });

        let elapsed = now.saturating_duration_since(bucket.last).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed / self.replenish_secs).min(self.capacity);
        bucket.last = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            Ok(())
        } else {
            let deficit = 1.0 - bucket.tokens;
            Err(Duration::from_secs_f64(deficit * self.replenish_secs))
        }
    }
}

/// Client identity: the peer IP when the server records connection info, else one shared key.
fn client_key(req: &Request) -> String {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Middleware for `axum::middleware::from_fn_with_state`.
pub async fn limit_rate(State(limiter): State<Arc<RateLimiter>>, req: Request, next: Next) -> Response {
    let key = client_key(&req);
    match limiter.check(&key) {
        Ok(()) => next.run(req).await,
        Err(wait) => {
            tracing::warn!(client = %key, "request rate exceeded");
            let retry_after = wait.as_secs().max(1);
            let mut resp = AppError::TooManyRequests(format!("retry in {}s", retry_after)).into_response();
            resp.headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from(retry_after));
            resp
        }
    }
}
