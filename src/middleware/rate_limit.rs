//! Per-IP rate limiting with `governor`.

use std::net::{IpAddr, SocketAddr};
use std::sync::{Arc, Weak};
use std::time::Duration;

use anyhow::anyhow;
use axum::{
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use quizhub_core::AppError;

use crate::middleware::error::client_ip;

pub const TOO_MANY_REQUESTS: &str = "Too many requests, please try again later";

pub type IpRateLimiter = Arc<DefaultKeyedRateLimiter<IpAddr>>;

const PRUNE_INTERVAL: Duration = Duration::from_secs(60);

/// Builds a keyed limiter and, inside a runtime, a task that prunes idle
/// addresses until the limiter is dropped.
pub fn ip_rate_limiter(quota: Quota) -> IpRateLimiter {
    let limiter = Arc::new(RateLimiter::keyed(quota));

    if let Ok(handle) = tokio::runtime::Handle::try_current() {
        handle.spawn(prune_periodically(Arc::downgrade(&limiter)));
    }

    limiter
}

async fn prune_periodically(limiter: Weak<DefaultKeyedRateLimiter<IpAddr>>) {
    let mut ticker = tokio::time::interval(PRUNE_INTERVAL);
    ticker.tick().await;
    loop {
        ticker.tick().await;
        let Some(limiter) = limiter.upgrade() else {
            break;
        };
        prune(&limiter);
    }
}

/// Drops addresses whose bucket has fully refilled.
fn prune(limiter: &DefaultKeyedRateLimiter<IpAddr>) {
    let before = limiter.len();
    limiter.retain_recent();
    limiter.shrink_to_fit();
    tracing::debug!(before, after = limiter.len(), "Pruned rate limiter state");
}

/// Requests whose address cannot be determined share one bucket.
pub async fn rate_limit(
    State(limiter): State<IpRateLimiter>,
    req: Request,
    next: Next,
) -> Response {
    let ip = client_ip(
        req.extensions().get::<ConnectInfo<SocketAddr>>(),
        req.headers(),
    )
    .parse::<IpAddr>()
    .unwrap_or(IpAddr::from([0, 0, 0, 0]));

    if limiter.check_key(&ip).is_err() {
        tracing::warn!(ip = %ip, "Rate limit exceeded");
        return AppError::new(StatusCode::TOO_MANY_REQUESTS, anyhow!(TOO_MANY_REQUESTS))
            .into_response();
    }

    next.run(req).await
}
