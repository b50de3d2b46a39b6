//! Per-client request throttling

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header::RETRY_AFTER, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{clock::Clock, DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::time::Duration;
use tokio::{task::JoinHandle, time::MissedTickBehavior};

use crate::config::RateLimitConfig;
use crate::error::Error;

use super::state::AppState;

/// Token bucket per client IP address
pub struct ClientRateLimiter {
    limiter: DefaultKeyedRateLimiter<IpAddr>,
    trust_forwarded_for: bool,
}

impl ClientRateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        let per_minute = NonZeroU32::new(config.per_minute).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(config.burst).unwrap_or(NonZeroU32::MIN);

        Self {
            limiter: RateLimiter::keyed(Quota::per_minute(per_minute).allow_burst(burst)),
            trust_forwarded_for: config.trust_forwarded_for,
        }
    }

    /// Take one request from `client`'s bucket, or return the seconds to wait
    pub fn check(&self, client: IpAddr) -> std::result::Result<(), u64> {
        self.limiter.check_key(&client).map_err(|not_until| {
            not_until
                .wait_time_from(self.limiter.clock().now())
                .as_secs()
                .max(1)
        })
    }

    /// Forget clients whose bucket has refilled completely
    pub fn evict_idle(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
    }

    /// Number of clients currently holding a bucket
    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }
}

/// Sweep idle buckets every `every` until the task is aborted
pub fn spawn_eviction(state: AppState, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let limiter = state.rate_limiter();
            limiter.evict_idle();
            tracing::debug!(tracked = limiter.tracked_clients(), "Rate limiter buckets swept");
        }
    })
}

/// Middleware rejecting clients that exceeded their quota
pub async fn limit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let client = client_ip(&request, state.rate_limiter().trust_forwarded_for);

    match state.rate_limiter().check(client) {
        Ok(()) => next.run(request).await,
        Err(retry_after) => {
            tracing::warn!(%client, retry_after, "Rate limit exceeded");
            let mut response = Error::RateLimited.into_response();
            if let Ok(value) = HeaderValue::from_str(&retry_after.to_string()) {
                response.headers_mut().insert(RETRY_AFTER, value);
            }
            response
        }
    }
}

/// Client address used as the bucket key
///
/// The first `X-Forwarded-For` hop wins only when the proxy is trusted.
/// Otherwise the peer address is used, and requests without one share a bucket.
fn client_ip(request: &Request, trust_forwarded_for: bool) -> IpAddr {
    let forwarded = || {
        request
            .headers()
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .and_then(|ip| ip.trim().parse::<IpAddr>().ok())
    };
    let peer = || {
        request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
    };

    trust_forwarded_for
        .then(forwarded)
        .flatten()
        .or_else(peer)
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn config(per_minute: u32, burst: u32) -> RateLimitConfig {
        RateLimitConfig {
            per_minute,
            burst,
            trust_forwarded_for: false,
        }
    }

    fn request_from(peer: &str, forwarded: &str) -> Request {
        let mut request = axum::http::Request::builder()
            .header("x-forwarded-for", forwarded)
            .body(Body::empty())
            .unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(peer.parse::<SocketAddr>().unwrap()));
        request
    }

    #[test]
    fn test_burst_then_reject() {
        let limiter = ClientRateLimiter::new(&config(1, 2));
        let client: IpAddr = "10.0.0.1".parse().unwrap();

        assert!(limiter.check(client).is_ok());
        assert!(limiter.check(client).is_ok());
        let wait = limiter.check(client).unwrap_err();
        assert!(wait >= 1);
    }

    #[test]
    fn test_clients_have_separate_buckets() {
        let limiter = ClientRateLimiter::new(&config(1, 1));

        assert!(limiter.check("10.0.0.1".parse().unwrap()).is_ok());
        assert!(limiter.check("10.0.0.2".parse().unwrap()).is_ok());
        assert!(limiter.check("10.0.0.1".parse().unwrap()).is_err());
    }

    #[test]
    fn test_idle_buckets_are_evicted() {
        // one token per millisecond, so a bucket is full again almost at once
        let limiter = ClientRateLimiter::new(&config(60_000, 1));
        for i in 0..1_000u32 {
            assert!(limiter.check(IpAddr::from(i.to_be_bytes())).is_ok());
        }
        assert_eq!(limiter.tracked_clients(), 1_000);

        std::thread::sleep(Duration::from_millis(20));
        limiter.evict_idle();

        assert_eq!(limiter.tracked_clients(), 0);
    }

    #[test]
    fn test_throttled_buckets_survive_eviction() {
        let limiter = ClientRateLimiter::new(&config(1, 1));
        let client: IpAddr = "10.0.0.1".parse().unwrap();
        assert!(limiter.check(client).is_ok());

        limiter.evict_idle();

        assert_eq!(limiter.tracked_clients(), 1);
        assert!(limiter.check(client).is_err());
    }

    #[test]
    fn test_forwarded_header_ignored_by_default() {
        let request = request_from("192.0.2.10:4000", "203.0.113.7, 10.0.0.1");
        assert_eq!(client_ip(&request, false), "192.0.2.10".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn test_forwarded_header_used_behind_trusted_proxy() {
        let request = request_from("192.0.2.10:4000", "203.0.113.7, 10.0.0.1");
        assert_eq!(client_ip(&request, true), "203.0.113.7".parse::<IpAddr>().unwrap());

        let request = request_from("192.0.2.10:4000", "garbage");
        assert_eq!(client_ip(&request, true), "192.0.2.10".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn test_no_peer_shares_one_bucket() {
        let request = axum::http::Request::builder().body(Body::empty()).unwrap();
        assert_eq!(client_ip(&request, true), IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        assert_eq!(client_ip(&request, false), IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    }
}
