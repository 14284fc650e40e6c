use axum::extract::{ConnectInfo, Request, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use governor::clock::{Clock, DefaultClock};
use governor::middleware::StateInformationMiddleware;
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{Quota, RateLimiter};
use jiff::{SignedDuration, Timestamp};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::debug;

const WINDOW_SECS: u64 = 60;

/// Unix second at which a fully drained bucket has refilled.
fn window_reset() -> i64 {
    (Timestamp::now() + SignedDuration::from_secs(WINDOW_SECS as i64)).as_second()
}

type KeyedLimiter =
    RateLimiter<IpAddr, DefaultKeyedStateStore<IpAddr>, DefaultClock, StateInformationMiddleware>;

/// Per-client-IP token bucket.
///
/// Each address may burst up to `per_minute` requests; tokens refill evenly
/// over the minute.
#[derive(Clone)]
pub struct IpRateLimit {
    limiter: Arc<KeyedLimiter>,
    per_minute: NonZeroU32,
}

impl IpRateLimit {
    pub fn per_minute(per_minute: NonZeroU32) -> Self {
        let limiter = RateLimiter::keyed(Quota::per_minute(per_minute))
            .with_middleware::<StateInformationMiddleware>();
        Self {
            limiter: Arc::new(limiter),
            per_minute,
        }
    }

    fn limit_headers(&self, headers: &mut HeaderMap, remaining: u32) {
        headers.insert("x-ratelimit-limit", HeaderValue::from(self.per_minute.get()));
        headers.insert("x-ratelimit-window", HeaderValue::from(WINDOW_SECS));
        headers.insert("x-ratelimit-remaining", HeaderValue::from(remaining));
        headers.insert("x-ratelimit-reset", HeaderValue::from(window_reset()));
    }
}

/// Requests without a peer address (in-process calls) share one bucket.
fn client_ip(request: &Request) -> IpAddr {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED), |ConnectInfo(addr)| {
            addr.ip()
        })
}

pub async fn rate_limit(
    State(limit): State<IpRateLimit>,
    request: Request,
    next: Next,
) -> Response {
    let ip = client_ip(&request);

    match limit.limiter.check_key(&ip) {
        Ok(snapshot) => {
            let mut response = next.run(request).await;
            limit.limit_headers(response.headers_mut(), snapshot.remaining_burst_capacity());
            response
        }
        Err(not_until) => {
            let wait = not_until.wait_time_from(DefaultClock::default().now());
            let retry_after = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
            debug!(%ip, retry_after, "rate limit exceeded");

            let body = serde_json::json!({
                "error": "Rate limit exceeded",
                "message": format!("Maximum {} requests per minute per IP", limit.per_minute),
                "limit": limit.per_minute.get(),
                "window": format!("{WINDOW_SECS} seconds"),
                "retry_after": format!("{retry_after} seconds"),
            });
            let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
            let headers = response.headers_mut();
            limit.limit_headers(headers, 0);
            headers.insert("retry-after", HeaderValue::from(retry_after));
            response
        }
    }
}
