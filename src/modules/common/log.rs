// Copyright © 2025 jmapgate authors
// Licensed under jmapgate License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::{
    num::NonZeroU32,
    sync::LazyLock,
    time::{Duration, Instant},
};

use governor::{
    clock::{QuantaClock, QuantaInstant},
    middleware::NoOpMiddleware,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use poem::{
    http::header, web::RealIp, Endpoint, FromRequest, IntoResponse, Middleware, Request, Response,
    Result,
};
use poem_openapi::OperationId;
use tracing::{error, info, warn, Instrument};

type GovRateLimiter =
    RateLimiter<NotKeyed, InMemoryState, QuantaClock, NoOpMiddleware<QuantaInstant>>;

/// Log budget per second; errors are cheaper than successes so they survive bursts.
const LOG_QUOTA_PER_SECOND: NonZeroU32 = match NonZeroU32::new(10) {
    Some(quota) => quota,
    None => NonZeroU32::MIN,
};

static LOG_LIMITER: LazyLock<GovRateLimiter> =
    LazyLock::new(|| RateLimiter::direct(Quota::per_second(LOG_QUOTA_PER_SECOND)));

pub(crate) fn log_cost(status: u16) -> NonZeroU32 {
    let cost = match status {
        500.. => 1,
        400..=499 => 3,
        _ => 5,
    };
    NonZeroU32::new(cost).unwrap_or(NonZeroU32::MIN)
}

fn should_log(status: u16) -> bool {
    LOG_LIMITER.check_n(log_cost(status)).is_ok_and(|r| r.is_ok())
}

/// Request span plus a completion line per response.
#[derive(Default)]
pub struct Tracing;

impl<E: Endpoint> Middleware<E> for Tracing {
    type Output = TracingEndpoint<E>;

    fn transform(&self, ep: E) -> Self::Output {
        TracingEndpoint { inner: ep }
    }
}

pub struct TracingEndpoint<E> {
    inner: E,
}

impl<E: Endpoint> Endpoint for TracingEndpoint<E> {
    type Output = Response;

    async fn call(&self, req: Request) -> Result<Self::Output> {
        let remote_addr = RealIp::from_request_without_body(&req)
            .await
            .ok()
            .and_then(|real_ip| real_ip.0)
            .map(|addr| addr.to_string())
            .unwrap_or_else(|| req.remote_addr().to_string());
        let user_agent = req
            .headers()
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok().map(|v| v.to_string()));

        let span = tracing::info_span!(
            "request",
            remote_addr = %remote_addr,
            method = %req.method(),
            path = %req.uri().path(),
            query = ?req.uri().query(),
            user_agent = ?user_agent,
        );

        async move {
            let now = Instant::now();
            let res = self.inner.call(req).await;
            let duration = now.elapsed();

            match res {
                Ok(resp) => {
                    let resp = resp.into_response();
                    let operation = resp.data::<OperationId>().map(|id| id.0);
                    log_response(resp.status().as_u16(), operation, duration);
                    Ok(resp)
                }
                Err(err) => {
                    log_response(err.status().as_u16(), None, duration);
                    Err(err)
                }
            }
        }
        .instrument(span)
        .await
    }
}

fn log_response(status: u16, operation: Option<&str>, duration: Duration) {
    if !should_log(status) {
        return;
    }
    match status {
        500.. => error!(status, operation, ?duration, "request completed with server error"),
        400..=499 => warn!(status, operation, ?duration, "request completed with client error"),
        _ => info!(status, operation, ?duration, "request completed successfully"),
    }
}
