// Copyright © 2025 jmapgate authors
// Licensed under jmapgate License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use poem::{Endpoint, Middleware, Request, Result};
use std::time::Duration;
use tracing::error;

use crate::modules::error::code::ErrorCode;

use super::create_api_error_response;

pub const TIMEOUT_HEADER: &str = "X-JmapGate-Timeout-Seconds";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const MAX_TIMEOUT_SECS: u64 = 600;

/// Bounds each API request, by default or per request via [`TIMEOUT_HEADER`].
pub struct Timeout;

impl<E: Endpoint> Middleware<E> for Timeout {
    type Output = TimeoutEndpoint<E>;

    fn transform(&self, ep: E) -> Self::Output {
        TimeoutEndpoint { ep }
    }
}

pub struct TimeoutEndpoint<E> {
    ep: E,
}

pub(crate) fn timeout_seconds(header: Option<&str>) -> u64 {
    header
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_TIMEOUT_SECS)
        .min(MAX_TIMEOUT_SECS)
}

impl<E: Endpoint> Endpoint for TimeoutEndpoint<E> {
    type Output = E::Output;

    async fn call(&self, req: Request) -> Result<Self::Output> {
        let seconds = timeout_seconds(req.header(TIMEOUT_HEADER));
        match tokio::time::timeout(Duration::from_secs(seconds), self.ep.call(req)).await {
            Ok(result) => result,
            Err(_) => {
                error!("Request timed out after {} seconds", seconds);
                Err(create_api_error_response(
                    &format!(
                        "Request timed out after {} seconds (set {} to change it, max {} seconds)",
                        seconds, TIMEOUT_HEADER, MAX_TIMEOUT_SECS
                    ),
                    ErrorCode::RequestTimeout,
                ))
            }
        }
    }
}
