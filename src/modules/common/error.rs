// Copyright © 2025 jmapgate authors
// Licensed under jmapgate License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use poem::{Endpoint, IntoResponse, Middleware, Request, Response, Result};

use crate::modules::error::handler::error_handler;

/// Renders every error of the wrapped API as a `{code, message}` response, so the
/// tracing and timeout layers around it log and time real responses.
pub struct ErrorCapture;

pub struct ErrorCaptureEndpoint<E> {
    ep: E,
}

impl<E: Endpoint> Middleware<E> for ErrorCapture {
    type Output = ErrorCaptureEndpoint<E>;

    fn transform(&self, ep: E) -> Self::Output {
        ErrorCaptureEndpoint { ep }
    }
}

impl<E: Endpoint> Endpoint for ErrorCaptureEndpoint<E> {
    type Output = Response;

    async fn call(&self, req: Request) -> Result<Self::Output> {
        let error = match self.ep.call(req).await {
            Ok(response) => return Ok(response.into_response()),
            Err(error) => error,
        };
        tracing::debug!(status = %error.status(), "Rendering API error");
        Ok(error_handler(error).await)
    }
}
