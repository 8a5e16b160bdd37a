// Copyright © 2025 jmapgate authors
// Licensed under jmapgate License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use poem::error::ResponseError;
use poem::Body;
use poem::{http::StatusCode, Error, Response};
use tracing::error;

use super::error::code::ErrorCode;
use super::error::JmapGateError;

pub mod error;
pub mod log;
pub mod timeout;
pub mod validator;


#[inline]
pub fn create_api_error_response(message: &str, code: ErrorCode) -> Error {
    JmapGateError::Generic {
        message: message.into(),
        location: snafu::Location::default(),
        code,
    }
    .into()
}

impl ResponseError for JmapGateError {
    fn status(&self) -> StatusCode {
        self.code().status()
    }

    fn as_response(&self) -> Response
    where
        Self: std::error::Error + Send + Sync + 'static,
    {
        let JmapGateError::Generic {
            message,
            location,
            code,
        } = self;

        if code.status().is_server_error() {
            error!(
                error_code = *code as u32,
                error_message = %message,
                error_location = ?location
            );
        }

        let body = Body::from_json(serde_json::json!({
            "code": *code as u32,
            "message": message,
        }))
        .unwrap_or_else(|_| Body::from_string(message.clone()));

        Response::builder().status(self.status()).body(body)
    }
}
