// Copyright © 2025 jmapgate authors
// Licensed under jmapgate License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt::Formatter;

use code::ErrorCode;
use poem::http::StatusCode;
use poem_openapi::{payload::Json, ApiResponse, Object};
use snafu::{Location, Snafu};

pub mod code;
pub mod handler;


#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum JmapGateError {
    #[snafu(display("{message}"))]
    Generic {
        message: String,
        #[snafu(implicit)]
        location: Location,
        code: ErrorCode,
    },
}

pub type JmapGateResult<T, E = JmapGateError> = std::result::Result<T, E>;

impl JmapGateError {
    pub fn code(&self) -> ErrorCode {
        match self {
            JmapGateError::Generic { code, .. } => *code,
        }
    }
}

#[derive(Debug, Clone, Object)]
pub struct ApiError {
    pub message: String,
    pub code: u32,
}

impl From<JmapGateError> for ApiErrorResponse {
    fn from(error: JmapGateError) -> Self {
        let JmapGateError::Generic {
            message,
            location,
            code,
        } = error;
        let status = code.status();
        if status.is_server_error() {
            tracing::error!(error_code = ?code, error_location = ?location, "API error: {}", message);
        } else {
            tracing::warn!(error_code = ?code, "API request rejected: {}", message);
        }
        ApiErrorResponse::Generic(status, Json(ApiError::new(message, code as u32)))
    }
}

impl ApiError {
    pub fn new(message: String, code: u32) -> Self {
        Self { message, code }
    }

    pub fn new_with_error_code<ErrorType: std::fmt::Display>(
        error: ErrorType,
        code: u32,
    ) -> ApiError {
        Self::new(format!("{:#}", error), code)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error({}): {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[derive(Debug, Clone, ApiResponse)]
pub enum ApiErrorResponse {
    Generic(StatusCode, Json<ApiError>),
}
