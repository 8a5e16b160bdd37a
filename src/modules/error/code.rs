// Copyright © 2025 jmapgate authors
// Licensed under jmapgate License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use poem::http::StatusCode;
use poem_openapi::Enum;

#[derive(Copy, Clone, Debug, Enum, Eq, PartialEq)]
#[repr(u32)]
pub enum ErrorCode {
    // Client-side errors (10000–10999)
    InvalidParameter = 10000,
    MissingConfiguration = 10020,
    RequestTimeout = 10080,
    MethodNotAllowed = 10090,

    // Authentication and authorization errors (20000–20999)
    PermissionDenied = 20000,
    Forbidden = 20070,

    // Resource errors (30000–30999)
    ResourceNotFound = 30000,

    // Network connection errors (40000–40999)
    NetworkError = 40000,
    HttpResponseError = 40030,

    // JMAP protocol errors (50000–50999)
    JmapMethodFailed = 50090,
    InvocationMissing = 50100,
    JmapResponseInvalid = 50110,

    // Batch construction errors (60000–60999)
    DuplicateCallId = 60000,
    UndeclaredCallId = 60010,
    UnknownResultReference = 60020,
    ErrorResultReference = 60030,
    EmptyBatch = 60040,

    // Internal system errors (70000–70999)
    InternalError = 70000,
    UnhandledPoemError = 70010,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::InvalidParameter | ErrorCode::MissingConfiguration => {
                StatusCode::BAD_REQUEST
            }
            ErrorCode::PermissionDenied => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::ResourceNotFound => StatusCode::NOT_FOUND,
            ErrorCode::RequestTimeout => StatusCode::REQUEST_TIMEOUT,
            ErrorCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ErrorCode::NetworkError
            | ErrorCode::HttpResponseError
            | ErrorCode::JmapMethodFailed
            | ErrorCode::InvocationMissing
            | ErrorCode::JmapResponseInvalid
            | ErrorCode::DuplicateCallId
            | ErrorCode::UndeclaredCallId
            | ErrorCode::UnknownResultReference
            | ErrorCode::ErrorResultReference
            | ErrorCode::EmptyBatch
            | ErrorCode::InternalError
            | ErrorCode::UnhandledPoemError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
