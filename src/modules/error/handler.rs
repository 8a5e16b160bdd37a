// Copyright © 2025 jmapgate authors
// Licensed under jmapgate License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use poem::{error::NotFoundError, IntoResponse, Response};
use poem_openapi::payload::Json;

use crate::modules::error::{code::ErrorCode, ApiError, ApiErrorResponse, JmapGateError};

/// Renders errors raised by poem itself (routing, extraction, parsing) with the same
/// `{code, message}` body as application errors.
pub async fn error_handler(error: poem::Error) -> Response {
    if error.is::<JmapGateError>() {
        return error.into_response();
    }

    let code = match classify(&error) {
        Some(code) => code,
        None if error.has_source() => ErrorCode::UnhandledPoemError,
        None => return error.into_response(),
    };

    let api_error = ApiError::new_with_error_code(error.to_string(), code as u32);
    let mut response = ApiErrorResponse::Generic(code.status(), Json(api_error)).into_response();
    response.set_status(error.status());
    response
}

fn classify(error: &poem::Error) -> Option<ErrorCode> {
    if error.is::<NotFoundError>() {
        Some(ErrorCode::ResourceNotFound)
    } else if is_parse_error(error) {
        Some(ErrorCode::InvalidParameter)
    } else if error.is::<poem::error::MethodNotAllowedError>() {
        Some(ErrorCode::MethodNotAllowed)
    } else if error.is::<poem_openapi::error::AuthorizationError>() {
        Some(ErrorCode::PermissionDenied)
    } else {
        None
    }
}

fn is_parse_error(error: &poem::Error) -> bool {
    error.is::<poem::error::ParsePathError>()
        || error.is::<poem::error::ParseTypedHeaderError>()
        || error.is::<poem::error::ParseQueryError>()
        || error.is::<poem::error::ParseJsonError>()
        || error.is::<poem_openapi::error::ParseRequestPayloadError>()
        || error.is::<poem_openapi::error::ContentTypeError>()
        || error.is::<poem_openapi::error::ParseParamError>()
        || error.is::<poem_openapi::error::ParsePathError>()
}
