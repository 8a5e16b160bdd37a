// Copyright © 2025 jmapgate authors
// Licensed under jmapgate License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::common::error::ErrorCapture;
use crate::modules::common::log::Tracing;
use crate::modules::error::code::ErrorCode;
use crate::modules::error::handler::error_handler;
use crate::modules::error::JmapGateResult;
use crate::modules::jmap::session::{ACCOUNT_ID_HEADER, USER_ID_HEADER};
use crate::modules::rest::public::status::get_status;
use crate::modules::{settings::cli::SETTINGS, utils::shutdown::shutdown_signal};

use super::error::ApiErrorResponse;
use crate::modules::common::timeout::{Timeout, TIMEOUT_HEADER};
use crate::raise_error;
use api::create_openapi_service;
use poem::get;
use poem::listener::TcpListener;
use poem::middleware::{CatchPanic, Compression};
use poem::{middleware::Cors, EndpointExt, Route, Server};
use std::time::Duration;

pub mod api;
pub mod public;

pub type ApiResult<T, E = ApiErrorResponse> = std::result::Result<T, E>;

const DESCRIPTION: &str = r#"
    jmapgate exposes the mailbox operations of a JMAP server as a plain REST API.

    - Every operation is sent to the JMAP server as one batched request, with later calls reading the results of earlier ones through result references.
    - Per-call protocol errors come back as typed API errors carrying the JMAP error type.
    - Credentials are forwarded per request, or taken from a configured service account.
"#;

pub async fn start_http_server() -> JmapGateResult<()> {
    let listener = TcpListener::bind((
        SETTINGS
            .jmapgate_bind_ip
            .clone()
            .unwrap_or("0.0.0.0".into()),
        SETTINGS.jmapgate_http_port,
    ));

    let api_service = create_openapi_service()
        .description(DESCRIPTION)
        .summary("A REST gateway in front of a JMAP mail server");

    let swagger = api_service.swagger_ui();
    let redoc = api_service.redoc();
    let spec_json = api_service.spec_endpoint();
    let openapi_explorer = api_service.openapi_explorer();

    let open_api_route = Route::new()
        .nest_no_strip("/api/v1", api_service)
        .with(ErrorCapture)
        .with(Timeout)
        .with(Tracing);

    let mut cors_origins = SETTINGS.jmapgate_cors_origins.clone();
    if cors_origins.is_empty() {
        cors_origins = ["*".to_string()].into_iter().collect();
    }

    let cors = Cors::new()
        .allow_origins(cors_origins)
        .allow_credentials(true)
        .allow_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS", "HEAD"])
        .allow_headers(vec![
            "Content-Type",
            "Authorization",
            ACCOUNT_ID_HEADER,
            USER_ID_HEADER,
            TIMEOUT_HEADER,
        ])
        .expose_headers(vec!["Accept"])
        .max_age(SETTINGS.jmapgate_cors_max_age);

    let route = Route::new()
        .nest("/api-docs/swagger", swagger)
        .nest("/api-docs/redoc", redoc)
        .nest("/api-docs/explorer", openapi_explorer)
        .nest("/api-docs/spec.json", spec_json)
        .nest("/api/status", get(get_status))
        .nest_no_strip("/api/v1", open_api_route)
        .with(cors)
        .with_if(
            SETTINGS.jmapgate_http_compression_enabled,
            Compression::new(),
        )
        .with(CatchPanic::new());

    let server = Server::new(listener)
        .name("jmapgate API Service")
        .idle_timeout(Duration::from_secs(60))
        .run_with_graceful_shutdown(
            route.catch_all_error(error_handler),
            shutdown_signal(),
            Some(Duration::from_secs(5)),
        );
    tracing::info!(
        "jmapgate API Service is now running on port {}.",
        SETTINGS.jmapgate_http_port
    );
    server
        .await
        .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::InternalError))
}
