// Copyright © 2025 jmapgate authors
// Licensed under jmapgate License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::{future::Future, time::Duration};

use http::header::{ACCEPT, AUTHORIZATION};
use url::Url;

use crate::{
    jmapgate_version,
    modules::{
        error::{code::ErrorCode, JmapGateResult},
        jmap::{request::JmapRequest, response::JmapResponse, session::JmapSession},
        settings::cli::SETTINGS,
    },
    raise_error,
};

/// Length of the response body quoted in HTTP error messages.
const BODY_EXCERPT_LEN: usize = 512;

/// Sends one batch and returns the raw batch response. Implementations own timeouts;
/// the batch layer never retries.
pub trait JmapTransport: Send + Sync {
    fn send(
        &self,
        session: &JmapSession,
        request: &JmapRequest,
    ) -> impl Future<Output = JmapGateResult<JmapResponse>> + Send;
}

pub struct HttpTransport {
    client: reqwest::Client,
    api_url: Url,
}

impl HttpTransport {
    pub fn new(api_url: &str, connect_timeout: Duration, timeout: Duration) -> JmapGateResult<Self> {
        let api_url = Url::parse(api_url).map_err(|e| {
            raise_error!(
                format!("Invalid JMAP API URL '{}': {}", api_url, e),
                ErrorCode::MissingConfiguration
            )
        })?;

        let client = reqwest::ClientBuilder::new()
            .user_agent(format!("jmapgate/{}", jmapgate_version!()))
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| {
                raise_error!(
                    format!("Failed to build HTTP client: {:#?}", e),
                    ErrorCode::InternalError
                )
            })?;

        Ok(Self { client, api_url })
    }

    pub fn from_settings() -> JmapGateResult<Self> {
        Self::new(
            &SETTINGS.jmapgate_jmap_api_url,
            Duration::from_secs(SETTINGS.jmapgate_jmap_connect_timeout_secs),
            Duration::from_secs(SETTINGS.jmapgate_jmap_request_timeout_secs),
        )
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }
}

impl JmapTransport for HttpTransport {
    async fn send(
        &self,
        session: &JmapSession,
        request: &JmapRequest,
    ) -> JmapGateResult<JmapResponse> {
        let response = self
            .client
            .post(self.api_url.clone())
            .header(AUTHORIZATION, &session.authorization)
            .header(ACCEPT, "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                raise_error!(
                    format!("JMAP request to {} failed: {}", self.api_url, e),
                    ErrorCode::NetworkError
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let excerpt: String = body.chars().take(BODY_EXCERPT_LEN).collect();
            return Err(raise_error!(
                format!("JMAP server answered HTTP {}: {}", status, excerpt),
                ErrorCode::HttpResponseError
            ));
        }

        response.json::<JmapResponse>().await.map_err(|e| {
            raise_error!(
                format!("Invalid JMAP response body: {}", e),
                ErrorCode::JmapResponseInvalid
            )
        })
    }
}
