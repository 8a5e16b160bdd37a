// Copyright © 2025 jmapgate authors
// Licensed under jmapgate License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use poem::http::{header::AUTHORIZATION, HeaderMap};
use poem::{FromRequest, Request, RequestBody, Result};

use crate::{
    base64_encode,
    modules::{
        error::{code::ErrorCode, JmapGateResult},
        settings::cli::SETTINGS,
    },
    raise_error,
};

pub const ACCOUNT_ID_HEADER: &str = "X-JMAP-Account-Id";
pub const USER_ID_HEADER: &str = "X-JMAP-User-Id";

/// Opaque per-user credentials handed to the transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JmapSession {
    pub user_id: String,
    pub account_id: String,
    /// Value of the `Authorization` header sent to the JMAP server.
    pub authorization: String,
}

impl JmapSession {
    pub fn new(
        user_id: impl Into<String>,
        account_id: impl Into<String>,
        authorization: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            account_id: account_id.into(),
            authorization: authorization.into(),
        }
    }

    pub fn basic_authorization(username: &str, password: &str) -> String {
        format!("Basic {}", base64_encode!(format!("{}:{}", username, password)))
    }

    /// Resolves the session from request headers, filling gaps from the configured
    /// service account.
    pub fn resolve(headers: &HeaderMap) -> JmapGateResult<Self> {
        let authorization = match header_value(headers, AUTHORIZATION.as_str()) {
            Some(value) => value,
            None => match (
                SETTINGS.jmapgate_jmap_username.as_deref(),
                SETTINGS.jmapgate_jmap_password.as_deref(),
            ) {
                (Some(username), Some(password)) => Self::basic_authorization(username, password),
                _ => {
                    return Err(raise_error!(
                        "Authorization required: send an Authorization header or configure a JMAP service account".into(),
                        ErrorCode::PermissionDenied
                    ))
                }
            },
        };

        let account_id = header_value(headers, ACCOUNT_ID_HEADER)
            .or_else(|| SETTINGS.jmapgate_jmap_account_id.clone())
            .ok_or_else(|| {
                raise_error!(
                    format!(
                        "No JMAP account: send the {} header or set --jmapgate-jmap-account-id",
                        ACCOUNT_ID_HEADER
                    ),
                    ErrorCode::InvalidParameter
                )
            })?;

        let user_id = header_value(headers, USER_ID_HEADER)
            .or_else(|| SETTINGS.jmapgate_jmap_username.clone())
            .unwrap_or_else(|| account_id.clone());

        Ok(Self {
            user_id,
            account_id,
            authorization,
        })
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

impl<'a> FromRequest<'a> for JmapSession {
    async fn from_request(req: &'a Request, _body: &mut RequestBody) -> Result<Self> {
        let session = Self::resolve(req.headers())?;
        tracing::debug!(user_id = %session.user_id, account_id = %session.account_id, "Resolved JMAP session");
        Ok(session)
    }
}
