// Copyright © 2025 jmapgate authors
// Licensed under jmapgate License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::{
    modules::{
        email::to_strings,
        error::{code::ErrorCode, JmapGateResult},
        jmap::{
            args::email::{EmailParseArgs, EmailParseResponse},
            client::JmapClient,
            session::JmapSession,
            transport::JmapTransport,
        },
    },
    raise_error,
};

pub const PARSE_CALL_ID: &str = "parse";
pub const DEFAULT_PARSE_PROPERTIES: [&str; 6] =
    ["id", "subject", "from", "to", "textBody", "htmlBody"];

#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize, Object)]
pub struct ParseEmailRequest {
    /// Blob IDs of `message/rfc822` content, e.g. `.eml` attachments.
    pub blob_ids: Vec<String>,
    pub properties: Option<Vec<String>>,
}

impl ParseEmailRequest {
    pub fn validate(&self) -> JmapGateResult<()> {
        if self.blob_ids.is_empty() {
            return Err(raise_error!(
                "blobIds cannot be empty".into(),
                ErrorCode::InvalidParameter
            ));
        }
        Ok(())
    }
}

pub async fn parse_emails<T: JmapTransport>(
    client: &JmapClient<T>,
    session: &JmapSession,
    request: &ParseEmailRequest,
) -> JmapGateResult<EmailParseResponse> {
    request.validate()?;
    let args = EmailParseArgs {
        blob_ids: request.blob_ids.clone(),
        properties: Some(
            request
                .properties
                .clone()
                .unwrap_or_else(|| to_strings(&DEFAULT_PARSE_PROPERTIES)),
        ),
        fetch_text_body_values: Some(true),
        fetch_html_body_values: Some(true),
        ..Default::default()
    };
    let parsed = client.call(session, args, PARSE_CALL_ID).await?;
    parsed.unwrap_as::<EmailParseArgs>(PARSE_CALL_ID)
}
