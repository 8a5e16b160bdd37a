// Copyright © 2025 jmapgate authors
// Licensed under jmapgate License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::{
    modules::{
        email::list::EmailFetchOptions,
        error::{code::ErrorCode, JmapGateResult},
        jmap::{
            args::email::{EmailGetArgs, EmailObject},
            builder::GET_CALL_ID,
            client::JmapClient,
            session::JmapSession,
            transport::JmapTransport,
        },
    },
    raise_error,
};

/// Fetches one email. Bodies are included unless the caller opts out; all
/// properties are returned unless a list is given.
pub async fn get_email<T: JmapTransport>(
    client: &JmapClient<T>,
    session: &JmapSession,
    email_id: &str,
    fetch: &EmailFetchOptions,
) -> JmapGateResult<Option<EmailObject>> {
    if email_id.trim().is_empty() {
        return Err(raise_error!(
            "Email ID cannot be empty".into(),
            ErrorCode::InvalidParameter
        ));
    }

    let args = EmailGetArgs {
        ids: Some(vec![email_id.to_string()]),
        properties: fetch.properties.clone(),
        fetch_text_body_values: Some(fetch.fetch_text_body.unwrap_or(true)),
        fetch_html_body_values: Some(fetch.fetch_html_body.unwrap_or(true)),
        max_body_value_bytes: fetch.max_body_bytes,
        ..Default::default()
    };

    let parsed = client.call(session, args, GET_CALL_ID).await?;
    let result = parsed.unwrap_as::<EmailGetArgs>(GET_CALL_ID)?;
    Ok(result.list.into_iter().next())
}
