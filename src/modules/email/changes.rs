// Copyright © 2025 jmapgate authors
// Licensed under jmapgate License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::{
    modules::{
        error::{code::ErrorCode, JmapGateResult},
        jmap::{
            args::email::{EmailChangesArgs, EmailChangesResponse},
            client::JmapClient,
            session::JmapSession,
            transport::JmapTransport,
        },
    },
    raise_error,
};

pub const CHANGES_CALL_ID: &str = "changes";
pub const DEFAULT_MAX_CHANGES: u64 = 50;

pub async fn get_email_changes<T: JmapTransport>(
    client: &JmapClient<T>,
    session: &JmapSession,
    since_state: &str,
    max_changes: Option<u64>,
) -> JmapGateResult<EmailChangesResponse> {
    if since_state.trim().is_empty() {
        return Err(raise_error!(
            "sinceState cannot be empty".into(),
            ErrorCode::InvalidParameter
        ));
    }
    if max_changes == Some(0) {
        return Err(raise_error!(
            "maxChanges must be at least 1".into(),
            ErrorCode::InvalidParameter
        ));
    }

    let args = EmailChangesArgs {
        since_state: since_state.to_string(),
        max_changes: Some(max_changes.unwrap_or(DEFAULT_MAX_CHANGES)),
    };
    let parsed = client.call(session, args, CHANGES_CALL_ID).await?;
    parsed.unwrap_as::<EmailChangesArgs>(CHANGES_CALL_ID)
}
