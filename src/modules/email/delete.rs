// Copyright © 2025 jmapgate authors
// Licensed under jmapgate License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::modules::{
    email::{flag::SET_CALL_ID, validate_ids},
    error::JmapGateResult,
    jmap::{
        args::email::{EmailSetArgs, EmailSetResponse},
        client::JmapClient,
        session::JmapSession,
        transport::JmapTransport,
    },
};

#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize, Object)]
pub struct DeleteEmailRequest {
    /// IDs of the emails to destroy permanently.
    pub ids: Vec<String>,
}

pub async fn destroy_emails<T: JmapTransport>(
    client: &JmapClient<T>,
    session: &JmapSession,
    request: &DeleteEmailRequest,
) -> JmapGateResult<EmailSetResponse> {
    validate_ids(&request.ids)?;
    let args = EmailSetArgs {
        destroy: Some(request.ids.clone()),
        ..Default::default()
    };
    let parsed = client.call(session, args, SET_CALL_ID).await?;
    parsed.unwrap_as::<EmailSetArgs>(SET_CALL_ID)
}
