// Copyright © 2025 jmapgate authors
// Licensed under jmapgate License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use poem_openapi::Object;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    modules::{
        email::{flag::update_emails, validate_ids},
        error::{code::ErrorCode, JmapGateResult},
        jmap::{
            args::{email::EmailSetResponse, PatchObject},
            client::JmapClient,
            session::JmapSession,
            transport::JmapTransport,
        },
    },
    raise_error,
};

#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize, Object)]
pub struct MoveEmailRequest {
    /// IDs of the emails to move.
    pub ids: Vec<String>,
    /// Mailbox the emails are added to.
    pub target_mailbox_id: String,
    /// Mailbox the emails are removed from. Without it the emails stay in their
    /// current mailboxes as well.
    pub from_mailbox_id: Option<String>,
}

impl MoveEmailRequest {
    pub fn validate(&self) -> JmapGateResult<()> {
        validate_ids(&self.ids)?;
        if self.target_mailbox_id.trim().is_empty() {
            return Err(raise_error!(
                "targetMailboxId cannot be empty".into(),
                ErrorCode::InvalidParameter
            ));
        }
        if self.from_mailbox_id.as_deref() == Some(self.target_mailbox_id.as_str()) {
            return Err(raise_error!(
                "Source and target mailbox are the same".into(),
                ErrorCode::InvalidParameter
            ));
        }
        Ok(())
    }

    fn patch(&self) -> PatchObject {
        let mut patch = PatchObject::new();
        patch.insert(
            format!("mailboxIds/{}", self.target_mailbox_id),
            Value::Bool(true),
        );
        if let Some(from) = &self.from_mailbox_id {
            patch.insert(format!("mailboxIds/{}", from), Value::Null);
        }
        patch
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize, Object)]
pub struct TrashEmailRequest {
    pub ids: Vec<String>,
    /// ID of the trash mailbox.
    pub trash_mailbox_id: String,
}

pub async fn move_emails<T: JmapTransport>(
    client: &JmapClient<T>,
    session: &JmapSession,
    request: &MoveEmailRequest,
) -> JmapGateResult<EmailSetResponse> {
    request.validate()?;
    let patch = request.patch();
    let update = request
        .ids
        .iter()
        .map(|id| (id.clone(), patch.clone()))
        .collect();
    update_emails(client, session, update).await
}

pub async fn trash_emails<T: JmapTransport>(
    client: &JmapClient<T>,
    session: &JmapSession,
    request: TrashEmailRequest,
) -> JmapGateResult<EmailSetResponse> {
    let request = MoveEmailRequest {
        ids: request.ids,
        target_mailbox_id: request.trash_mailbox_id,
        from_mailbox_id: None,
    };
    move_emails(client, session, &request).await
}
