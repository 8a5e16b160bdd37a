// Copyright © 2025 jmapgate authors
// Licensed under jmapgate License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashMap;

use poem_openapi::Object;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    modules::{
        email::validate_ids,
        error::{code::ErrorCode, JmapGateResult},
        jmap::{
            args::{
                email::{EmailSetArgs, EmailSetResponse, KEYWORD_FLAGGED, KEYWORD_SEEN},
                PatchObject,
            },
            client::JmapClient,
            session::JmapSession,
            transport::JmapTransport,
        },
    },
    raise_error,
};

pub const SET_CALL_ID: &str = "set";

/// Emails addressed by one of the keyword shortcuts.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize, Object)]
pub struct EmailIdsRequest {
    pub ids: Vec<String>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize, Object)]
pub struct SetFlagsRequest {
    /// IDs of the emails to update.
    pub ids: Vec<String>,
    /// Keywords to add, e.g. `$seen`, `$flagged`.
    pub add_keywords: Option<Vec<String>>,
    /// Keywords to remove.
    pub remove_keywords: Option<Vec<String>>,
}

impl SetFlagsRequest {
    pub fn validate(&self) -> JmapGateResult<()> {
        validate_ids(&self.ids)?;
        let add = self.add_keywords.as_deref().unwrap_or_default();
        let remove = self.remove_keywords.as_deref().unwrap_or_default();
        if add.is_empty() && remove.is_empty() {
            return Err(raise_error!(
                "At least one keyword to add or remove is required".into(),
                ErrorCode::InvalidParameter
            ));
        }
        if add.iter().chain(remove).any(|kw| kw.trim().is_empty()) {
            return Err(raise_error!(
                "Keywords cannot be blank".into(),
                ErrorCode::InvalidParameter
            ));
        }
        Ok(())
    }

    fn patch(&self) -> PatchObject {
        let mut patch = PatchObject::new();
        for keyword in self.add_keywords.iter().flatten() {
            patch.insert(format!("keywords/{}", keyword), Value::Bool(true));
        }
        for keyword in self.remove_keywords.iter().flatten() {
            patch.insert(format!("keywords/{}", keyword), Value::Null);
        }
        patch
    }
}

/// Sends `update` as one `Email/set` call.
pub(crate) async fn update_emails<T: JmapTransport>(
    client: &JmapClient<T>,
    session: &JmapSession,
    update: HashMap<String, PatchObject>,
) -> JmapGateResult<EmailSetResponse> {
    let args = EmailSetArgs {
        update: Some(update),
        ..Default::default()
    };
    let parsed = client.call(session, args, SET_CALL_ID).await?;
    parsed.unwrap_as::<EmailSetArgs>(SET_CALL_ID)
}

pub async fn set_flags<T: JmapTransport>(
    client: &JmapClient<T>,
    session: &JmapSession,
    request: &SetFlagsRequest,
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

pub async fn mark_as_read<T: JmapTransport>(
    client: &JmapClient<T>,
    session: &JmapSession,
    ids: Vec<String>,
) -> JmapGateResult<EmailSetResponse> {
    let request = SetFlagsRequest {
        ids,
        add_keywords: Some(vec![KEYWORD_SEEN.into()]),
        remove_keywords: None,
    };
    set_flags(client, session, &request).await
}

pub async fn mark_as_unread<T: JmapTransport>(
    client: &JmapClient<T>,
    session: &JmapSession,
    ids: Vec<String>,
) -> JmapGateResult<EmailSetResponse> {
    let request = SetFlagsRequest {
        ids,
        add_keywords: None,
        remove_keywords: Some(vec![KEYWORD_SEEN.into()]),
    };
    set_flags(client, session, &request).await
}

pub async fn toggle_flagged<T: JmapTransport>(
    client: &JmapClient<T>,
    session: &JmapSession,
    ids: Vec<String>,
    flagged: bool,
) -> JmapGateResult<EmailSetResponse> {
    let keyword = Some(vec![KEYWORD_FLAGGED.to_string()]);
    let request = if flagged {
        SetFlagsRequest {
            ids,
            add_keywords: keyword,
            remove_keywords: None,
        }
    } else {
        SetFlagsRequest {
            ids,
            add_keywords: None,
            remove_keywords: keyword,
        }
    };
    set_flags(client, session, &request).await
}
