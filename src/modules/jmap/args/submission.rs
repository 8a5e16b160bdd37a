// Copyright © 2025 jmapgate authors
// Licensed under jmapgate License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{email::SetError, jmap_method, PatchObject};
use crate::modules::jmap::method::MethodName;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionAddress {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<HashMap<String, Option<String>>>,
}

impl SubmissionAddress {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            parameters: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub mail_from: SubmissionAddress,
    pub rcpt_to: Vec<SubmissionAddress>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailSubmissionCreate {
    pub identity_id: String,
    /// Either a server id or a creation-id reference such as `#draft`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub envelope: Option<Envelope>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub send_at: Option<String>,
}

// ---- EmailSubmission/set ----

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailSubmissionSetArgs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub if_in_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create: Option<HashMap<String, EmailSubmissionCreate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update: Option<HashMap<String, PatchObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destroy: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_success_update_email: Option<HashMap<String, PatchObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_success_destroy_email: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailSubmissionSetResponse {
    pub account_id: String,
    pub old_state: Option<String>,
    pub new_state: String,
    pub created: Option<HashMap<String, Value>>,
    pub updated: Option<HashMap<String, Value>>,
    pub destroyed: Option<Vec<String>>,
    pub not_created: Option<HashMap<String, SetError>>,
    pub not_updated: Option<HashMap<String, SetError>>,
    pub not_destroyed: Option<HashMap<String, SetError>>,
}

jmap_method!(
    EmailSubmissionSetArgs,
    MethodName::EmailSubmissionSet,
    EmailSubmissionSetResponse
);

// ---- EmailSubmission/get ----

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailSubmissionGetArgs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailSubmission {
    pub id: String,
    pub identity_id: Option<String>,
    pub email_id: Option<String>,
    pub thread_id: Option<String>,
    pub envelope: Option<Envelope>,
    pub send_at: Option<String>,
    pub undo_status: Option<String>,
    pub delivery_status: Option<HashMap<String, Value>>,
    pub dsn_blob_ids: Option<Vec<String>>,
    pub mdn_blob_ids: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailSubmissionGetResponse {
    pub account_id: String,
    pub state: String,
    pub list: Vec<EmailSubmission>,
    #[serde(default)]
    pub not_found: Vec<String>,
}

jmap_method!(
    EmailSubmissionGetArgs,
    MethodName::EmailSubmissionGet,
    EmailSubmissionGetResponse,
    get
);

// ---- EmailSubmission/query ----

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailSubmissionFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub undo_status: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EmailSubmissionSortProperty {
    EmailId,
    IdentityId,
    SendAt,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailSubmissionComparator {
    pub property: EmailSubmissionSortProperty,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_ascending: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailSubmissionQueryArgs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<EmailSubmissionFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<Vec<EmailSubmissionComparator>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailSubmissionQueryResponse {
    pub account_id: String,
    pub query_state: String,
    #[serde(default)]
    pub can_calculate_changes: bool,
    #[serde(default)]
    pub position: u64,
    pub ids: Vec<String>,
    pub total: Option<u64>,
}

jmap_method!(
    EmailSubmissionQueryArgs,
    MethodName::EmailSubmissionQuery,
    EmailSubmissionQueryResponse,
    query
);

// ---- EmailSubmission/queryChanges ----

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailSubmissionQueryChangesArgs {
    pub since_query_state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_changes: Option<u64>,
}

jmap_method!(
    EmailSubmissionQueryChangesArgs,
    MethodName::EmailSubmissionQueryChanges,
    super::email::EmailQueryChangesResponse
);
