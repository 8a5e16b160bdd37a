// Copyright © 2025 jmapgate authors
// Licensed under jmapgate License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use super::jmap_method;
use crate::modules::jmap::method::MethodName;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Object)]
#[serde(rename_all = "camelCase")]
#[oai(rename_all = "camelCase")]
pub struct Mailbox {
    pub id: String,
    pub name: Option<String>,
    pub parent_id: Option<String>,
    /// Special-use role such as `inbox`, `sent`, `drafts` or `trash`.
    pub role: Option<String>,
    pub sort_order: Option<u32>,
    pub total_emails: Option<u64>,
    pub unread_emails: Option<u64>,
    pub total_threads: Option<u64>,
    pub unread_threads: Option<u64>,
    pub is_subscribed: Option<bool>,
}

// ---- Mailbox/get ----

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MailboxGetArgs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailboxGetResponse {
    pub account_id: String,
    pub state: String,
    pub list: Vec<Mailbox>,
    #[serde(default)]
    pub not_found: Vec<String>,
}

jmap_method!(MailboxGetArgs, MethodName::MailboxGet, MailboxGetResponse, get);

// ---- Mailbox/query ----

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MailboxFilterCondition {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_any_role: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_subscribed: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MailboxSortProperty {
    SortOrder,
    Name,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MailboxComparator {
    pub property: MailboxSortProperty,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_ascending: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MailboxQueryArgs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<MailboxFilterCondition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<Vec<MailboxComparator>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_as_tree: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calculate_total: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailboxQueryResponse {
    pub account_id: String,
    pub query_state: String,
    #[serde(default)]
    pub position: u64,
    pub ids: Vec<String>,
    pub total: Option<u64>,
}

jmap_method!(MailboxQueryArgs, MethodName::MailboxQuery, MailboxQueryResponse, query);

// ---- Mailbox/changes ----

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MailboxChangesArgs {
    pub since_state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_changes: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailboxChangesResponse {
    pub account_id: String,
    pub old_state: String,
    pub new_state: String,
    pub has_more_changes: bool,
    #[serde(default)]
    pub created: Vec<String>,
    #[serde(default)]
    pub updated: Vec<String>,
    #[serde(default)]
    pub destroyed: Vec<String>,
    pub updated_properties: Option<Vec<String>>,
}

jmap_method!(MailboxChangesArgs, MethodName::MailboxChanges, MailboxChangesResponse);
