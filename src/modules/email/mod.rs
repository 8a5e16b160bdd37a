// Copyright © 2025 jmapgate authors
// Licensed under jmapgate License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::{
    modules::error::{code::ErrorCode, JmapGateResult},
    raise_error,
};

pub mod changes;
pub mod delete;
pub mod flag;
pub mod get;
pub mod list;
pub mod mv;
pub mod parse;
pub mod send;

#[cfg(test)]
mod tests;

/// Properties returned by listings when the caller asks for none.
pub const DEFAULT_LIST_PROPERTIES: [&str; 8] = [
    "id",
    "subject",
    "from",
    "to",
    "receivedAt",
    "preview",
    "hasAttachment",
    "keywords",
];

pub(crate) fn validate_ids(ids: &[String]) -> JmapGateResult<()> {
    if ids.is_empty() {
        return Err(raise_error!(
            "Email ID list cannot be empty".into(),
            ErrorCode::InvalidParameter
        ));
    }
    if ids.iter().any(|id| id.trim().is_empty()) {
        return Err(raise_error!(
            "Email IDs cannot be blank".into(),
            ErrorCode::InvalidParameter
        ));
    }
    Ok(())
}

pub(crate) fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
