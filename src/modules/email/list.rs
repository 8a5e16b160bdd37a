// Copyright © 2025 jmapgate authors
// Licensed under jmapgate License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::{
    modules::{
        email::{to_strings, DEFAULT_LIST_PROPERTIES},
        error::{code::ErrorCode, JmapGateResult},
        jmap::{
            args::email::{
                EmailFilter, EmailFilterCondition, EmailGetArgs, EmailObject, EmailQueryArgs,
            },
            builder::{GET_CALL_ID, QUERY_CALL_ID},
            client::JmapClient,
            session::JmapSession,
            transport::JmapTransport,
        },
    },
    raise_error,
};

pub const DEFAULT_LIMIT: u64 = 20;

/// Filter and paging of an email listing.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize, Object)]
pub struct EmailListQuery {
    /// Only emails in this mailbox.
    pub in_mailbox: Option<String>,
    /// Full-text search.
    pub text: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub subject: Option<String>,
    /// JMAP keyword such as `$seen` or `$flagged`.
    pub has_keyword: Option<String>,
    pub has_attachment: Option<bool>,
    /// Zero-based start position. Defaults to 0.
    pub position: Option<u64>,
    /// Maximum number of results, at least 1. Defaults to 20.
    pub limit: Option<u64>,
    pub calculate_total: Option<bool>,
    pub collapse_threads: Option<bool>,
}

impl EmailListQuery {
    pub fn validate(&self) -> JmapGateResult<()> {
        if self.limit == Some(0) {
            return Err(raise_error!(
                "limit must be at least 1".into(),
                ErrorCode::InvalidParameter
            ));
        }
        Ok(())
    }

    /// `None` when no criterion is set.
    pub fn filter(&self) -> Option<EmailFilter> {
        let condition = EmailFilterCondition {
            in_mailbox: self.in_mailbox.clone(),
            text: self.text.clone(),
            from: self.from.clone(),
            to: self.to.clone(),
            subject: self.subject.clone(),
            has_keyword: self.has_keyword.clone(),
            has_attachment: self.has_attachment,
            ..Default::default()
        };
        (!condition.is_empty()).then_some(EmailFilter::Condition(condition))
    }

    fn to_args(&self) -> EmailQueryArgs {
        EmailQueryArgs {
            filter: self.filter(),
            position: Some(self.position.unwrap_or(0) as i64),
            limit: Some(self.limit.unwrap_or(DEFAULT_LIMIT)),
            calculate_total: Some(self.calculate_total.unwrap_or(false)),
            collapse_threads: Some(self.collapse_threads.unwrap_or(false)),
            ..Default::default()
        }
    }
}

/// Which properties and bodies to fetch for each email.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize, Object)]
pub struct EmailFetchOptions {
    pub properties: Option<Vec<String>>,
    pub fetch_text_body: Option<bool>,
    pub fetch_html_body: Option<bool>,
    /// Truncate body values to this many bytes.
    pub max_body_bytes: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, Object)]
pub struct EmailList {
    /// Matching IDs in query order.
    pub ids: Vec<String>,
    pub emails: Vec<EmailObject>,
    /// Present when `calculate_total` was requested.
    pub total: Option<u64>,
}

/// Queries and fetches one page of emails in a single batch.
pub async fn list_emails<T: JmapTransport>(
    client: &JmapClient<T>,
    session: &JmapSession,
    query: &EmailListQuery,
    fetch: &EmailFetchOptions,
) -> JmapGateResult<EmailList> {
    query.validate()?;

    let get = EmailGetArgs {
        properties: Some(
            fetch
                .properties
                .clone()
                .unwrap_or_else(|| to_strings(&DEFAULT_LIST_PROPERTIES)),
        ),
        fetch_text_body_values: Some(fetch.fetch_text_body.unwrap_or(false)),
        fetch_html_body_values: Some(fetch.fetch_html_body.unwrap_or(false)),
        max_body_value_bytes: fetch.max_body_bytes,
        ..Default::default()
    };

    let parsed = client
        .execute(session, |builder| {
            builder.extend_query_then_get(query.to_args(), get)?;
            Ok(())
        })
        .await?;

    let query_result = parsed.unwrap_as::<EmailQueryArgs>(QUERY_CALL_ID)?;
    let get_result = parsed.unwrap_as::<EmailGetArgs>(GET_CALL_ID)?;

    Ok(EmailList {
        ids: query_result.ids,
        emails: get_result.list,
        total: query_result.total,
    })
}
