// Copyright © 2025 jmapgate authors
// Licensed under jmapgate License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::capability::Capability;

/// Method name slot used by servers to report a failed invocation.
pub const ERROR_METHOD: &str = "error";

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum MethodName {
    #[serde(rename = "Core/echo")]
    CoreEcho,
    #[serde(rename = "Email/get")]
    EmailGet,
    #[serde(rename = "Email/query")]
    EmailQuery,
    #[serde(rename = "Email/queryChanges")]
    EmailQueryChanges,
    #[serde(rename = "Email/changes")]
    EmailChanges,
    #[serde(rename = "Email/set")]
    EmailSet,
    #[serde(rename = "Email/copy")]
    EmailCopy,
    #[serde(rename = "Email/import")]
    EmailImport,
    #[serde(rename = "Email/parse")]
    EmailParse,
    #[serde(rename = "EmailSubmission/get")]
    EmailSubmissionGet,
    #[serde(rename = "EmailSubmission/set")]
    EmailSubmissionSet,
    #[serde(rename = "EmailSubmission/query")]
    EmailSubmissionQuery,
    #[serde(rename = "EmailSubmission/queryChanges")]
    EmailSubmissionQueryChanges,
    #[serde(rename = "Mailbox/get")]
    MailboxGet,
    #[serde(rename = "Mailbox/query")]
    MailboxQuery,
    #[serde(rename = "Mailbox/changes")]
    MailboxChanges,
    #[serde(rename = "error")]
    Error,
}

impl MethodName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MethodName::CoreEcho => "Core/echo",
            MethodName::EmailGet => "Email/get",
            MethodName::EmailQuery => "Email/query",
            MethodName::EmailQueryChanges => "Email/queryChanges",
            MethodName::EmailChanges => "Email/changes",
            MethodName::EmailSet => "Email/set",
            MethodName::EmailCopy => "Email/copy",
            MethodName::EmailImport => "Email/import",
            MethodName::EmailParse => "Email/parse",
            MethodName::EmailSubmissionGet => "EmailSubmission/get",
            MethodName::EmailSubmissionSet => "EmailSubmission/set",
            MethodName::EmailSubmissionQuery => "EmailSubmission/query",
            MethodName::EmailSubmissionQueryChanges => "EmailSubmission/queryChanges",
            MethodName::MailboxGet => "Mailbox/get",
            MethodName::MailboxQuery => "Mailbox/query",
            MethodName::MailboxChanges => "Mailbox/changes",
            MethodName::Error => ERROR_METHOD,
        }
    }

    /// The capability a batch must declare to use this method.
    pub fn capability(&self) -> Capability {
        match self {
            MethodName::CoreEcho | MethodName::Error => Capability::Core,
            MethodName::EmailGet
            | MethodName::EmailQuery
            | MethodName::EmailQueryChanges
            | MethodName::EmailChanges
            | MethodName::EmailSet
            | MethodName::EmailCopy
            | MethodName::EmailImport
            | MethodName::EmailParse
            | MethodName::MailboxGet
            | MethodName::MailboxQuery
            | MethodName::MailboxChanges => Capability::Mail,
            MethodName::EmailSubmissionGet
            | MethodName::EmailSubmissionSet
            | MethodName::EmailSubmissionQuery
            | MethodName::EmailSubmissionQueryChanges => Capability::Submission,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, MethodName::Error)
    }
}

impl fmt::Display for MethodName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
