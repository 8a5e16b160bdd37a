// Copyright © 2025 jmapgate authors
// Licensed under jmapgate License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    modules::error::{code::ErrorCode, JmapGateError},
    raise_error,
};

/// `[methodName | "error", payload, callId]` on the wire. The method slot stays a plain
/// string because servers may answer with implicit follow-up methods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodResponse(pub String, pub Value, pub String);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JmapResponse {
    pub method_responses: Vec<MethodResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_ids: Option<AHashMap<String, String>>,
    pub session_state: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MethodErrorType {
    Forbidden,
    AccountNotFound,
    AccountReadOnly,
    InvalidArguments,
    InvalidResultReference,
    UnknownMethod,
    ServerUnavailable,
    ServerFail,
    Unrecognized(String),
}

impl MethodErrorType {
    pub fn as_str(&self) -> &str {
        match self {
            MethodErrorType::Forbidden => "forbidden",
            MethodErrorType::AccountNotFound => "accountNotFound",
            MethodErrorType::AccountReadOnly => "accountReadOnly",
            MethodErrorType::InvalidArguments => "invalidArguments",
            MethodErrorType::InvalidResultReference => "invalidResultReference",
            MethodErrorType::UnknownMethod => "unknownMethod",
            MethodErrorType::ServerUnavailable => "serverUnavailable",
            MethodErrorType::ServerFail => "serverFail",
            MethodErrorType::Unrecognized(raw) => raw.as_str(),
        }
    }

    /// Application-level class of a protocol error.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            MethodErrorType::Forbidden | MethodErrorType::AccountReadOnly => ErrorCode::Forbidden,
            MethodErrorType::AccountNotFound => ErrorCode::ResourceNotFound,
            MethodErrorType::InvalidArguments
            | MethodErrorType::InvalidResultReference
            | MethodErrorType::UnknownMethod
            | MethodErrorType::ServerUnavailable
            | MethodErrorType::ServerFail
            | MethodErrorType::Unrecognized(_) => ErrorCode::JmapMethodFailed,
        }
    }
}

impl From<String> for MethodErrorType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "forbidden" => MethodErrorType::Forbidden,
            "accountNotFound" => MethodErrorType::AccountNotFound,
            "accountReadOnly" => MethodErrorType::AccountReadOnly,
            "invalidArguments" => MethodErrorType::InvalidArguments,
            "invalidResultReference" => MethodErrorType::InvalidResultReference,
            "unknownMethod" => MethodErrorType::UnknownMethod,
            "serverUnavailable" => MethodErrorType::ServerUnavailable,
            "serverFail" => MethodErrorType::ServerFail,
            _ => MethodErrorType::Unrecognized(value),
        }
    }
}

impl From<MethodErrorType> for String {
    fn from(value: MethodErrorType) -> Self {
        match value {
            MethodErrorType::Unrecognized(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for MethodErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of an `"error"` method response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodError {
    #[serde(rename = "type")]
    pub error_type: MethodErrorType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl MethodError {
    pub fn new(error_type: MethodErrorType, description: Option<String>) -> Self {
        Self {
            error_type,
            description,
        }
    }

    pub fn to_error(&self, call_id: &str) -> JmapGateError {
        let mut message = format!("JMAP error [{}] on callId=\"{}\"", self.error_type, call_id);
        if let Some(description) = &self.description {
            message.push_str(": ");
            message.push_str(description);
        }
        raise_error!(message, self.error_type.error_code())
    }
}

/// Outcome of one invocation, keyed by call ID after parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum InvocationResult {
    Ok(Value),
    Error(MethodError),
}

impl InvocationResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, InvocationResult::Ok(_))
    }

    pub fn data(&self) -> Option<&Value> {
        match self {
            InvocationResult::Ok(data) => Some(data),
            InvocationResult::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&MethodError> {
        match self {
            InvocationResult::Ok(_) => None,
            InvocationResult::Error(error) => Some(error),
        }
    }
}
