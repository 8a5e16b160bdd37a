// Copyright © 2025 jmapgate authors
// Licensed under jmapgate License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use ahash::AHashMap;
use serde_json::Value;

use crate::{
    modules::{
        error::{code::ErrorCode, JmapGateResult},
        jmap::{
            args::MethodArguments,
            method::{MethodName, ERROR_METHOD},
            response::{InvocationResult, JmapResponse, MethodError, MethodErrorType},
        },
    },
    raise_error,
};

/// Stateless: every [`parse`](Self::parse) produces an independent [`ParsedResponse`].
#[derive(Debug, Clone, Copy, Default)]
pub struct JmapResponseParser;

impl JmapResponseParser {
    pub fn parse(&self, response: JmapResponse) -> ParsedResponse {
        let mut results: AHashMap<String, (String, InvocationResult)> =
            AHashMap::with_capacity(response.method_responses.len());
        let mut by_method = AHashMap::with_capacity(response.method_responses.len());

        for entry in response.method_responses {
            let (method, payload, call_id) = (entry.0, entry.1, entry.2);
            let outcome = if method == ERROR_METHOD {
                let error = method_error(&payload);
                tracing::warn!(
                    call_id = %call_id,
                    error_type = %error.error_type,
                    "JMAP method error: {}",
                    error.description.as_deref().unwrap_or("no description")
                );
                InvocationResult::Error(error)
            } else {
                InvocationResult::Ok(payload)
            };
            by_method
                .entry((call_id.clone(), method.clone()))
                .or_insert_with(|| outcome.clone());
            // Implicit follow-up responses reuse the call ID; the later one wins here
            // and the earlier one stays reachable through `get_method`.
            if let Some((previous, _)) = results.insert(call_id.clone(), (method.clone(), outcome)) {
                tracing::debug!(
                    call_id = %call_id,
                    previous_method = %previous,
                    method = %method,
                    "Repeated callId in JMAP response, keeping the later entry"
                );
            }
        }

        ParsedResponse {
            session_state: response.session_state,
            created_ids: response.created_ids.unwrap_or_default(),
            results,
            by_method,
        }
    }
}

fn method_error(payload: &Value) -> MethodError {
    let error_type = payload
        .get("type")
        .and_then(Value::as_str)
        .map(|t| MethodErrorType::from(t.to_string()))
        .unwrap_or_else(|| MethodErrorType::Unrecognized("unknown".into()));
    let description = payload
        .get("description")
        .and_then(Value::as_str)
        .map(str::to_string);
    MethodError::new(error_type, description)
}

/// Correlation table of one response, indexed by call ID.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedResponse {
    session_state: String,
    created_ids: AHashMap<String, String>,
    results: AHashMap<String, (String, InvocationResult)>,
    by_method: AHashMap<(String, String), InvocationResult>,
}

impl ParsedResponse {
    pub fn session_state(&self) -> &str {
        &self.session_state
    }

    pub fn created_ids(&self) -> &AHashMap<String, String> {
        &self.created_ids
    }

    pub fn created_id(&self, creation_id: &str) -> Option<&str> {
        self.created_ids.get(creation_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Outcome of `call_id`, or `None` when the server never answered it.
    pub fn get(&self, call_id: &str) -> Option<&InvocationResult> {
        let result = self.results.get(call_id).map(|(_, result)| result);
        if result.is_none() {
            tracing::warn!(call_id = %call_id, "callId not found in JMAP response");
        }
        result
    }

    /// Success payload of `call_id`. A protocol error is translated into the
    /// matching application error.
    pub fn unwrap(&self, call_id: &str) -> JmapGateResult<&Value> {
        match self.results.get(call_id).map(|(_, result)| result) {
            Some(InvocationResult::Ok(data)) => Ok(data),
            Some(InvocationResult::Error(error)) => Err(error.to_error(call_id)),
            None => Err(raise_error!(
                format!(
                    "Invocation missing from JMAP response: callId=\"{}\" was never answered",
                    call_id
                ),
                ErrorCode::InvocationMissing
            )),
        }
    }

    /// Outcome of the `method` entry answering `call_id`. Unlike [`get`](Self::get) it
    /// still finds a response that an implicit follow-up with the same call ID replaced.
    pub fn get_method(&self, call_id: &str, method: MethodName) -> Option<&InvocationResult> {
        self.by_method
            .get(&(call_id.to_string(), method.as_str().to_string()))
    }

    /// [`unwrap`](Self::unwrap), decoded into the result type of `A`. The `A::METHOD`
    /// entry of `call_id` is preferred over a later follow-up sharing the call ID.
    pub fn unwrap_as<A: MethodArguments>(&self, call_id: &str) -> JmapGateResult<A::Response> {
        let data = match self.get_method(call_id, A::METHOD) {
            Some(InvocationResult::Ok(data)) => data,
            _ => self.unwrap(call_id)?,
        };
        serde_json::from_value(data.clone()).map_err(|e| {
            raise_error!(
                format!(
                    "Unexpected {} result shape on callId=\"{}\": {}",
                    A::METHOD,
                    call_id,
                    e
                ),
                ErrorCode::InternalError
            )
        })
    }
}
