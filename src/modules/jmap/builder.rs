// Copyright © 2025 jmapgate authors
// Licensed under jmapgate License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use ahash::AHashMap;
use serde_json::Value;

use crate::{
    modules::{
        error::{code::ErrorCode, JmapGateResult},
        jmap::{
            args::{GetMethod, MethodArguments, QueryMethod},
            capability::{Capability, CapabilitySet},
            method::MethodName,
            reference::ResultReference,
            request::{Arguments, Invocation, JmapRequest},
        },
    },
    raise_error,
};

pub const ACCOUNT_ID_KEY: &str = "accountId";
pub const DEFAULT_CALL_ID: &str = "r1";
pub const QUERY_CALL_ID: &str = "query";
pub const GET_CALL_ID: &str = "get";
pub const IDS_PATH: &str = "/ids";

/// Accumulates the invocations of one batch.
///
/// Argument records live in an arena owned by the builder and indexed by call ID, so
/// [`reference`](Self::reference) can rewrite an earlier call before the batch is built.
/// A builder is meant for one batch on one task.
#[derive(Debug, Clone, Default)]
pub struct JmapRequestBuilder {
    account_id: Option<String>,
    capabilities: CapabilitySet,
    calls: Vec<(MethodName, String)>,
    arguments: AHashMap<String, Arguments>,
}

impl JmapRequestBuilder {
    /// `None` builds account-agnostic batches: no `accountId` is injected.
    pub fn new(account_id: Option<String>) -> Self {
        Self {
            account_id,
            capabilities: CapabilitySet::baseline(),
            calls: Vec::new(),
            arguments: AHashMap::new(),
        }
    }

    pub fn account_id(&self) -> Option<&str> {
        self.account_id.as_deref()
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub fn contains(&self, call_id: &str) -> bool {
        self.arguments.contains_key(call_id)
    }

    /// Registers an invocation of `A::METHOD` under `call_id`.
    pub fn call<A: MethodArguments>(&mut self, args: A, call_id: &str) -> JmapGateResult<&mut Self> {
        if self.contains(call_id) {
            return Err(raise_error!(
                format!(
                    "Duplicate callId \"{}\": call IDs must be unique within a batch",
                    call_id
                ),
                ErrorCode::DuplicateCallId
            ));
        }

        let mut arguments = match serde_json::to_value(&args) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                return Err(raise_error!(
                    format!(
                        "Arguments of {} (callId=\"{}\") must serialize to a JSON object, got {}",
                        A::METHOD,
                        call_id,
                        other
                    ),
                    ErrorCode::InternalError
                ))
            }
            Err(e) => {
                return Err(raise_error!(
                    format!(
                        "Failed to serialize arguments of {} (callId=\"{}\"): {:#?}",
                        A::METHOD,
                        call_id,
                        e
                    ),
                    ErrorCode::InternalError
                ))
            }
        };

        if let Some(account_id) = &self.account_id {
            if !arguments.contains_key(ACCOUNT_ID_KEY) {
                arguments.insert(ACCOUNT_ID_KEY.into(), Value::String(account_id.clone()));
            }
        }

        self.capabilities.insert(A::METHOD.capability());
        self.calls.push((A::METHOD, call_id.to_string()));
        self.arguments.insert(call_id.to_string(), arguments);
        Ok(self)
    }

    /// Turns argument `arg_key` of `call_id` into `#arg_key`, resolved server-side from
    /// `path` in the result of `result_of`.
    ///
    /// `result_of` must be registered before `call_id`. A failed check leaves the
    /// builder untouched.
    pub fn reference(
        &mut self,
        call_id: &str,
        arg_key: &str,
        result_of: &str,
        result_name: MethodName,
        path: &str,
    ) -> JmapGateResult<&mut Self> {
        if result_name.is_error() {
            return Err(raise_error!(
                format!(
                    "Cannot reference an error result: \"{}\" of callId=\"{}\" from callId=\"{}\"",
                    path, result_of, call_id
                ),
                ErrorCode::ErrorResultReference
            ));
        }

        let Some(target) = self.position(call_id) else {
            return Err(raise_error!(
                format!(
                    "Call not declared yet: callId=\"{}\" must be added with call() before referencing its arguments",
                    call_id
                ),
                ErrorCode::UndeclaredCallId
            ));
        };

        match self.position(result_of) {
            None => {
                return Err(raise_error!(
                    format!(
                        "Unknown dependency: callId=\"{}\" references callId=\"{}\", which is not part of this batch",
                        call_id, result_of
                    ),
                    ErrorCode::UnknownResultReference
                ))
            }
            Some(source) if source >= target => {
                return Err(raise_error!(
                    format!(
                        "Unknown dependency: callId=\"{}\" must be declared before callId=\"{}\" to be referenced",
                        result_of, call_id
                    ),
                    ErrorCode::UnknownResultReference
                ))
            }
            Some(_) => {}
        }

        let reference = ResultReference::new(result_of, result_name, path);
        let value = serde_json::to_value(&reference).map_err(|e| {
            raise_error!(
                format!("Failed to serialize result reference {}: {:#?}", reference, e),
                ErrorCode::InternalError
            )
        })?;

        let arguments = self.arguments.get_mut(call_id).ok_or_else(|| {
            raise_error!(
                format!("Argument record of callId=\"{}\" is missing", call_id),
                ErrorCode::InternalError
            )
        })?;
        arguments.remove(arg_key);
        arguments.insert(ResultReference::key_for(arg_key), value);
        Ok(self)
    }

    pub fn with_capability(&mut self, capability: Capability) -> &mut Self {
        self.capabilities.insert(capability);
        self
    }

    /// Emits a snapshot of the batch in registration order.
    pub fn build(&self) -> JmapGateResult<JmapRequest> {
        if self.calls.is_empty() {
            return Err(raise_error!(
                "Empty batch: at least one method call is required".into(),
                ErrorCode::EmptyBatch
            ));
        }

        let mut method_calls = Vec::with_capacity(self.calls.len());
        for (method, call_id) in &self.calls {
            let arguments = self.arguments.get(call_id).cloned().ok_or_else(|| {
                raise_error!(
                    format!("Argument record of callId=\"{}\" is missing", call_id),
                    ErrorCode::InternalError
                )
            })?;
            method_calls.push(Invocation(*method, arguments, call_id.clone()));
        }

        tracing::debug!(
            calls = method_calls.len(),
            account_id = self.account_id.as_deref().unwrap_or("-"),
            "Built JMAP batch"
        );

        Ok(JmapRequest {
            using: self.capabilities.to_vec(),
            method_calls,
        })
    }

    /// One-invocation batch, under call ID `r1` unless one is given.
    pub fn single<A: MethodArguments>(
        account_id: Option<String>,
        args: A,
        call_id: Option<&str>,
    ) -> JmapGateResult<JmapRequest> {
        let mut builder = Self::new(account_id);
        builder.call(args, call_id.unwrap_or(DEFAULT_CALL_ID))?;
        builder.build()
    }

    /// The pagination pattern: `query`, then `get` whose `ids` come from `/ids` of the query.
    pub fn query_then_get<Q: QueryMethod, G: GetMethod>(
        account_id: Option<String>,
        query_args: Q,
        get_args: G,
    ) -> JmapGateResult<JmapRequest> {
        let mut builder = Self::new(account_id);
        builder.extend_query_then_get(query_args, get_args)?;
        builder.build()
    }

    /// Appends the [`query_then_get`](Self::query_then_get) pair to this builder.
    pub fn extend_query_then_get<Q: QueryMethod, G: GetMethod>(
        &mut self,
        query_args: Q,
        get_args: G,
    ) -> JmapGateResult<&mut Self> {
        self.call(query_args, QUERY_CALL_ID)?
            .call(get_args, GET_CALL_ID)?
            .reference(GET_CALL_ID, "ids", QUERY_CALL_ID, Q::METHOD, IDS_PATH)
    }

    fn position(&self, call_id: &str) -> Option<usize> {
        self.calls.iter().position(|(_, id)| id == call_id)
    }
}
