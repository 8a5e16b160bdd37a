// Copyright © 2025 jmapgate authors
// Licensed under jmapgate License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{capability::Capability, method::MethodName};

/// Argument record of one invocation: literal keys and `#`-prefixed references.
pub type Arguments = Map<String, Value>;

/// `[methodName, arguments, callId]` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invocation(pub MethodName, pub Arguments, pub String);

impl Invocation {
    pub fn method(&self) -> MethodName {
        self.0
    }

    pub fn arguments(&self) -> &Arguments {
        &self.1
    }

    pub fn call_id(&self) -> &str {
        &self.2
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JmapRequest {
    pub using: Vec<Capability>,
    pub method_calls: Vec<Invocation>,
}

impl JmapRequest {
    pub fn invocation(&self, call_id: &str) -> Option<&Invocation> {
        self.method_calls.iter().find(|i| i.call_id() == call_id)
    }

    pub fn call_ids(&self) -> Vec<&str> {
        self.method_calls.iter().map(Invocation::call_id).collect()
    }
}
