// Copyright © 2025 jmapgate authors
// Licensed under jmapgate License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Mutex;

use serde_json::{json, Value};

use crate::modules::{
    error::JmapGateResult,
    jmap::{
        client::JmapClient, request::JmapRequest, response::JmapResponse, session::JmapSession,
        transport::JmapTransport,
    },
};

type Responder = Box<dyn Fn(&JmapRequest) -> JmapGateResult<JmapResponse> + Send + Sync>;

/// In-process transport that records every batch and answers through `responder`.
pub struct MockTransport {
    responder: Responder,
    requests: Mutex<Vec<JmapRequest>>,
}

impl MockTransport {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&JmapRequest) -> JmapGateResult<JmapResponse> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always answers with the given `methodResponses`.
    pub fn replying(method_responses: Value) -> Self {
        Self::new(move |_| Ok(response(method_responses.clone())))
    }

    /// Answers every call with its own arguments under its own method name.
    pub fn echoing() -> Self {
        Self::new(|request| {
            let entries: Vec<Value> = request
                .method_calls
                .iter()
                .map(|i| json!([i.method(), i.arguments(), i.call_id()]))
                .collect();
            Ok(response(Value::Array(entries)))
        })
    }

    pub fn requests(&self) -> Vec<JmapRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> JmapRequest {
        self.requests().pop().expect("no request was sent")
    }
}

impl JmapTransport for MockTransport {
    async fn send(&self, _session: &JmapSession, request: &JmapRequest) -> JmapGateResult<JmapResponse> {
        self.requests.lock().unwrap().push(request.clone());
        (self.responder)(request)
    }
}

pub fn response(method_responses: Value) -> JmapResponse {
    serde_json::from_value(json!({
        "methodResponses": method_responses,
        "sessionState": "state-1"
    }))
    .unwrap()
}

pub fn session() -> JmapSession {
    JmapSession::new("alice", "acc-1", "Basic YWxpY2U6c2VjcmV0")
}

pub fn client(transport: MockTransport) -> JmapClient<MockTransport> {
    JmapClient::new(transport)
}
