// Copyright © 2025 jmapgate authors
// Licensed under jmapgate License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::{sync::OnceLock, time::Instant};

use serde_json::{Map, Value};

use crate::{
    modules::{
        context::Initialize,
        error::{code::ErrorCode, JmapGateResult},
        jmap::{
            args::{core::CoreEchoArgs, MethodArguments},
            builder::{JmapRequestBuilder, DEFAULT_CALL_ID},
            parser::{JmapResponseParser, ParsedResponse},
            request::JmapRequest,
            session::JmapSession,
            transport::{HttpTransport, JmapTransport},
        },
    },
    raise_error, utc_now,
};

static JMAP_CLIENT: OnceLock<JmapClient<HttpTransport>> = OnceLock::new();

/// Build, send and parse one batch per operation.
pub struct JmapClient<T: JmapTransport> {
    transport: T,
    parser: JmapResponseParser,
}

impl<T: JmapTransport> JmapClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            parser: JmapResponseParser,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Lets `fill` populate a builder bound to the session's account, then sends the
    /// batch.
    pub async fn execute<F>(&self, session: &JmapSession, fill: F) -> JmapGateResult<ParsedResponse>
    where
        F: FnOnce(&mut JmapRequestBuilder) -> JmapGateResult<()>,
    {
        let mut builder = JmapRequestBuilder::new(Some(session.account_id.clone()));
        fill(&mut builder)?;
        let request = builder.build()?;
        self.send(session, &request).await
    }

    pub async fn send(
        &self,
        session: &JmapSession,
        request: &JmapRequest,
    ) -> JmapGateResult<ParsedResponse> {
        let started = Instant::now();
        let response = self.transport.send(session, request).await?;
        tracing::debug!(
            user_id = %session.user_id,
            calls = request.method_calls.len(),
            responses = response.method_responses.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "JMAP batch completed"
        );
        Ok(self.parser.parse(response))
    }

    pub async fn call<A: MethodArguments>(
        &self,
        session: &JmapSession,
        args: A,
        call_id: &str,
    ) -> JmapGateResult<ParsedResponse> {
        let request =
            JmapRequestBuilder::single(Some(session.account_id.clone()), args, Some(call_id))?;
        self.send(session, &request).await
    }

    /// `Core/echo` round trip; fails unless the server returns the arguments unchanged.
    pub async fn echo(&self, session: &JmapSession) -> JmapGateResult<()> {
        let mut payload = Map::new();
        payload.insert("ping".into(), Value::from(utc_now!()));
        let request =
            JmapRequestBuilder::single(None, CoreEchoArgs(payload.clone()), Some(DEFAULT_CALL_ID))?;
        let parsed = self.send(session, &request).await?;
        let echoed = parsed.unwrap_as::<CoreEchoArgs>(DEFAULT_CALL_ID)?;
        if echoed != payload {
            return Err(raise_error!(
                format!("Core/echo returned different arguments: {:?}", echoed),
                ErrorCode::JmapResponseInvalid
            ));
        }
        Ok(())
    }
}

impl JmapClient<HttpTransport> {
    pub fn global() -> JmapGateResult<&'static JmapClient<HttpTransport>> {
        JMAP_CLIENT.get().ok_or_else(|| {
            raise_error!(
                "JMAP client is not initialized".into(),
                ErrorCode::InternalError
            )
        })
    }
}

impl Initialize for JmapClient<HttpTransport> {
    async fn initialize() -> JmapGateResult<()> {
        let transport = HttpTransport::from_settings()?;
        tracing::info!(api_url = %transport.api_url(), "JMAP client ready");
        JMAP_CLIENT.set(JmapClient::new(transport)).map_err(|_| {
            raise_error!(
                "JMAP client already initialized".into(),
                ErrorCode::InternalError
            )
        })
    }
}
