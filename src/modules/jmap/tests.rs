// Copyright © 2025 jmapgate authors
// Licensed under jmapgate License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use serde_json::{json, Map, Value};

use crate::{
    modules::{
        error::code::ErrorCode,
        jmap::{
            args::{
                core::CoreEchoArgs,
                email::{
                    EmailChangesArgs, EmailFilter, EmailFilterCondition, EmailGetArgs,
                    EmailQueryArgs, EmailQueryResponse,
                },
                mailbox::{MailboxGetArgs, MailboxQueryArgs},
                submission::EmailSubmissionSetArgs,
            },
            builder::JmapRequestBuilder,
            capability::Capability,
            method::MethodName,
            mock::{self, MockTransport},
            parser::JmapResponseParser,
            response::{InvocationResult, JmapResponse, MethodErrorType},
        },
    },
    raise_error,
};

fn get_ids(ids: &[&str]) -> EmailGetArgs {
    EmailGetArgs {
        ids: Some(ids.iter().map(|s| s.to_string()).collect()),
        ..Default::default()
    }
}

fn sample_response() -> JmapResponse {
    mock::response(json!([
        ["Email/query", {"ids": ["a", "b"], "queryState": "s1"}, "q1"],
        ["error", {"type": "accountNotFound"}, "q2"]
    ]))
}

#[test]
fn build_keeps_registration_order_and_injects_account() {
    let mut builder = JmapRequestBuilder::new(Some("acc-1".into()));
    for call_id in ["c", "a", "b"] {
        builder.call(get_ids(&["m1"]), call_id).unwrap();
    }
    let request = builder.build().unwrap();

    assert_eq!(request.call_ids(), vec!["c", "a", "b"]);
    for invocation in &request.method_calls {
        assert_eq!(invocation.method(), MethodName::EmailGet);
        assert_eq!(invocation.arguments()["accountId"], json!("acc-1"));
        assert_eq!(invocation.arguments()["ids"], json!(["m1"]));
    }
}

#[test]
fn account_agnostic_builder_leaves_account_out() {
    let mut builder = JmapRequestBuilder::new(None);
    builder.call(EmailChangesArgs::default(), "changes").unwrap();
    let request = builder.build().unwrap();
    assert!(!request.method_calls[0].arguments().contains_key("accountId"));
}

#[test]
fn explicit_account_id_is_not_overwritten() {
    let mut payload = Map::new();
    payload.insert("accountId".into(), json!("other"));
    let request =
        JmapRequestBuilder::single(Some("acc-1".into()), CoreEchoArgs(payload), None).unwrap();
    assert_eq!(request.method_calls[0].arguments()["accountId"], json!("other"));
    assert_eq!(request.method_calls[0].call_id(), "r1");
}

#[test]
fn duplicate_call_id_fails_and_keeps_first_call() {
    let mut builder = JmapRequestBuilder::new(Some("acc-1".into()));
    builder.call(get_ids(&["m1"]), "x").unwrap();

    let error = builder
        .call(EmailQueryArgs::default(), "x")
        .err()
        .unwrap();
    assert_eq!(error.code(), ErrorCode::DuplicateCallId);
    assert!(error.to_string().contains("\"x\""));

    let request = builder.build().unwrap();
    assert_eq!(request.method_calls.len(), 1);
    assert_eq!(request.method_calls[0].method(), MethodName::EmailGet);
    assert_eq!(request.method_calls[0].arguments()["ids"], json!(["m1"]));
}

#[test]
fn reference_to_unregistered_result_fails() {
    // Referencing call registered.
    let mut builder = JmapRequestBuilder::new(Some("acc-1".into()));
    builder.call(get_ids(&[]), "get").unwrap();
    let error = builder
        .reference("get", "ids", "query", MethodName::EmailQuery, "/ids")
        .err()
        .unwrap();
    assert_eq!(error.code(), ErrorCode::UnknownResultReference);

    // Referencing call missing too.
    let mut builder = JmapRequestBuilder::new(Some("acc-1".into()));
    let error = builder
        .reference("get", "ids", "query", MethodName::EmailQuery, "/ids")
        .err()
        .unwrap();
    assert_eq!(error.code(), ErrorCode::UndeclaredCallId);
}

#[test]
fn reference_to_undeclared_call_fails() {
    let mut builder = JmapRequestBuilder::new(Some("acc-1".into()));
    builder.call(EmailQueryArgs::default(), "query").unwrap();
    let error = builder
        .reference("get", "ids", "query", MethodName::EmailQuery, "/ids")
        .err()
        .unwrap();
    assert_eq!(error.code(), ErrorCode::UndeclaredCallId);
    assert!(error.to_string().contains("Call not declared yet"));
}

#[test]
fn reference_to_error_sentinel_fails_without_mutation() {
    let mut builder = JmapRequestBuilder::new(Some("acc-1".into()));
    builder
        .call(EmailQueryArgs::default(), "query")
        .unwrap()
        .call(get_ids(&["literal"]), "get")
        .unwrap();
    let before = builder.build().unwrap();

    let error = builder
        .reference("get", "ids", "query", MethodName::Error, "/ids")
        .err()
        .unwrap();
    assert_eq!(error.code(), ErrorCode::ErrorResultReference);

    // Sentinel is rejected even when nothing is declared.
    let error = JmapRequestBuilder::new(None)
        .reference("nope", "ids", "nothing", MethodName::Error, "/ids")
        .err()
        .unwrap();
    assert_eq!(error.code(), ErrorCode::ErrorResultReference);

    assert_eq!(builder.build().unwrap(), before);
}

#[test]
fn reference_rewrites_literal_key() {
    let mut builder = JmapRequestBuilder::new(Some("acc-1".into()));
    builder
        .call(EmailQueryArgs::default(), "query")
        .unwrap()
        .call(get_ids(&["literal"]), "get")
        .unwrap()
        .reference("get", "ids", "query", MethodName::EmailQuery, "/ids")
        .unwrap();

    let request = builder.build().unwrap();
    let get = request.invocation("get").unwrap().arguments();
    assert_eq!(
        get["#ids"],
        json!({"resultOf": "query", "name": "Email/query", "path": "/ids"})
    );
    assert!(!get.contains_key("ids"));
}

#[test]
fn referenced_call_must_precede_referencing_call() {
    let mut builder = JmapRequestBuilder::new(Some("acc-1".into()));
    builder
        .call(get_ids(&[]), "get")
        .unwrap()
        .call(EmailQueryArgs::default(), "query")
        .unwrap();
    let before = builder.build().unwrap();

    let error = builder
        .reference("get", "ids", "query", MethodName::EmailQuery, "/ids")
        .err()
        .unwrap();
    assert_eq!(error.code(), ErrorCode::UnknownResultReference);

    let error = builder
        .reference("get", "ids", "get", MethodName::EmailGet, "/list")
        .err()
        .unwrap();
    assert_eq!(error.code(), ErrorCode::UnknownResultReference);

    assert_eq!(builder.build().unwrap(), before);
}

#[test]
fn references_never_point_forward_in_built_batch() {
    let request = JmapRequestBuilder::query_then_get(
        Some("acc-1".into()),
        EmailQueryArgs::default(),
        EmailGetArgs::default(),
    )
    .unwrap();

    for (position, invocation) in request.method_calls.iter().enumerate() {
        for (key, value) in invocation.arguments() {
            if !key.starts_with('#') {
                continue;
            }
            let result_of = value["resultOf"].as_str().unwrap();
            let source = request
                .method_calls
                .iter()
                .position(|i| i.call_id() == result_of)
                .unwrap();
            assert!(source < position);
        }
    }
}

#[test]
fn same_reference_may_feed_several_calls() {
    let mut builder = JmapRequestBuilder::new(Some("acc-1".into()));
    builder
        .call(EmailQueryArgs::default(), "query")
        .unwrap()
        .call(EmailGetArgs::default(), "get1")
        .unwrap()
        .call(EmailGetArgs::default(), "get2")
        .unwrap()
        .reference("get1", "ids", "query", MethodName::EmailQuery, "/ids")
        .unwrap()
        .reference("get2", "ids", "query", MethodName::EmailQuery, "/ids")
        .unwrap();

    let request = builder.build().unwrap();
    assert_eq!(
        request.invocation("get1").unwrap().arguments()["#ids"],
        request.invocation("get2").unwrap().arguments()["#ids"]
    );
}

#[test]
fn empty_batch_fails_regardless_of_capabilities() {
    let mut builder = JmapRequestBuilder::new(Some("acc-1".into()));
    builder
        .with_capability(Capability::Submission)
        .with_capability(Capability::Quota);
    let error = builder.build().err().unwrap();
    assert_eq!(error.code(), ErrorCode::EmptyBatch);
}

#[test]
fn built_request_is_a_snapshot() {
    let mut builder = JmapRequestBuilder::new(Some("acc-1".into()));
    builder
        .call(EmailQueryArgs::default(), "query")
        .unwrap()
        .call(get_ids(&["literal"]), "get")
        .unwrap();
    let first = builder.build().unwrap();

    builder
        .reference("get", "ids", "query", MethodName::EmailQuery, "/ids")
        .unwrap()
        .call(EmailChangesArgs::default(), "changes")
        .unwrap();

    assert_eq!(first.method_calls.len(), 2);
    assert_eq!(
        first.invocation("get").unwrap().arguments()["ids"],
        json!(["literal"])
    );
    assert_eq!(builder.build().unwrap().method_calls.len(), 3);
}

#[test]
fn capabilities_are_declared_once_in_insertion_order() {
    let mut builder = JmapRequestBuilder::new(Some("acc-1".into()));
    builder
        .with_capability(Capability::Mail)
        .with_capability(Capability::Quota)
        .call(EmailSubmissionSetArgs::default(), "submission")
        .unwrap();
    builder.with_capability(Capability::Submission);

    let request = builder.build().unwrap();
    assert_eq!(
        request.using,
        vec![
            Capability::Core,
            Capability::Mail,
            Capability::Quota,
            Capability::Submission
        ]
    );
}

#[test]
fn request_serializes_to_jmap_wire_format() {
    let request = JmapRequestBuilder::single(
        Some("acc-1".into()),
        EmailChangesArgs {
            since_state: "s0".into(),
            max_changes: Some(50),
        },
        Some("changes"),
    )
    .unwrap();

    assert_eq!(
        serde_json::to_value(&request).unwrap(),
        json!({
            "using": ["urn:ietf:params:jmap:core", "urn:ietf:params:jmap:mail"],
            "methodCalls": [
                ["Email/changes", {"accountId": "acc-1", "sinceState": "s0", "maxChanges": 50}, "changes"]
            ]
        })
    );
}

#[test]
fn query_then_get_links_get_ids_to_query() {
    let query = EmailQueryArgs {
        filter: Some(EmailFilter::Condition(EmailFilterCondition::default())),
        ..Default::default()
    };
    let get = EmailGetArgs {
        properties: Some(vec!["id".into()]),
        ..Default::default()
    };
    let request = JmapRequestBuilder::query_then_get(Some("acc-1".into()), query, get).unwrap();

    assert_eq!(request.call_ids(), vec!["query", "get"]);
    assert_eq!(request.method_calls[0].method(), MethodName::EmailQuery);
    assert_eq!(request.method_calls[0].arguments()["filter"], json!({}));
    let get = request.method_calls[1].arguments();
    assert_eq!(request.method_calls[1].method(), MethodName::EmailGet);
    assert_eq!(get["properties"], json!(["id"]));
    assert_eq!(
        get["#ids"],
        json!({"resultOf": "query", "name": "Email/query", "path": "/ids"})
    );
    assert!(!get.contains_key("ids"));
}

#[test]
fn query_then_get_uses_the_query_method_name() {
    let request = JmapRequestBuilder::query_then_get(
        Some("acc-1".into()),
        MailboxQueryArgs::default(),
        MailboxGetArgs::default(),
    )
    .unwrap();
    assert_eq!(
        request.method_calls[1].arguments()["#ids"]["name"],
        json!("Mailbox/query")
    );
}

#[test]
fn parse_correlates_by_call_id() {
    let parsed = JmapResponseParser.parse(sample_response());

    assert_eq!(
        parsed.get("q1"),
        Some(&InvocationResult::Ok(
            json!({"ids": ["a", "b"], "queryState": "s1"})
        ))
    );
    let q2 = parsed.get("q2").unwrap();
    assert!(!q2.is_ok());
    assert_eq!(
        q2.error().unwrap().error_type,
        MethodErrorType::AccountNotFound
    );
    assert!(q2.error().unwrap().description.is_none());
    assert!(parsed.get("q3").is_none());

    assert_eq!(parsed.session_state(), "state-1");
    assert!(parsed.created_ids().is_empty());
}

#[test]
fn unwrap_translates_protocol_errors() {
    let parsed = JmapResponseParser.parse(sample_response());

    assert_eq!(
        parsed.unwrap("q1").unwrap(),
        &json!({"ids": ["a", "b"], "queryState": "s1"})
    );

    let error = parsed.unwrap("q2").err().unwrap();
    assert_eq!(error.code(), ErrorCode::ResourceNotFound);
    let message = error.to_string();
    assert!(message.contains("q2"));
    assert!(message.contains("accountNotFound"));
}

#[test]
fn unwrap_of_unanswered_call_is_a_correlation_error() {
    let parsed = JmapResponseParser.parse(sample_response());
    let error = parsed.unwrap("missing-id").err().unwrap();
    assert_eq!(error.code(), ErrorCode::InvocationMissing);
    assert!(error.to_string().contains("missing-id"));
}

#[test]
fn error_table_is_fixed() {
    let cases = [
        ("forbidden", ErrorCode::Forbidden),
        ("accountReadOnly", ErrorCode::Forbidden),
        ("accountNotFound", ErrorCode::ResourceNotFound),
        ("invalidArguments", ErrorCode::JmapMethodFailed),
        ("invalidResultReference", ErrorCode::JmapMethodFailed),
        ("unknownMethod", ErrorCode::JmapMethodFailed),
        ("serverUnavailable", ErrorCode::JmapMethodFailed),
        ("serverFail", ErrorCode::JmapMethodFailed),
        ("somethingNew", ErrorCode::JmapMethodFailed),
    ];

    for (error_type, code) in cases {
        let parsed = JmapResponseParser.parse(mock::response(json!([
            ["error", {"type": error_type, "description": "details here"}, "c1"]
        ])));
        let error = parsed.unwrap("c1").err().unwrap();
        assert_eq!(error.code(), code, "{}", error_type);
        assert_eq!(
            error.to_string(),
            format!("JMAP error [{}] on callId=\"c1\": details here", error_type)
        );
    }
}

#[test]
fn error_without_type_is_unrecognized() {
    let parsed = JmapResponseParser.parse(mock::response(json!([["error", {}, "c1"]])));
    let error = parsed.get("c1").unwrap().error().unwrap();
    assert!(matches!(error.error_type, MethodErrorType::Unrecognized(_)));
}

#[test]
fn parse_is_idempotent() {
    let raw = sample_response();
    let first = JmapResponseParser.parse(raw.clone());
    let second = JmapResponseParser.parse(raw);

    assert_eq!(first, second);
    for call_id in ["q1", "q2", "q3"] {
        assert_eq!(first.get(call_id), second.get(call_id));
        assert_eq!(
            first.unwrap(call_id).map_err(|e| e.to_string()),
            second.unwrap(call_id).map_err(|e| e.to_string())
        );
    }
}

#[test]
fn later_entry_wins_for_repeated_call_id() {
    let parsed = JmapResponseParser.parse(mock::response(json!([
        ["Email/set", {"newState": "s1"}, "set"],
        ["Email/get", {"list": []}, "set"]
    ])));
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed.unwrap("set").unwrap(), &json!({"list": []}));
}

#[test]
fn replaced_entry_stays_reachable_by_method() {
    let parsed = JmapResponseParser.parse(mock::response(json!([
        ["EmailSubmission/set", {"accountId": "acc-1", "newState": "s1", "notCreated": {"submission": {"type": "forbiddenFrom"}}}, "submission"],
        ["Email/set", {"accountId": "acc-1", "newState": "s2"}, "submission"]
    ])));

    assert_eq!(
        parsed.get_method("submission", MethodName::EmailSubmissionSet),
        Some(&InvocationResult::Ok(json!({
            "accountId": "acc-1",
            "newState": "s1",
            "notCreated": {"submission": {"type": "forbiddenFrom"}}
        })))
    );
    assert_eq!(
        parsed.unwrap("submission").unwrap()["newState"],
        json!("s2")
    );

    let submission = parsed
        .unwrap_as::<EmailSubmissionSetArgs>("submission")
        .unwrap();
    assert!(submission
        .not_created
        .unwrap()
        .contains_key("submission"));
}

#[test]
fn created_ids_are_exposed() {
    let raw: JmapResponse = serde_json::from_value(json!({
        "methodResponses": [],
        "createdIds": {"draft": "M123"},
        "sessionState": "s9"
    }))
    .unwrap();
    let parsed = JmapResponseParser.parse(raw);
    assert_eq!(parsed.created_id("draft"), Some("M123"));
    assert!(parsed.is_empty());
}

#[test]
fn unwrap_as_decodes_typed_result() {
    let parsed = JmapResponseParser.parse(mock::response(json!([
        ["Email/query", {"accountId": "acc-1", "queryState": "s1", "ids": ["a"], "total": 1}, "query"],
        ["Email/query", {"unexpected": true}, "broken"]
    ])));

    let result: EmailQueryResponse = parsed.unwrap_as::<EmailQueryArgs>("query").unwrap();
    assert_eq!(result.ids, vec!["a".to_string()]);
    assert_eq!(result.total, Some(1));
    assert_eq!(result.position, 0);

    let error = parsed.unwrap_as::<EmailQueryArgs>("broken").err().unwrap();
    assert_eq!(error.code(), ErrorCode::InternalError);
    assert!(error.to_string().contains("broken"));
    assert!(error.to_string().contains("Email/query"));
}

#[test]
fn response_accepts_unknown_method_names() {
    let parsed = JmapResponseParser.parse(mock::response(json!([
        ["Vendor/custom", {"ok": true}, "v1"]
    ])));
    assert!(parsed.get("v1").unwrap().is_ok());
}

#[tokio::test]
async fn execute_binds_session_account_and_sends_once() {
    let transport = MockTransport::echoing();
    let client = mock::client(transport);
    let session = mock::session();

    let parsed = client
        .execute(&session, |builder| {
            builder
                .call(EmailQueryArgs::default(), "query")?
                .call(EmailGetArgs::default(), "get")?
                .reference("get", "ids", "query", MethodName::EmailQuery, "/ids")?;
            Ok(())
        })
        .await
        .unwrap();

    let requests = client.transport().requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].call_ids(), vec!["query", "get"]);
    assert_eq!(
        parsed.unwrap("query").unwrap()["accountId"],
        json!(session.account_id)
    );
}

#[tokio::test]
async fn execute_fails_before_sending_on_construction_error() {
    let client = mock::client(MockTransport::echoing());
    let error = client
        .execute(&mock::session(), |_| Ok(()))
        .await
        .err()
        .unwrap();
    assert_eq!(error.code(), ErrorCode::EmptyBatch);
    assert!(client.transport().requests().is_empty());
}

#[tokio::test]
async fn transport_failure_propagates() {
    let client = mock::client(MockTransport::new(|_| {
        Err(raise_error!(
            "connection refused".into(),
            ErrorCode::NetworkError
        ))
    }));
    let error = client
        .call(&mock::session(), EmailChangesArgs::default(), "changes")
        .await
        .err()
        .unwrap();
    assert_eq!(error.code(), ErrorCode::NetworkError);
}

#[tokio::test]
async fn echo_round_trip() {
    let client = mock::client(MockTransport::echoing());
    client.echo(&mock::session()).await.unwrap();

    let request = client.transport().last_request();
    assert_eq!(request.method_calls[0].method(), MethodName::CoreEcho);
    assert!(!request.method_calls[0]
        .arguments()
        .contains_key("accountId"));
}

#[tokio::test]
async fn echo_detects_mangled_payload() {
    let client = mock::client(MockTransport::replying(json!([
        ["Core/echo", {"ping": "changed"}, "r1"]
    ])));
    let error = client.echo(&mock::session()).await.err().unwrap();
    assert_eq!(error.code(), ErrorCode::JmapResponseInvalid);
}

#[test]
fn method_names_round_trip_through_serde() {
    let value: Value = serde_json::to_value(MethodName::EmailSubmissionSet).unwrap();
    assert_eq!(value, json!("EmailSubmission/set"));
    assert_eq!(
        serde_json::from_value::<MethodName>(json!("error")).unwrap(),
        MethodName::Error
    );
    assert_eq!(
        MethodName::EmailSubmissionSet.capability(),
        Capability::Submission
    );
    assert_eq!(MethodName::MailboxGet.capability(), Capability::Mail);
}

#[test]
fn session_headers_override_service_account() {
    use poem::http::{header::AUTHORIZATION, HeaderMap, HeaderValue};

    use crate::modules::jmap::session::{JmapSession, ACCOUNT_ID_HEADER, USER_ID_HEADER};

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer tok-1"));
    headers.insert(ACCOUNT_ID_HEADER, HeaderValue::from_static("acc-9"));
    headers.insert(USER_ID_HEADER, HeaderValue::from_static("bob"));

    let session = JmapSession::resolve(&headers).unwrap();
    assert_eq!(session, JmapSession::new("bob", "acc-9", "Bearer tok-1"));
}

#[test]
fn session_falls_back_to_service_account() {
    use poem::http::HeaderMap;

    use crate::modules::jmap::session::JmapSession;

    let session = JmapSession::resolve(&HeaderMap::new()).unwrap();
    assert_eq!(session.user_id, "alice");
    assert_eq!(session.account_id, "acc-default");
    assert_eq!(session.authorization, "Basic YWxpY2U6c2VjcmV0");
    assert_eq!(
        JmapSession::basic_authorization("alice", "secret"),
        session.authorization
    );
}
