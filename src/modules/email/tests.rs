// Copyright © 2025 jmapgate authors
// Licensed under jmapgate License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use serde_json::json;

use crate::modules::{
    email::{
        changes::get_email_changes,
        delete::{destroy_emails, DeleteEmailRequest},
        flag::{mark_as_read, set_flags, toggle_flagged, SetFlagsRequest},
        get::get_email,
        list::{list_emails, EmailFetchOptions, EmailListQuery},
        mv::{move_emails, trash_emails, MoveEmailRequest, TrashEmailRequest},
        parse::{parse_emails, ParseEmailRequest},
        send::{send_email, SendEmailRequest},
    },
    error::code::ErrorCode,
    jmap::{
        args::email::EmailAddress,
        capability::Capability,
        method::MethodName,
        mock::{self, MockTransport},
    },
};

fn set_ok() -> serde_json::Value {
    json!([["Email/set", {"accountId": "acc-1", "newState": "s2"}, "set"]])
}

fn address(email: &str) -> EmailAddress {
    EmailAddress {
        name: None,
        email: email.into(),
    }
}

fn send_request() -> SendEmailRequest {
    SendEmailRequest {
        from: Some(address("alice@example.com")),
        to: vec![address("bob@example.com")],
        cc: Some(vec![address("carol@example.com")]),
        bcc: Some(vec![address("dave@example.com")]),
        subject: "Hello".into(),
        text_body: Some("Hi Bob".into()),
        html_body: None,
        draft_mailbox_id: Some("mb-drafts".into()),
        sent_mailbox_id: Some("mb-sent".into()),
        identity_id: Some("id-1".into()),
    }
}

#[tokio::test]
async fn list_sends_query_and_get_in_one_batch() {
    let client = mock::client(MockTransport::replying(json!([
        ["Email/query", {"accountId": "acc-1", "queryState": "q1", "ids": ["m1", "m2"], "total": 2}, "query"],
        ["Email/get", {"accountId": "acc-1", "state": "s1", "list": [
            {"id": "m1", "subject": "First"},
            {"id": "m2", "subject": "Second"}
        ]}, "get"]
    ])));

    let result = list_emails(
        &client,
        &mock::session(),
        &EmailListQuery::default(),
        &EmailFetchOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(result.ids, vec!["m1", "m2"]);
    assert_eq!(result.emails.len(), 2);
    assert_eq!(result.emails[1].subject.as_deref(), Some("Second"));
    assert_eq!(result.total, Some(2));

    let request = client.transport().last_request();
    assert_eq!(request.call_ids(), vec!["query", "get"]);
    let query = request.method_calls[0].arguments();
    assert!(!query.contains_key("filter"));
    assert_eq!(query["limit"], json!(20));
    assert_eq!(query["position"], json!(0));
    assert_eq!(query["calculateTotal"], json!(false));
    assert_eq!(query["collapseThreads"], json!(false));
    assert_eq!(query["accountId"], json!("acc-1"));

    let get = request.method_calls[1].arguments();
    assert_eq!(
        get["properties"],
        json!(["id", "subject", "from", "to", "receivedAt", "preview", "hasAttachment", "keywords"])
    );
    assert_eq!(get["fetchTextBodyValues"], json!(false));
    assert_eq!(get["fetchHTMLBodyValues"], json!(false));
    assert_eq!(
        get["#ids"],
        json!({"resultOf": "query", "name": "Email/query", "path": "/ids"})
    );
}

#[tokio::test]
async fn list_builds_filter_from_criteria() {
    let client = mock::client(MockTransport::replying(json!([
        ["Email/query", {"accountId": "acc-1", "queryState": "q1", "ids": []}, "query"],
        ["Email/get", {"accountId": "acc-1", "state": "s1", "list": []}, "get"]
    ])));
    let query = EmailListQuery {
        in_mailbox: Some("mb-inbox".into()),
        has_keyword: Some("$flagged".into()),
        has_attachment: Some(false),
        limit: Some(5),
        ..Default::default()
    };

    let result = list_emails(&client, &mock::session(), &query, &EmailFetchOptions::default())
        .await
        .unwrap();
    assert!(result.ids.is_empty());
    assert_eq!(result.total, None);

    let request = client.transport().last_request();
    assert_eq!(
        request.method_calls[0].arguments()["filter"],
        json!({"inMailbox": "mb-inbox", "hasKeyword": "$flagged", "hasAttachment": false})
    );
    assert_eq!(request.method_calls[0].arguments()["limit"], json!(5));
}

#[tokio::test]
async fn list_rejects_zero_limit_before_sending() {
    let client = mock::client(MockTransport::echoing());
    let query = EmailListQuery {
        limit: Some(0),
        ..Default::default()
    };
    let error = list_emails(&client, &mock::session(), &query, &EmailFetchOptions::default())
        .await
        .err()
        .unwrap();
    assert_eq!(error.code(), ErrorCode::InvalidParameter);
    assert!(client.transport().requests().is_empty());
}

#[tokio::test]
async fn list_surfaces_protocol_errors() {
    let client = mock::client(MockTransport::replying(json!([
        ["error", {"type": "accountNotFound", "description": "no such account"}, "query"],
        ["error", {"type": "invalidResultReference"}, "get"]
    ])));
    let error = list_emails(
        &client,
        &mock::session(),
        &EmailListQuery::default(),
        &EmailFetchOptions::default(),
    )
    .await
    .err()
    .unwrap();
    assert_eq!(error.code(), ErrorCode::ResourceNotFound);
    assert!(error.to_string().contains("callId=\"query\""));
}

#[tokio::test]
async fn get_fetches_bodies_by_default() {
    let client = mock::client(MockTransport::replying(json!([
        ["Email/get", {"accountId": "acc-1", "state": "s1", "list": [{"id": "m1"}], "notFound": []}, "get"]
    ])));
    let email = get_email(&client, &mock::session(), "m1", &EmailFetchOptions::default())
        .await
        .unwrap();
    assert_eq!(email.unwrap().id.as_deref(), Some("m1"));

    let request = client.transport().last_request();
    let args = request.method_calls[0].arguments();
    assert_eq!(args["ids"], json!(["m1"]));
    assert_eq!(args["fetchTextBodyValues"], json!(true));
    assert_eq!(args["fetchHTMLBodyValues"], json!(true));
    assert!(!args.contains_key("properties"));
}

#[tokio::test]
async fn get_returns_none_when_not_found() {
    let client = mock::client(MockTransport::replying(json!([
        ["Email/get", {"accountId": "acc-1", "state": "s1", "list": [], "notFound": ["m9"]}, "get"]
    ])));
    let email = get_email(&client, &mock::session(), "m9", &EmailFetchOptions::default())
        .await
        .unwrap();
    assert!(email.is_none());
}

#[tokio::test]
async fn changes_default_to_fifty() {
    let client = mock::client(MockTransport::replying(json!([
        ["Email/changes", {
            "accountId": "acc-1", "oldState": "s1", "newState": "s2",
            "hasMoreChanges": false, "created": ["m3"], "updated": [], "destroyed": ["m1"]
        }, "changes"]
    ])));
    let changes = get_email_changes(&client, &mock::session(), "s1", None)
        .await
        .unwrap();
    assert_eq!(changes.created, vec!["m3"]);
    assert_eq!(changes.destroyed, vec!["m1"]);

    let request = client.transport().last_request();
    assert_eq!(request.method_calls[0].method(), MethodName::EmailChanges);
    assert_eq!(request.method_calls[0].arguments()["maxChanges"], json!(50));
    assert_eq!(request.method_calls[0].arguments()["sinceState"], json!("s1"));
}

#[tokio::test]
async fn set_flags_patches_every_id() {
    let client = mock::client(MockTransport::replying(set_ok()));
    let request = SetFlagsRequest {
        ids: vec!["m1".into(), "m2".into()],
        add_keywords: Some(vec!["$flagged".into()]),
        remove_keywords: Some(vec!["$seen".into()]),
    };
    let result = set_flags(&client, &mock::session(), &request).await.unwrap();
    assert_eq!(result.new_state, "s2");

    let sent = client.transport().last_request();
    let expected = json!({"keywords/$flagged": true, "keywords/$seen": null});
    assert_eq!(sent.method_calls[0].arguments()["update"]["m1"], expected);
    assert_eq!(sent.method_calls[0].arguments()["update"]["m2"], expected);
}

#[tokio::test]
async fn set_flags_requires_a_keyword() {
    let client = mock::client(MockTransport::replying(set_ok()));
    let request = SetFlagsRequest {
        ids: vec!["m1".into()],
        add_keywords: Some(vec![]),
        remove_keywords: None,
    };
    let error = set_flags(&client, &mock::session(), &request)
        .await
        .err()
        .unwrap();
    assert_eq!(error.code(), ErrorCode::InvalidParameter);
    assert!(client.transport().requests().is_empty());
}

#[tokio::test]
async fn read_and_flag_shortcuts() {
    let client = mock::client(MockTransport::replying(set_ok()));
    mark_as_read(&client, &mock::session(), vec!["m1".into()])
        .await
        .unwrap();
    toggle_flagged(&client, &mock::session(), vec!["m1".into()], false)
        .await
        .unwrap();

    let requests = client.transport().requests();
    assert_eq!(
        requests[0].method_calls[0].arguments()["update"]["m1"],
        json!({"keywords/$seen": true})
    );
    assert_eq!(
        requests[1].method_calls[0].arguments()["update"]["m1"],
        json!({"keywords/$flagged": null})
    );
}

#[tokio::test]
async fn move_and_trash_patch_mailbox_ids() {
    let client = mock::client(MockTransport::replying(set_ok()));
    let request = MoveEmailRequest {
        ids: vec!["m1".into()],
        target_mailbox_id: "mb-archive".into(),
        from_mailbox_id: Some("mb-inbox".into()),
    };
    move_emails(&client, &mock::session(), &request)
        .await
        .unwrap();
    trash_emails(
        &client,
        &mock::session(),
        TrashEmailRequest {
            ids: vec!["m2".into()],
            trash_mailbox_id: "mb-trash".into(),
        },
    )
    .await
    .unwrap();

    let requests = client.transport().requests();
    assert_eq!(
        requests[0].method_calls[0].arguments()["update"]["m1"],
        json!({"mailboxIds/mb-archive": true, "mailboxIds/mb-inbox": null})
    );
    assert_eq!(
        requests[1].method_calls[0].arguments()["update"]["m2"],
        json!({"mailboxIds/mb-trash": true})
    );
}

#[tokio::test]
async fn destroy_sends_ids() {
    let client = mock::client(MockTransport::replying(json!([
        ["Email/set", {"accountId": "acc-1", "newState": "s2", "destroyed": ["m1"]}, "set"]
    ])));
    let result = destroy_emails(
        &client,
        &mock::session(),
        &DeleteEmailRequest {
            ids: vec!["m1".into()],
        },
    )
    .await
    .unwrap();
    assert_eq!(result.destroyed, Some(vec!["m1".to_string()]));
    assert_eq!(
        client.transport().last_request().method_calls[0].arguments()["destroy"],
        json!(["m1"])
    );

    let error = destroy_emails(&client, &mock::session(), &DeleteEmailRequest { ids: vec![] })
        .await
        .err()
        .unwrap();
    assert_eq!(error.code(), ErrorCode::InvalidParameter);
}

#[tokio::test]
async fn send_creates_and_submits_in_one_batch() {
    let client = mock::client(MockTransport::replying(json!([
        ["Email/set", {"accountId": "acc-1", "newState": "s2", "created": {"draft": {"id": "M42"}}}, "emailCreate"],
        ["EmailSubmission/set", {"accountId": "acc-1", "newState": "t1", "created": {"submission": {"id": "S1"}}}, "submission"]
    ])));

    let result = send_email(&client, &mock::session(), &send_request())
        .await
        .unwrap();
    assert_eq!(result.email_id, "M42");

    let request = client.transport().last_request();
    assert!(request.using.contains(&Capability::Submission));
    assert_eq!(request.call_ids(), vec!["emailCreate", "submission"]);

    let draft = &request.method_calls[0].arguments()["create"]["draft"];
    assert_eq!(draft["keywords"], json!({"$draft": true}));
    assert_eq!(draft["mailboxIds"], json!({"mb-sent": true}));
    assert_eq!(draft["bodyValues"], json!({"text": {"value": "Hi Bob"}}));
    assert_eq!(
        draft["textBody"],
        json!([{"partId": "text", "type": "text/plain", "charset": "utf-8"}])
    );
    assert!(draft.get("htmlBody").is_none());

    let submission = &request.method_calls[1].arguments()["create"]["submission"];
    assert_eq!(submission["identityId"], json!("id-1"));
    assert_eq!(submission["emailId"], json!("#draft"));
    assert_eq!(
        submission["envelope"]["rcptTo"],
        json!([
            {"email": "bob@example.com"},
            {"email": "carol@example.com"},
            {"email": "dave@example.com"}
        ])
    );
    assert_eq!(
        submission["envelope"]["mailFrom"],
        json!({"email": "alice@example.com"})
    );
}

#[tokio::test]
async fn send_reports_not_created() {
    let client = mock::client(MockTransport::replying(json!([
        ["Email/set", {
            "accountId": "acc-1", "newState": "s2",
            "notCreated": {"draft": {"type": "invalidProperties", "properties": ["to"]}}
        }, "emailCreate"],
        ["error", {"type": "invalidResultReference"}, "submission"]
    ])));

    let error = send_email(&client, &mock::session(), &send_request())
        .await
        .err()
        .unwrap();
    assert_eq!(error.code(), ErrorCode::InvalidParameter);
    assert!(error.to_string().contains("notCreated"));
    assert!(error.to_string().contains("invalidProperties"));
}

#[tokio::test]
async fn send_surfaces_submission_failure() {
    let client = mock::client(MockTransport::replying(json!([
        ["Email/set", {"accountId": "acc-1", "newState": "s2", "created": {"draft": {"id": "M42"}}}, "emailCreate"],
        ["error", {"type": "forbidden", "description": "sending disabled"}, "submission"]
    ])));

    let error = send_email(&client, &mock::session(), &send_request())
        .await
        .err()
        .unwrap();
    assert_eq!(error.code(), ErrorCode::Forbidden);
    assert!(error.to_string().contains("sending disabled"));
}

#[tokio::test]
async fn send_reports_rejected_submission() {
    let client = mock::client(MockTransport::replying(json!([
        ["Email/set", {"accountId": "acc-1", "newState": "s2", "created": {"draft": {"id": "M42"}}}, "emailCreate"],
        ["EmailSubmission/set", {"accountId": "acc-1", "newState": "t1", "notCreated": {"submission": {"type": "forbiddenFrom"}}}, "submission"]
    ])));

    let error = send_email(&client, &mock::session(), &send_request())
        .await
        .err()
        .unwrap();
    assert_eq!(error.code(), ErrorCode::Forbidden);
    assert!(error.to_string().contains("notCreated"));
    assert!(error.to_string().contains("forbiddenFrom"));
    assert!(error.to_string().contains("M42"));
}

#[tokio::test]
async fn send_reads_submission_past_implicit_email_set() {
    let client = mock::client(MockTransport::replying(json!([
        ["Email/set", {"accountId": "acc-1", "newState": "s2", "created": {"draft": {"id": "M42"}}}, "emailCreate"],
        ["EmailSubmission/set", {"accountId": "acc-1", "newState": "t1", "notCreated": {"submission": {"type": "invalidEmail"}}}, "submission"],
        ["Email/set", {"accountId": "acc-1", "newState": "s3", "updated": {"M42": null}}, "submission"]
    ])));

    let error = send_email(&client, &mock::session(), &send_request())
        .await
        .err()
        .unwrap();
    assert_eq!(error.code(), ErrorCode::InvalidParameter);
    assert!(error.to_string().contains("invalidEmail"));

    let client = mock::client(MockTransport::replying(json!([
        ["Email/set", {"accountId": "acc-1", "newState": "s2", "created": {"draft": {"id": "M42"}}}, "emailCreate"],
        ["EmailSubmission/set", {"accountId": "acc-1", "newState": "t1", "created": {"submission": {"id": "S1"}}}, "submission"],
        ["Email/set", {"accountId": "acc-1", "newState": "s3", "updated": {"M42": null}}, "submission"]
    ])));
    let result = send_email(&client, &mock::session(), &send_request())
        .await
        .unwrap();
    assert_eq!(result.email_id, "M42");
}

#[tokio::test]
async fn send_validates_before_sending() {
    let client = mock::client(MockTransport::echoing());

    let mut no_body = send_request();
    no_body.text_body = None;
    let mut no_recipient = send_request();
    no_recipient.to.clear();
    let mut bad_address = send_request();
    bad_address.bcc = Some(vec![address("not-an-address")]);

    for request in [no_body, no_recipient, bad_address] {
        let error = send_email(&client, &mock::session(), &request)
            .await
            .err()
            .unwrap();
        assert_eq!(error.code(), ErrorCode::InvalidParameter);
    }
    assert!(client.transport().requests().is_empty());
}

#[tokio::test]
async fn parse_fetches_bodies_with_default_properties() {
    let client = mock::client(MockTransport::replying(json!([
        ["Email/parse", {"accountId": "acc-1", "parsed": {"b1": {"subject": "Attached"}}}, "parse"]
    ])));
    let result = parse_emails(
        &client,
        &mock::session(),
        &ParseEmailRequest {
            blob_ids: vec!["b1".into()],
            properties: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(
        result.parsed.unwrap()["b1"].subject.as_deref(),
        Some("Attached")
    );

    let args = client.transport().last_request().method_calls[0]
        .arguments()
        .clone();
    assert_eq!(args["blobIds"], json!(["b1"]));
    assert_eq!(
        args["properties"],
        json!(["id", "subject", "from", "to", "textBody", "htmlBody"])
    );
    assert_eq!(args["fetchTextBodyValues"], json!(true));
    assert_eq!(args["fetchHTMLBodyValues"], json!(true));
}
