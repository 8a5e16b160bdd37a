// Copyright © 2025 jmapgate authors
// Licensed under jmapgate License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use poem_openapi::param::{Path, Query};
use poem_openapi::payload::Json;
use poem_openapi::OpenApi;

use crate::modules::email::changes::get_email_changes;
use crate::modules::email::delete::{destroy_emails, DeleteEmailRequest};
use crate::modules::email::flag::{
    mark_as_read, mark_as_unread, set_flags, toggle_flagged, EmailIdsRequest, SetFlagsRequest,
};
use crate::modules::email::get::get_email;
use crate::modules::email::list::{list_emails, EmailFetchOptions, EmailList, EmailListQuery};
use crate::modules::email::mv::{move_emails, trash_emails, MoveEmailRequest, TrashEmailRequest};
use crate::modules::email::parse::{parse_emails, ParseEmailRequest};
use crate::modules::email::send::{send_email, SendEmailRequest, SendEmailResult};
use crate::modules::error::code::ErrorCode;
use crate::modules::jmap::args::email::{
    EmailChangesResponse, EmailObject, EmailParseResponse, EmailSetResponse,
};
use crate::modules::jmap::client::JmapClient;
use crate::modules::jmap::session::JmapSession;
use crate::modules::rest::api::ApiTags;
use crate::modules::rest::ApiResult;
use crate::raise_error;

pub struct EmailApi;

#[OpenApi(prefix_path = "/api/v1", tag = "ApiTags::Email")]
impl EmailApi {
    /// Lists one page of emails.
    ///
    /// The query and the fetch of the matching emails travel to the JMAP server in a
    /// single batch.
    #[oai(path = "/email", method = "get", operation_id = "list_emails")]
    #[allow(clippy::too_many_arguments)]
    async fn list_emails(
        &self,
        /// Only emails in this mailbox.
        in_mailbox: Query<Option<String>>,
        /// Full-text search.
        text: Query<Option<String>>,
        from: Query<Option<String>>,
        to: Query<Option<String>>,
        subject: Query<Option<String>>,
        /// Only emails carrying this keyword, e.g. `$flagged`.
        has_keyword: Query<Option<String>>,
        has_attachment: Query<Option<bool>>,
        /// Zero-based offset of the page (default 0).
        position: Query<Option<u64>>,
        /// Page size (default 20).
        limit: Query<Option<u64>>,
        /// Also return the total number of matches.
        calculate_total: Query<Option<bool>>,
        collapse_threads: Query<Option<bool>>,
        /// Properties to return; a default listing set when omitted.
        properties: Query<Option<Vec<String>>>,
        fetch_text_body: Query<Option<bool>>,
        fetch_html_body: Query<Option<bool>>,
        max_body_bytes: Query<Option<u64>>,
        session: JmapSession,
    ) -> ApiResult<Json<EmailList>> {
        let query = EmailListQuery {
            in_mailbox: in_mailbox.0,
            text: text.0,
            from: from.0,
            to: to.0,
            subject: subject.0,
            has_keyword: has_keyword.0,
            has_attachment: has_attachment.0,
            position: position.0,
            limit: limit.0,
            calculate_total: calculate_total.0,
            collapse_threads: collapse_threads.0,
        };
        let fetch = EmailFetchOptions {
            properties: properties.0,
            fetch_text_body: fetch_text_body.0,
            fetch_html_body: fetch_html_body.0,
            max_body_bytes: max_body_bytes.0,
        };
        let client = JmapClient::global()?;
        Ok(Json(list_emails(client, &session, &query, &fetch).await?))
    }

    /// Fetches one email, bodies included unless disabled.
    #[oai(path = "/email/:id", method = "get", operation_id = "get_email")]
    async fn get_email(
        &self,
        /// The JMAP ID of the email.
        id: Path<String>,
        properties: Query<Option<Vec<String>>>,
        fetch_text_body: Query<Option<bool>>,
        fetch_html_body: Query<Option<bool>>,
        max_body_bytes: Query<Option<u64>>,
        session: JmapSession,
    ) -> ApiResult<Json<EmailObject>> {
        let fetch = EmailFetchOptions {
            properties: properties.0,
            fetch_text_body: fetch_text_body.0,
            fetch_html_body: fetch_html_body.0,
            max_body_bytes: max_body_bytes.0,
        };
        let client = JmapClient::global()?;
        let email = get_email(client, &session, &id.0, &fetch).await?;
        email.map(Json).ok_or_else(|| {
            raise_error!(
                format!("Email '{}' not found", id.0),
                ErrorCode::ResourceNotFound
            )
            .into()
        })
    }

    /// Returns the IDs of emails created, updated or destroyed since `since_state`.
    #[oai(
        path = "/email/changes/:since_state",
        method = "get",
        operation_id = "get_email_changes"
    )]
    async fn get_email_changes(
        &self,
        /// State string from a previous response.
        since_state: Path<String>,
        /// Upper bound on returned IDs (default 50).
        max_changes: Query<Option<u64>>,
        session: JmapSession,
    ) -> ApiResult<Json<EmailChangesResponse>> {
        let client = JmapClient::global()?;
        Ok(Json(
            get_email_changes(client, &session, &since_state.0, max_changes.0).await?,
        ))
    }

    /// Adds and removes keywords on a set of emails.
    #[oai(path = "/email/flags", method = "patch", operation_id = "set_email_flags")]
    async fn set_flags(
        &self,
        request: Json<SetFlagsRequest>,
        session: JmapSession,
    ) -> ApiResult<Json<EmailSetResponse>> {
        let client = JmapClient::global()?;
        Ok(Json(set_flags(client, &session, &request.0).await?))
    }

    /// Marks emails as read (`$seen`).
    #[oai(path = "/email/read", method = "patch", operation_id = "mark_emails_read")]
    async fn mark_as_read(
        &self,
        request: Json<EmailIdsRequest>,
        session: JmapSession,
    ) -> ApiResult<Json<EmailSetResponse>> {
        let client = JmapClient::global()?;
        Ok(Json(mark_as_read(client, &session, request.0.ids).await?))
    }

    /// Marks emails as unread.
    #[oai(path = "/email/unread", method = "patch", operation_id = "mark_emails_unread")]
    async fn mark_as_unread(
        &self,
        request: Json<EmailIdsRequest>,
        session: JmapSession,
    ) -> ApiResult<Json<EmailSetResponse>> {
        let client = JmapClient::global()?;
        Ok(Json(mark_as_unread(client, &session, request.0.ids).await?))
    }

    /// Sets or clears `$flagged` on one email.
    #[oai(
        path = "/email/:id/flagged",
        method = "patch",
        operation_id = "toggle_email_flagged"
    )]
    async fn toggle_flagged(
        &self,
        id: Path<String>,
        /// `true` flags the email, `false` unflags it (default true).
        flagged: Query<Option<bool>>,
        session: JmapSession,
    ) -> ApiResult<Json<EmailSetResponse>> {
        let client = JmapClient::global()?;
        let flagged = flagged.0.unwrap_or(true);
        Ok(Json(
            toggle_flagged(client, &session, vec![id.0], flagged).await?,
        ))
    }

    /// Moves emails into a mailbox, optionally removing them from their source mailbox.
    #[oai(path = "/email/move", method = "patch", operation_id = "move_emails")]
    async fn move_emails(
        &self,
        request: Json<MoveEmailRequest>,
        session: JmapSession,
    ) -> ApiResult<Json<EmailSetResponse>> {
        let client = JmapClient::global()?;
        Ok(Json(move_emails(client, &session, &request.0).await?))
    }

    /// Moves emails into the trash mailbox. Nothing is destroyed.
    #[oai(path = "/email/trash", method = "delete", operation_id = "trash_emails")]
    async fn trash_emails(
        &self,
        request: Json<TrashEmailRequest>,
        session: JmapSession,
    ) -> ApiResult<Json<EmailSetResponse>> {
        let client = JmapClient::global()?;
        Ok(Json(trash_emails(client, &session, request.0).await?))
    }

    /// Destroys emails permanently.
    #[oai(path = "/email", method = "delete", operation_id = "destroy_emails")]
    async fn destroy_emails(
        &self,
        request: Json<DeleteEmailRequest>,
        session: JmapSession,
    ) -> ApiResult<Json<EmailSetResponse>> {
        let client = JmapClient::global()?;
        Ok(Json(destroy_emails(client, &session, &request.0).await?))
    }

    /// Creates an email and submits it for delivery in one batch.
    ///
    /// The draft keyword is cleared once the submission succeeds.
    #[oai(path = "/email/send", method = "post", operation_id = "send_email")]
    async fn send_email(
        &self,
        request: Json<SendEmailRequest>,
        session: JmapSession,
    ) -> ApiResult<Json<SendEmailResult>> {
        let client = JmapClient::global()?;
        Ok(Json(send_email(client, &session, &request.0).await?))
    }

    /// Parses `message/rfc822` blobs, such as attached `.eml` files, without importing them.
    #[oai(path = "/email/parse", method = "post", operation_id = "parse_emails")]
    async fn parse_emails(
        &self,
        request: Json<ParseEmailRequest>,
        session: JmapSession,
    ) -> ApiResult<Json<EmailParseResponse>> {
        let client = JmapClient::global()?;
        Ok(Json(parse_emails(client, &session, &request.0).await?))
    }
}
