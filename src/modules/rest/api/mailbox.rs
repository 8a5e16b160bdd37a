// Copyright © 2025 jmapgate authors
// Licensed under jmapgate License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::jmap::args::mailbox::Mailbox;
use crate::modules::jmap::client::JmapClient;
use crate::modules::jmap::session::JmapSession;
use crate::modules::mailbox::list::list_mailboxes;
use crate::modules::rest::api::ApiTags;
use crate::modules::rest::ApiResult;
use poem_openapi::param::Query;
use poem_openapi::payload::Json;
use poem_openapi::OpenApi;

pub struct MailboxApi;

#[OpenApi(prefix_path = "/api/v1", tag = "ApiTags::Mailbox")]
impl MailboxApi {
    /// Returns the mailboxes of the account ordered by `sortOrder`, then name.
    #[oai(path = "/mailbox", method = "get", operation_id = "list_mailboxes")]
    async fn list_mailboxes(
        &self,
        /// Only mailboxes with this role, e.g. `inbox`, `sent` or `trash`.
        role: Query<Option<String>>,
        session: JmapSession,
    ) -> ApiResult<Json<Vec<Mailbox>>> {
        let client = JmapClient::global()?;
        Ok(Json(list_mailboxes(client, &session, role.0).await?))
    }
}
