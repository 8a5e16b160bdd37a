// Copyright © 2025 jmapgate authors
// Licensed under jmapgate License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::{
    error::JmapGateResult,
    jmap::{
        args::mailbox::{
            Mailbox, MailboxComparator, MailboxFilterCondition, MailboxGetArgs, MailboxQueryArgs,
            MailboxSortProperty,
        },
        builder::{GET_CALL_ID, QUERY_CALL_ID},
        client::JmapClient,
        session::JmapSession,
        transport::JmapTransport,
    },
};

/// Lists mailboxes in display order, optionally only those with `role`
/// (e.g. `inbox`, `trash`).
pub async fn list_mailboxes<T: JmapTransport>(
    client: &JmapClient<T>,
    session: &JmapSession,
    role: Option<String>,
) -> JmapGateResult<Vec<Mailbox>> {
    let query = MailboxQueryArgs {
        filter: role
            .filter(|role| !role.trim().is_empty())
            .map(|role| MailboxFilterCondition {
                role: Some(role),
                ..Default::default()
            }),
        sort: Some(vec![
            MailboxComparator {
                property: MailboxSortProperty::SortOrder,
                is_ascending: Some(true),
            },
            MailboxComparator {
                property: MailboxSortProperty::Name,
                is_ascending: Some(true),
            },
        ]),
        ..Default::default()
    };

    let parsed = client
        .execute(session, |builder| {
            builder.extend_query_then_get(query, MailboxGetArgs::default())?;
            Ok(())
        })
        .await?;

    let ids = parsed.unwrap_as::<MailboxQueryArgs>(QUERY_CALL_ID)?.ids;
    let mut mailboxes = parsed.unwrap_as::<MailboxGetArgs>(GET_CALL_ID)?.list;
    // Mailbox/get does not preserve query order.
    mailboxes.sort_by_key(|mailbox| {
        ids.iter()
            .position(|id| id == &mailbox.id)
            .unwrap_or(usize::MAX)
    });
    Ok(mailboxes)
}
