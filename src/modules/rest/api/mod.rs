// Copyright © 2025 jmapgate authors
// Licensed under jmapgate License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use email::EmailApi;
use mailbox::MailboxApi;
use poem_openapi::{OpenApiService, Tags};

use crate::jmapgate_version;

pub mod email;
pub mod mailbox;

#[derive(Tags)]
pub enum ApiTags {
    Email,
    Mailbox,
}

type JmapGateOpenApi = (EmailApi, MailboxApi);

pub fn create_openapi_service() -> OpenApiService<JmapGateOpenApi, ()> {
    OpenApiService::new((EmailApi, MailboxApi), "JmapGateApi", jmapgate_version!())
}
