// Copyright © 2025 jmapgate authors
// Licensed under jmapgate License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashMap;

use poem_openapi::Object;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;

use crate::{
    modules::{
        common::validator::is_valid_email,
        error::{code::ErrorCode, JmapGateResult},
        jmap::{
            args::{
                email::{
                    EmailAddress, EmailBodyPart, EmailBodyValue, EmailCreate, EmailSetArgs,
                    KEYWORD_DRAFT,
                },
                submission::{
                    EmailSubmissionCreate, EmailSubmissionSetArgs, Envelope, SubmissionAddress,
                },
                PatchObject,
            },
            capability::Capability,
            client::JmapClient,
            reference::ResultReference,
            session::JmapSession,
            transport::JmapTransport,
        },
    },
    raise_error,
};

pub const EMAIL_CREATE_CALL_ID: &str = "emailCreate";
pub const SUBMISSION_CALL_ID: &str = "submission";
pub const DRAFT_CREATION_ID: &str = "draft";
pub const SUBMISSION_CREATION_ID: &str = "submission";
const TEXT_PART_ID: &str = "text";
const HTML_PART_ID: &str = "html";

#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize, Object)]
pub struct SendEmailRequest {
    /// Sender shown in the `From` header and used as envelope sender.
    pub from: Option<EmailAddress>,
    pub to: Vec<EmailAddress>,
    pub cc: Option<Vec<EmailAddress>>,
    pub bcc: Option<Vec<EmailAddress>>,
    pub subject: String,
    /// Plain-text body.
    pub text_body: Option<String>,
    /// HTML body.
    pub html_body: Option<String>,
    /// Drafts mailbox the message is stored in before sending.
    pub draft_mailbox_id: Option<String>,
    /// Sent mailbox the message is filed in. Takes precedence over the drafts mailbox.
    pub sent_mailbox_id: Option<String>,
    /// Sending identity.
    pub identity_id: Option<String>,
}

#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize, Object)]
pub struct SendEmailResult {
    /// Server ID of the created email.
    pub email_id: String,
}

impl SendEmailRequest {
    pub fn validate(&self) -> JmapGateResult<()> {
        if self.text_body.is_none() && self.html_body.is_none() {
            return Err(raise_error!(
                "At least one body (textBody or htmlBody) is required".into(),
                ErrorCode::InvalidParameter
            ));
        }
        if self.to.is_empty() {
            return Err(raise_error!(
                "At least one recipient is required".into(),
                ErrorCode::InvalidParameter
            ));
        }
        for address in self.from.iter().chain(self.recipients()) {
            if !is_valid_email(&address.email) {
                return Err(raise_error!(
                    format!("Invalid email address: '{}'", address.email),
                    ErrorCode::InvalidParameter
                ));
            }
        }
        Ok(())
    }

    fn recipients(&self) -> impl Iterator<Item = &EmailAddress> {
        self.to
            .iter()
            .chain(self.cc.iter().flatten())
            .chain(self.bcc.iter().flatten())
    }

    fn draft(&self) -> EmailCreate {
        let mut body_values = HashMap::new();
        let mut text_body = Vec::new();
        let mut html_body = Vec::new();

        if let Some(text) = &self.text_body {
            body_values.insert(TEXT_PART_ID.to_string(), body_value(text));
            text_body.push(EmailBodyPart::inline(TEXT_PART_ID, "text/plain"));
        }
        if let Some(html) = &self.html_body {
            body_values.insert(HTML_PART_ID.to_string(), body_value(html));
            html_body.push(EmailBodyPart::inline(HTML_PART_ID, "text/html"));
        }

        let mailbox_ids: HashMap<String, bool> = self
            .sent_mailbox_id
            .as_ref()
            .or(self.draft_mailbox_id.as_ref())
            .map(|id| (id.clone(), true))
            .into_iter()
            .collect();

        EmailCreate {
            mailbox_ids: Some(mailbox_ids),
            keywords: Some(HashMap::from([(KEYWORD_DRAFT.to_string(), true)])),
            from: self.from.clone().map(|from| vec![from]),
            to: Some(self.to.clone()),
            cc: self.cc.clone(),
            bcc: self.bcc.clone(),
            subject: Some(self.subject.clone()),
            body_values: Some(body_values),
            text_body: (!text_body.is_empty()).then_some(text_body),
            html_body: (!html_body.is_empty()).then_some(html_body),
            ..Default::default()
        }
    }

    fn submission(&self) -> EmailSubmissionSetArgs {
        let envelope = Envelope {
            mail_from: SubmissionAddress::new(
                self.from
                    .as_ref()
                    .map(|from| from.email.clone())
                    .unwrap_or_default(),
            ),
            rcpt_to: self
                .recipients()
                .map(|address| SubmissionAddress::new(address.email.clone()))
                .collect(),
        };

        let create = EmailSubmissionCreate {
            identity_id: self.identity_id.clone().unwrap_or_default(),
            // Creation-id reference, resolved by the server to the draft created above.
            email_id: Some(ResultReference::key_for(DRAFT_CREATION_ID)),
            envelope: Some(envelope),
            send_at: None,
        };

        let mut clear_draft = PatchObject::new();
        clear_draft.insert(format!("keywords/{}", KEYWORD_DRAFT), Value::Null);

        EmailSubmissionSetArgs {
            create: Some(HashMap::from([(SUBMISSION_CREATION_ID.to_string(), create)])),
            on_success_update_email: Some(HashMap::from([(
                ResultReference::key_for(SUBMISSION_CREATION_ID),
                clear_draft,
            )])),
            ..Default::default()
        }
    }
}

fn body_value(value: &str) -> EmailBodyValue {
    EmailBodyValue {
        value: value.to_string(),
        is_encoding_problem: None,
        is_truncated: None,
    }
}

/// Creates the draft and submits it in one batch.
pub async fn send_email<T: JmapTransport>(
    client: &JmapClient<T>,
    session: &JmapSession,
    request: &SendEmailRequest,
) -> JmapGateResult<SendEmailResult> {
    request.validate()?;

    let create = EmailSetArgs {
        create: Some(HashMap::from([(DRAFT_CREATION_ID.to_string(), request.draft())])),
        ..Default::default()
    };
    let submission = request.submission();

    let parsed = client
        .execute(session, |builder| {
            builder
                .with_capability(Capability::Submission)
                .call(create, EMAIL_CREATE_CALL_ID)?
                .call(submission, SUBMISSION_CALL_ID)?;
            Ok(())
        })
        .await?;

    let created = parsed.unwrap_as::<EmailSetArgs>(EMAIL_CREATE_CALL_ID)?;
    let email_id = created
        .created
        .as_ref()
        .and_then(|created| created.get(DRAFT_CREATION_ID))
        .and_then(|email| email.id.clone());

    let Some(email_id) = email_id else {
        error!(
            call_id = EMAIL_CREATE_CALL_ID,
            "Email/set succeeded but returned no id for the draft"
        );
        let not_created = serde_json::to_string(&created.not_created).unwrap_or_default();
        return Err(raise_error!(
            format!("Failed to create email: notCreated={}", not_created),
            ErrorCode::InvalidParameter
        ));
    };

    // Read through the EmailSubmission/set entry: the implicit Email/set answering
    // onSuccessUpdateEmail reuses the same call ID.
    let submitted = parsed.unwrap_as::<EmailSubmissionSetArgs>(SUBMISSION_CALL_ID)?;
    if let Some(rejected) = submitted
        .not_created
        .as_ref()
        .and_then(|not_created| not_created.get(SUBMISSION_CREATION_ID))
    {
        error!(
            call_id = SUBMISSION_CALL_ID,
            email_id = %email_id,
            error_type = %rejected.error_type,
            "EmailSubmission/set rejected the submission"
        );
        let not_created = serde_json::to_string(&submitted.not_created).unwrap_or_default();
        let code = if rejected.error_type.starts_with("forbidden") {
            ErrorCode::Forbidden
        } else {
            ErrorCode::InvalidParameter
        };
        return Err(raise_error!(
            format!(
                "Email {} was created but not submitted: notCreated={}",
                email_id, not_created
            ),
            code
        ));
    }

    Ok(SendEmailResult { email_id })
}
