use serde::Deserialize;

use super::TransportError;
use crate::domain::{Mailbox, MailboxId};

#[derive(Debug, Clone, Deserialize)]
struct MailboxJson {
    id: i64,
    email: String,
}

#[derive(Debug, Clone, Deserialize)]
struct MailboxesJsonResponse {
    mailboxes: Vec<MailboxJson>,
}

pub fn decode_mailboxes_response(json: &str) -> Result<Vec<Mailbox>, TransportError> {
    let parsed: MailboxesJsonResponse = serde_json::from_str(json)?;
    Ok(parsed
        .mailboxes
        .into_iter()
        .map(|mailbox| Mailbox {
            id: MailboxId::new(mailbox.id),
            email: mailbox.email,
        })
        .collect())
}
