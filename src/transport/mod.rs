//! Transport layer: wire-format details of the SimpleLogin API
//! (JSON body construction and response deserialization).

mod alias_options;
mod aliases;
mod contacts;
mod mailboxes;

pub use alias_options::{decode_alias_options_response, find_suffix_for_hostname};
pub use aliases::{
    decode_alias_response, decode_list_aliases_response, encode_create_alias_body,
    encode_list_aliases_body,
};
pub use contacts::{decode_contact_response, encode_contact_body};
pub use mailboxes::decode_mailboxes_response;

use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct ErrorJson {
    error: String,
}

/// Extract the server's human-readable `error` field from a failure body,
/// if the body is JSON and carries one.
pub fn decode_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorJson>(body)
        .ok()
        .map(|parsed| parsed.error)
}
