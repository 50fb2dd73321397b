use serde::Deserialize;
use serde_json::json;

use super::TransportError;
use crate::domain::{Alias, AliasId, CreateAlias};

#[derive(Debug, Clone, Deserialize)]
struct AliasJson {
    id: i64,
    email: String,
    enabled: bool,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    note: Option<String>,
}

impl From<AliasJson> for Alias {
    fn from(value: AliasJson) -> Self {
        Self {
            id: AliasId::new(value.id),
            email: value.email,
            enabled: value.enabled,
            name: value.name,
            note: value.note,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ListAliasesJsonResponse {
    aliases: Vec<AliasJson>,
}

pub fn encode_list_aliases_body(query: Option<&str>) -> serde_json::Value {
    match query {
        Some(query) => json!({ "query": query }),
        None => json!({}),
    }
}

pub fn encode_create_alias_body(request: &CreateAlias, signed_suffix: &str) -> serde_json::Value {
    let mut body = json!({
        "alias_prefix": request.alias_prefix(),
        "signed_suffix": signed_suffix,
        "mailbox_ids": [request.mailbox_id().value()],
    });
    if let Some(name) = request.name() {
        body["name"] = name.into();
    }
    if let Some(note) = request.note() {
        body["note"] = note.into();
    }
    body
}

pub fn decode_list_aliases_response(json: &str) -> Result<Vec<Alias>, TransportError> {
    let parsed: ListAliasesJsonResponse = serde_json::from_str(json)?;
    Ok(parsed.aliases.into_iter().map(Alias::from).collect())
}

pub fn decode_alias_response(json: &str) -> Result<Alias, TransportError> {
    let parsed: AliasJson = serde_json::from_str(json)?;
    Ok(parsed.into())
}
