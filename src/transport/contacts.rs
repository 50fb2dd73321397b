use serde::Deserialize;
use serde_json::json;

use super::TransportError;
use crate::domain::{Contact, EmailAddress};

#[derive(Debug, Clone, Deserialize)]
struct ContactJsonResponse {
    id: i64,
    contact: String,
    reverse_alias: String,
    reverse_alias_address: String,
    #[serde(default)]
    existed: bool,
}

/// The API expects the recipient in RFC 5322 angle-bracket form.
pub fn encode_contact_body(email: &EmailAddress) -> serde_json::Value {
    json!({ "contact": format!("<{}>", email.as_str()) })
}

pub fn decode_contact_response(json: &str) -> Result<Contact, TransportError> {
    let parsed: ContactJsonResponse = serde_json::from_str(json)?;
    Ok(Contact {
        id: parsed.id,
        contact: parsed.contact,
        reverse_alias: parsed.reverse_alias,
        reverse_alias_address: parsed.reverse_alias_address,
        existed: parsed.existed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_body_wraps_address_in_angle_brackets() {
        let email = EmailAddress::new("friend@gmail.com").unwrap();
        assert_eq!(
            encode_contact_body(&email),
            json!({ "contact": "<friend@gmail.com>" })
        );
    }

    #[test]
    fn decode_maps_reverse_alias_and_existed_flag() {
        let json = r#"
        {
          "id": 7,
          "contact": "friend@gmail.com",
          "creation_date": "2024-01-01 00:00:00+00:00",
          "creation_timestamp": 1704067200,
          "last_email_sent_date": null,
          "last_email_sent_timestamp": null,
          "reverse_alias": "friend at gmail.com <ra+abcdef@sl.example.com>",
          "reverse_alias_address": "ra+abcdef@sl.example.com",
          "existed": true
        }
        "#;

        let contact = decode_contact_response(json).unwrap();
        assert_eq!(contact.id, 7);
        assert_eq!(contact.contact, "friend@gmail.com");
        assert_eq!(contact.reverse_alias_address, "ra+abcdef@sl.example.com");
        assert!(contact.existed);
    }

    #[test]
    fn existed_defaults_to_false_when_absent() {
        let json = r#"
        {
          "id": 8,
          "contact": "other@gmail.com",
          "reverse_alias": "other at gmail.com <ra+ghijk@sl.example.com>",
          "reverse_alias_address": "ra+ghijk@sl.example.com"
        }
        "#;

        let contact = decode_contact_response(json).unwrap();
        assert!(!contact.existed);
    }
}
