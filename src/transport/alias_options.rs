use serde::Deserialize;

use super::TransportError;
use crate::domain::{AliasSuffix, Hostname};

#[derive(Debug, Clone, Deserialize)]
struct SuffixJson {
    suffix: String,
    signed_suffix: String,
}

#[derive(Debug, Clone, Deserialize)]
struct AliasOptionsJsonResponse {
    suffixes: Vec<SuffixJson>,
}

pub fn decode_alias_options_response(json: &str) -> Result<Vec<AliasSuffix>, TransportError> {
    let parsed: AliasOptionsJsonResponse = serde_json::from_str(json)?;
    Ok(parsed
        .suffixes
        .into_iter()
        .map(|suffix| AliasSuffix {
            suffix: suffix.suffix,
            signed_suffix: suffix.signed_suffix,
        })
        .collect())
}

/// Pick the suffix whose value is exactly `@{hostname}`. Subdomain or
/// service-domain suffixes never match.
pub fn find_suffix_for_hostname<'a>(
    suffixes: &'a [AliasSuffix],
    hostname: &Hostname,
) -> Option<&'a AliasSuffix> {
    let wanted = format!("@{}", hostname.as_str());
    suffixes.iter().find(|candidate| candidate.suffix == wanted)
}
