use crate::domain::value::{AliasId, MailboxId};

#[derive(Debug, Clone, PartialEq, Eq)]
/// An alias as returned by the API. Owned by the remote service; this crate
/// only ever reads or creates aliases.
pub struct Alias {
    pub id: AliasId,
    pub email: String,
    pub enabled: bool,
    pub name: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A real inbox that aliases forward to.
pub struct Mailbox {
    pub id: MailboxId,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A suffix offered for custom-alias creation, with the server-issued token
/// proving the domain is authorized.
pub struct AliasSuffix {
    pub suffix: String,
    pub signed_suffix: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A reverse-alias contact for an (alias, recipient) pair.
///
/// `existed` distinguishes a server-side find from a create; either way the
/// reverse alias is the only address that may appear in an outgoing envelope.
pub struct Contact {
    pub id: i64,
    pub contact: String,
    pub reverse_alias: String,
    pub reverse_alias_address: String,
    pub existed: bool,
}
