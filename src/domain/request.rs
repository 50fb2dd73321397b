use crate::domain::validation::ValidationError;
use crate::domain::value::MailboxId;

#[derive(Debug, Clone)]
/// Parameters for creating a custom alias.
///
/// The signed suffix is not part of this request; it is resolved from the
/// alias-options endpoint at send time and attached by the client.
pub struct CreateAlias {
    alias_prefix: String,
    mailbox_id: MailboxId,
    name: Option<String>,
    note: Option<String>,
}

impl CreateAlias {
    /// Field name used in validation errors.
    pub const FIELD: &'static str = "alias_prefix";

    /// Create a request with a validated, non-empty alias prefix.
    pub fn new(
        alias_prefix: impl Into<String>,
        mailbox_id: MailboxId,
    ) -> Result<Self, ValidationError> {
        let alias_prefix = alias_prefix.into();
        let trimmed = alias_prefix.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self {
            alias_prefix: trimmed.to_owned(),
            mailbox_id,
            name: None,
            note: None,
        })
    }

    /// Attach a display name to the alias.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Attach a note to the alias.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn alias_prefix(&self) -> &str {
        &self.alias_prefix
    }

    pub fn mailbox_id(&self) -> MailboxId {
        self.mailbox_id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }
}
