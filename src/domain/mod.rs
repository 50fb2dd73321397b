//! Domain layer: strong types with validation and invariants (no I/O).

mod request;
mod response;
mod validation;
mod value;

pub use request::CreateAlias;
pub use response::{Alias, AliasSuffix, Contact, Mailbox};
pub use validation::ValidationError;
pub use value::{AliasId, ApiKey, EmailAddress, Hostname, MailboxId, PhoneNumber};
