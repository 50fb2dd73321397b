//! SimpleLogin email-relay bridge.
//!
//! Send email on behalf of a phone number without exposing it: each number
//! gets its own SimpleLogin alias, each recipient a reverse alias, and the
//! composed message goes out through a configured SMTP relay. The crate is
//! layered as a domain layer of strong types, a transport layer for
//! wire-format details, a client layer for the SimpleLogin API, and a bridge
//! orchestrating one send end to end.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use slrelay::{
//!     ApiKey, BridgeConfig, EmailAddress, EmailBridge, Hostname, PhoneNumber,
//!     SendEmailRequest, SimpleLoginClient, SmtpConfig, SmtpMailer,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SimpleLoginClient::new(ApiKey::new("...")?);
//!     let mailer = SmtpMailer::new(SmtpConfig::new("smtp.example.com", "user", "pass")?)?;
//!     let config = BridgeConfig::new(
//!         EmailAddress::new("admin@example.com")?,
//!         Hostname::new("example.com")?,
//!     );
//!     let bridge = EmailBridge::new(client, Arc::new(mailer), config);
//!
//!     let request = SendEmailRequest::new(
//!         PhoneNumber::new("+237123456789")?,
//!         EmailAddress::new("friend@gmail.com")?,
//!         "Hello",
//!         "Hi from the bridge",
//!     );
//!     let receipt = bridge.send_email(request).await?;
//!     println!("{}", receipt.message);
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod bridge;
pub mod client;
pub mod domain;
pub mod mail;
mod transport;

pub use bridge::{BridgeConfig, EmailBridge, SendEmailRequest, SendError, SendReceipt};
pub use client::{SimpleLoginClient, SimpleLoginClientBuilder, SimpleLoginError};
pub use domain::{
    Alias, AliasId, AliasSuffix, ApiKey, Contact, CreateAlias, EmailAddress, Hostname, Mailbox,
    MailboxId, PhoneNumber, ValidationError,
};
pub use mail::{Email, MailError, Mailer, SmtpConfig, SmtpMailer};
