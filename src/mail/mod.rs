//! Mail delivery: the outgoing envelope, the [`Mailer`] seam, and the SMTP
//! implementation behind it.

mod smtp;

pub use smtp::{SmtpConfig, SmtpMailer};

use std::future::Future;
use std::pin::Pin;

pub type BoxSendFuture<'a> = Pin<Box<dyn Future<Output = Result<(), MailError>> + Send + 'a>>;

#[derive(Debug, Clone, PartialEq, Eq)]
/// An outgoing message envelope.
///
/// When composed by the bridge, `to`/`cc`/`bcc` hold reverse-alias addresses
/// only; real recipient addresses never appear here.
pub struct Email {
    pub from: String,
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
/// Errors from composing or delivering a message.
pub enum MailError {
    /// An address did not parse as a mailbox.
    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    /// The message could not be assembled.
    #[error("failed to build message: {0}")]
    Build(String),

    /// Connection, authentication, or delivery failure at the relay.
    #[error("smtp failure: {0}")]
    Smtp(String),
}

/// Message delivery seam.
///
/// Implement this to provide alternative backends; the production
/// implementation is [`SmtpMailer`].
pub trait Mailer: Send + Sync {
    /// Deliver one message. A single attempt, no retry.
    fn send<'a>(&'a self, email: &'a Email) -> BoxSendFuture<'a>;
}
