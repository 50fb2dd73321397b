use lettre::message::header::ContentType;
use lettre::message::{Mailbox, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

use super::{BoxSendFuture, Email, MailError, Mailer};
use crate::domain::ValidationError;

#[derive(Debug, Clone)]
/// Relay connection settings.
///
/// `starttls` controls whether the session is upgraded to an encrypted
/// channel after connecting; it defaults to on.
pub struct SmtpConfig {
    host: String,
    port: u16,
    username: String,
    password: String,
    starttls: bool,
}

impl SmtpConfig {
    /// Default submission port.
    pub const DEFAULT_PORT: u16 = 587;

    /// Create a validated config with the default port and STARTTLS enabled.
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let host = host.into();
        let host = host.trim();
        if host.is_empty() {
            return Err(ValidationError::Empty { field: "smtp_host" });
        }

        let username = username.into();
        if username.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: "smtp_username",
            });
        }

        let password = password.into();
        if password.is_empty() {
            return Err(ValidationError::Empty {
                field: "smtp_password",
            });
        }

        Ok(Self {
            host: host.to_owned(),
            port: Self::DEFAULT_PORT,
            username,
            password,
            starttls: true,
        })
    }

    /// Override the relay port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Enable or disable the STARTTLS upgrade.
    pub fn with_starttls(mut self, starttls: bool) -> Self {
        self.starttls = starttls;
        self
    }
}

/// SMTP-backed [`Mailer`] using lettre's async transport.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// Build the transport for a validated [`SmtpConfig`].
    pub fn new(config: SmtpConfig) -> Result<Self, MailError> {
        let builder = if config.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                .map_err(|err| MailError::Smtp(err.to_string()))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
        };

        let transport = builder
            .port(config.port)
            .credentials(Credentials::new(config.username, config.password))
            .build();

        Ok(Self { transport })
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address
        .parse()
        .map_err(|_| MailError::InvalidAddress(address.to_owned()))
}

fn build_message(email: &Email) -> Result<Message, MailError> {
    let mut builder = Message::builder().from(parse_mailbox(&email.from)?);
    for to in &email.to {
        builder = builder.to(parse_mailbox(to)?);
    }
    for cc in &email.cc {
        builder = builder.cc(parse_mailbox(cc)?);
    }
    for bcc in &email.bcc {
        builder = builder.bcc(parse_mailbox(bcc)?);
    }

    builder
        .subject(email.subject.clone())
        .singlepart(
            SinglePart::builder()
                .header(ContentType::TEXT_PLAIN)
                .body(email.body.clone()),
        )
        .map_err(|err| MailError::Build(err.to_string()))
}

impl Mailer for SmtpMailer {
    fn send<'a>(&'a self, email: &'a Email) -> BoxSendFuture<'a> {
        Box::pin(async move {
            let message = build_message(email)?;
            self.transport
                .send(message)
                .await
                .map_err(|err| MailError::Smtp(err.to_string()))?;
            debug!(recipients = email.to.len() + email.cc.len() + email.bcc.len(),
                "message accepted by relay");
            Ok(())
        })
    }
}
