//! Orchestration: phone number → alias → reverse aliases → SMTP delivery.

use std::sync::Arc;

use chrono::Local;
use tracing::{debug, error, info, warn};

use crate::client::{SimpleLoginClient, SimpleLoginError};
use crate::domain::{Alias, Contact, CreateAlias, EmailAddress, Hostname, PhoneNumber};
use crate::mail::{Email, Mailer};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone)]
/// Bridge settings, constructed explicitly and validated through the domain
/// types it is built from.
pub struct BridgeConfig {
    primary_email: EmailAddress,
    primary_domain: Hostname,
    alias_prefix: String,
    alias_suffix: String,
    product_name: String,
}

impl BridgeConfig {
    /// Product annotation used in alias names and notes unless overridden.
    pub const DEFAULT_PRODUCT_NAME: &'static str = "RelaySMS";

    /// Create a config with empty alias affixes and the default product name.
    pub fn new(primary_email: EmailAddress, primary_domain: Hostname) -> Self {
        Self {
            primary_email,
            primary_domain,
            alias_prefix: String::new(),
            alias_suffix: String::new(),
            product_name: Self::DEFAULT_PRODUCT_NAME.to_owned(),
        }
    }

    /// Set static affixes placed around the digit string in alias addresses.
    pub fn with_alias_affixes(
        mut self,
        prefix: impl Into<String>,
        suffix: impl Into<String>,
    ) -> Self {
        self.alias_prefix = prefix.into();
        self.alias_suffix = suffix.into();
        self
    }

    /// Override the product annotation.
    pub fn with_product_name(mut self, product_name: impl Into<String>) -> Self {
        self.product_name = product_name.into();
        self
    }

    /// The full alias address a phone number maps to:
    /// `{prefix}{digits}{suffix}@{primary_domain}`.
    pub fn alias_address(&self, phone: &PhoneNumber) -> String {
        format!(
            "{}{}{}@{}",
            self.alias_prefix,
            phone.digits(),
            self.alias_suffix,
            self.primary_domain.as_str()
        )
    }

    fn alias_local_part(&self, phone: &PhoneNumber) -> String {
        format!(
            "{}{}{}",
            self.alias_prefix,
            phone.digits(),
            self.alias_suffix
        )
    }
}

#[derive(Debug, Clone)]
/// One send request. `to` is load-bearing; `cc`/`bcc` are best-effort.
pub struct SendEmailRequest {
    phone_number: PhoneNumber,
    to: EmailAddress,
    cc: Option<EmailAddress>,
    bcc: Option<EmailAddress>,
    subject: String,
    body: String,
}

impl SendEmailRequest {
    pub fn new(
        phone_number: PhoneNumber,
        to: EmailAddress,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            phone_number,
            to,
            cc: None,
            bcc: None,
            subject: subject.into(),
            body: body.into(),
        }
    }

    pub fn with_cc(mut self, cc: EmailAddress) -> Self {
        self.cc = Some(cc);
        self
    }

    pub fn with_bcc(mut self, bcc: EmailAddress) -> Self {
        self.bcc = Some(bcc);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
/// User-facing send failures. The messages are a fixed set; the underlying
/// error is logged in full and never surfaced through `Display`.
pub enum SendError {
    #[error("Failed to get or create an alias for this phone number.")]
    Alias,

    #[error("Failed to resolve a contact for the recipient.")]
    Contact,

    #[error("Failed to send email. Please try again later.")]
    Delivery,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Outcome of a successful send.
pub struct SendReceipt {
    /// The alias the message was sent on behalf of.
    pub alias_email: String,
    /// Human-readable confirmation with a completion timestamp.
    pub message: String,
}

/// Drives one send end to end: find-or-create the phone number's alias,
/// resolve reverse-alias contacts, compose, and deliver.
///
/// Strictly sequential; each step is awaited before the next begins, and the
/// chain stops at the first load-bearing failure. Alias and contact
/// idempotency is the server's job (lookup-before-create plus the contact
/// `existed` flag); two concurrent sends for one phone number can still race
/// and create duplicate aliases.
pub struct EmailBridge {
    client: SimpleLoginClient,
    mailer: Arc<dyn Mailer>,
    config: BridgeConfig,
}

impl EmailBridge {
    pub fn new(client: SimpleLoginClient, mailer: Arc<dyn Mailer>, config: BridgeConfig) -> Self {
        Self {
            client,
            mailer,
            config,
        }
    }

    /// Return the alias for a phone number, creating it on first use.
    ///
    /// The lookup queries the exact alias address, so repeated sends from
    /// one number reuse one alias. Creation requires the configured primary
    /// mailbox to exist and the primary domain to offer a signed suffix.
    pub async fn get_or_create_alias(
        &self,
        phone: &PhoneNumber,
    ) -> Result<Alias, SimpleLoginError> {
        let address = self.config.alias_address(phone);
        let aliases = self.client.list_aliases(Some(&address)).await?;
        if let Some(alias) = aliases.into_iter().next() {
            debug!(alias = %alias.email, "reusing existing alias");
            return Ok(alias);
        }

        let mailbox = self
            .client
            .find_mailbox_by_email(&self.config.primary_email)
            .await?
            .ok_or_else(|| SimpleLoginError::MailboxNotFound {
                email: self.config.primary_email.as_str().to_owned(),
            })?;

        let timestamp = Local::now().format(TIMESTAMP_FORMAT);
        let request = CreateAlias::new(self.config.alias_local_part(phone), mailbox.id)?
            .with_name(format!(
                "{} Via {}",
                phone.digits(),
                self.config.product_name
            ))
            .with_note(format!(
                "Created by {} email bridge at {timestamp}.",
                self.config.product_name
            ));

        self.client
            .create_alias(&self.config.primary_domain, request)
            .await
    }

    /// Relay one message. Returns a receipt on success or one of the fixed
    /// [`SendError`] messages on failure; the mandatory recipient aborts the
    /// send, while `cc`/`bcc` contact failures only drop that recipient.
    pub async fn send_email(&self, request: SendEmailRequest) -> Result<SendReceipt, SendError> {
        let alias = self
            .get_or_create_alias(&request.phone_number)
            .await
            .map_err(|err| {
                error!(error = %err, phone = request.phone_number.digits(), "alias resolution failed");
                SendError::Alias
            })?;

        let to_contact = self
            .client
            .get_or_create_contact(alias.id, &request.to)
            .await
            .map_err(|err| {
                error!(error = %err, "contact resolution failed for mandatory recipient");
                SendError::Contact
            })?;

        let cc_contact = self.optional_contact(&alias, request.cc.as_ref(), "cc").await;
        let bcc_contact = self
            .optional_contact(&alias, request.bcc.as_ref(), "bcc")
            .await;

        let email = Email {
            from: self.config.primary_email.as_str().to_owned(),
            to: vec![to_contact.reverse_alias_address],
            cc: cc_contact
                .into_iter()
                .map(|contact| contact.reverse_alias_address)
                .collect(),
            bcc: bcc_contact
                .into_iter()
                .map(|contact| contact.reverse_alias_address)
                .collect(),
            subject: request.subject,
            body: request.body,
        };

        self.mailer.send(&email).await.map_err(|err| {
            error!(error = %err, "delivery failed");
            SendError::Delivery
        })?;

        let message = format!(
            "Email sent successfully at {}.",
            Local::now().format(TIMESTAMP_FORMAT)
        );
        info!(alias = %alias.email, "email relayed");
        Ok(SendReceipt {
            alias_email: alias.email,
            message,
        })
    }

    /// Resolve an optional recipient's contact; a failure drops the
    /// recipient rather than the whole send.
    async fn optional_contact(
        &self,
        alias: &Alias,
        recipient: Option<&EmailAddress>,
        role: &'static str,
    ) -> Option<Contact> {
        let recipient = recipient?;
        match self.client.get_or_create_contact(alias.id, recipient).await {
            Ok(contact) => Some(contact),
            Err(err) => {
                warn!(error = %err, role, "contact resolution failed; omitting recipient");
                None
            }
        }
    }
}
