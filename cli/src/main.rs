//! Command-line entry point for the SimpleLogin email bridge.
//!
//! Credentials and endpoints come from the environment (optionally a `.env`
//! file); the message itself comes from the `send_email` subcommand flags.

use std::env;
use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use slrelay::{
    ApiKey, BridgeConfig, EmailAddress, EmailBridge, Hostname, PhoneNumber, SendEmailRequest,
    SimpleLoginClient, SmtpConfig, SmtpMailer,
};

#[derive(Parser)]
#[command(name = "slrelay", about = "Relay email from phone-number aliases")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send an email on behalf of a phone number.
    #[command(name = "send_email")]
    SendEmail {
        /// Sender phone number; its digits key the alias.
        #[arg(long = "phone_number")]
        phone_number: String,

        /// Recipient email address.
        #[arg(long)]
        to: String,

        #[arg(long)]
        subject: String,

        #[arg(long)]
        body: String,

        /// Optional carbon-copy recipient.
        #[arg(long)]
        cc: Option<String>,

        /// Optional blind-carbon-copy recipient.
        #[arg(long)]
        bcc: Option<String>,
    },
}

fn require_env(name: &'static str) -> Result<String, String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(format!("environment variable {name} is missing or empty")),
    }
}

fn bridge_from_env() -> Result<EmailBridge, Box<dyn std::error::Error>> {
    let api_key = ApiKey::new(require_env("SL_API_KEY")?)?;
    let client = match env::var("SL_API_BASE_URL") {
        Ok(base_url) => SimpleLoginClient::builder(api_key)
            .base_url(base_url)
            .build()?,
        Err(_) => SimpleLoginClient::new(api_key),
    };

    let mut smtp = SmtpConfig::new(
        require_env("SMTP_HOST")?,
        require_env("SMTP_USERNAME")?,
        require_env("SMTP_PASSWORD")?,
    )?;
    if let Ok(port) = env::var("SMTP_PORT") {
        smtp = smtp.with_port(port.parse()?);
    }
    if let Ok(starttls) = env::var("SMTP_STARTTLS") {
        smtp = smtp.with_starttls(starttls.parse()?);
    }
    let mailer = SmtpMailer::new(smtp)?;

    let mut config = BridgeConfig::new(
        EmailAddress::new(require_env("SL_PRIMARY_EMAIL")?)?,
        Hostname::new(require_env("SL_PRIMARY_DOMAIN")?)?,
    )
    .with_alias_affixes(
        env::var("SL_ALIAS_PREFIX").unwrap_or_default(),
        env::var("SL_ALIAS_SUFFIX").unwrap_or_default(),
    );
    if let Ok(product) = env::var("SL_PRODUCT_NAME") {
        config = config.with_product_name(product);
    }

    Ok(EmailBridge::new(client, Arc::new(mailer), config))
}

async fn run(cli: Cli) -> Result<String, Box<dyn std::error::Error>> {
    match cli.command {
        Commands::SendEmail {
            phone_number,
            to,
            subject,
            body,
            cc,
            bcc,
        } => {
            let bridge = bridge_from_env()?;

            let mut request = SendEmailRequest::new(
                PhoneNumber::new(phone_number)?,
                EmailAddress::new(to)?,
                subject,
                body,
            );
            if let Some(cc) = cc {
                request = request.with_cc(EmailAddress::new(cc)?);
            }
            if let Some(bcc) = bcc {
                request = request.with_bcc(EmailAddress::new(bcc)?);
            }

            let receipt = bridge.send_email(request).await?;
            Ok(receipt.message)
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(message) => println!("{message}"),
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    }
}
