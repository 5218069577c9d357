//! Outbound email for the feedback form.
//!
//! [`Mailer`] is the seam the feedback service sends through.
//! [`SmtpMailer`] is the production implementation on top of the `lettre`
//! async SMTP transport; tests provide an in-memory mailer instead.

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::SmtpConfig;

/// SMTP port that uses implicit TLS rather than STARTTLS.
const IMPLICIT_TLS_PORT: u16 = 465;

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// A sender, recipient or reply-to address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),

    /// The send did not finish within the configured bound.
    #[error("Email send timed out after {0:?}")]
    Timeout(Duration),
}

/// A plain-text message addressed to the configured recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub subject: String,
    pub body: String,
    /// Address replies should go to, typically the person who wrote in.
    pub reply_to: Option<String>,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver one message. A single attempt; no retry.
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError>;
}

/// Sends mail through an SMTP relay with authentication.
pub struct SmtpMailer {
    config: SmtpConfig,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// Build the transport. No connection is made until the first send.
    pub fn new(config: SmtpConfig) -> Result<Self, MailError> {
        let builder = if config.port == IMPLICIT_TLS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
        };

        let mut builder = builder
            .port(config.port)
            .timeout(Some(config.timeout()));

        if !config.username.is_empty() && !config.password.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            config,
        })
    }

    fn build_message(&self, mail: OutgoingMail) -> Result<Message, MailError> {
        let mut builder = Message::builder()
            .from(self.config.from.parse()?)
            .to(self.config.to.parse()?)
            .subject(mail.subject)
            .header(ContentType::TEXT_PLAIN);

        if let Some(reply_to) = mail.reply_to {
            builder = builder.reply_to(reply_to.parse()?);
        }

        builder
            .body(mail.body)
            .map_err(|e| MailError::Build(e.to_string()))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        let message = self.build_message(mail)?;
        let timeout = self.config.timeout();

        tokio::time::timeout(timeout, self.transport.send(message))
            .await
            .map_err(|_| MailError::Timeout(timeout))??;

        tracing::info!(op = "mail.send", to = %self.config.to, "Email sent");
        Ok(())
    }
}
