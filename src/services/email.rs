// src/services/email.rs

//! SMTP email notifier.

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::{Mailbox, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::error::{AppError, Result};
use crate::models::{EmailConfig, ListingRecord};
use crate::services::Notifier;
use crate::utils::{RetryPolicy, retry};

/// Port that speaks TLS from the first byte instead of upgrading via STARTTLS.
const IMPLICIT_TLS_PORT: u16 = 465;

/// Sends one plain-text email per new listing.
pub struct EmailNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
    subject_prefix: String,
    retry: RetryPolicy,
}

impl EmailNotifier {
    /// Build a notifier from configuration.
    ///
    /// Fails if credentials or the recipient are missing, or an address
    /// does not parse.
    pub fn from_config(config: &EmailConfig) -> Result<Self> {
        let (Some(username), Some(password), Some(to)) =
            (&config.username, &config.password, &config.to)
        else {
            return Err(AppError::config(
                "Email not configured. Set SMTP_USER, SMTP_PASS, EMAIL_TO.",
            ));
        };

        let from = config.sender().unwrap_or(username.as_str());
        let from: Mailbox = from
            .parse()
            .map_err(|e| AppError::config(format!("Invalid sender address {from:?}: {e}")))?;
        let to: Mailbox = to
            .parse()
            .map_err(|e| AppError::config(format!("Invalid recipient address {to:?}: {e}")))?;

        let builder = if config.smtp_port == IMPLICIT_TLS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
        }
        .map_err(|e| AppError::config(format!("Invalid SMTP host {:?}: {e}", config.smtp_host)))?;

        let transport = builder
            .port(config.smtp_port)
            .credentials(Credentials::new(username.clone(), password.clone()))
            .timeout(Some(Duration::from_secs(config.timeout_secs)))
            .build();

        Ok(Self {
            transport,
            from,
            to,
            subject_prefix: config.subject_prefix.clone(),
            retry: RetryPolicy::new(
                config.retries,
                Duration::from_secs(config.retry_delay_secs),
            ),
        })
    }

    /// Build the message for a listing.
    pub fn compose(&self, title: &str, link: &str, record: &ListingRecord) -> Result<Message> {
        Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(subject(&self.subject_prefix, title))
            .header(ContentType::TEXT_PLAIN)
            .body(body(title, link, record))
            .map_err(AppError::notify)
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn notify(&self, title: &str, link: &str, record: &ListingRecord) -> Result<()> {
        let message = self.compose(title, link, record)?;

        retry(self.retry, &format!("Sending email for {title:?}"), |_| {
            let message = message.clone();
            async move {
                self.transport
                    .send(message)
                    .await
                    .map(|_| ())
                    .map_err(AppError::notify)
            }
        })
        .await?;

        log::info!("Email sent: {}", subject(&self.subject_prefix, title));
        Ok(())
    }
}

/// Subject line for a listing.
pub fn subject(prefix: &str, title: &str) -> String {
    format!("{prefix}{title}")
}

/// Plain-text body: title, link, then the raw record.
pub fn body(title: &str, link: &str, record: &ListingRecord) -> String {
    format!("{title}\n{link}\n\nRaw: {}", record.to_compact_json())
}
