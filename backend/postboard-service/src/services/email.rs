/// Outbound email
///
/// `Mailer` is the seam the rest of the service talks to. `EmailService`
/// delivers over SMTP with lettre, or only logs when no SMTP host is set.
use crate::config::MailSettings;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use lettre::message::{header, Mailbox, Message};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A plain-text message ready to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl OutgoingEmail {
    pub fn password_reset(recipient: &str, reset_link: &str) -> Self {
        Self {
            to: recipient.to_string(),
            subject: "Password Reset Request".to_string(),
            body: format!(
                "To reset your password, visit the following link:\n{reset_link}\n\n\
                 If you did not make this request then simply ignore this email and no changes will be made."
            ),
        }
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<()>;
}

/// Async email transport wrapper (SMTP or no-op)
#[derive(Clone)]
pub struct EmailService {
    transport: Option<Arc<AsyncSmtpTransport<Tokio1Executor>>>,
    from: Mailbox,
}

impl EmailService {
    /// Build email service from configuration
    ///
    /// If the SMTP host is empty, operates in no-op mode (logs only).
    pub fn new(settings: &MailSettings) -> Result<Self> {
        let from = settings
            .sender
            .parse::<Mailbox>()
            .map_err(|e| AppError::Internal(format!("Invalid MAIL_SENDER address: {}", e)))?;

        let transport = if settings.server.is_empty() {
            warn!("MAIL_SERVER not configured; email service will operate in no-op mode");
            None
        } else {
            let builder = if settings.use_starttls {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.server)
            } else {
                AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.server)
            }
            .map_err(|e| AppError::Internal(format!("Failed to configure SMTP transport: {}", e)))?
            .port(settings.port);

            let builder = match (&settings.username, &settings.password) {
                (Some(username), Some(password)) => {
                    builder.credentials(Credentials::new(username.clone(), password.clone()))
                }
                _ => builder,
            };

            Some(Arc::new(builder.build()))
        };

        Ok(Self { transport, from })
    }

    pub fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }
}

#[async_trait]
impl Mailer for EmailService {
    async fn send(&self, email: OutgoingEmail) -> Result<()> {
        let Some(transport) = &self.transport else {
            debug!(
                subject = %email.subject,
                recipient = %email.to,
                "Email service running in no-op mode; skipping actual send"
            );
            return Ok(());
        };

        let to = email
            .to
            .parse::<Mailbox>()
            .map_err(|e| AppError::Mail(format!("Invalid recipient email address: {}", e)))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject.as_str())
            .header(header::ContentType::TEXT_PLAIN)
            .body(email.body)
            .map_err(|e| AppError::Mail(format!("Failed to build email message: {}", e)))?;

        transport
            .send(message)
            .await
            .map_err(|e| AppError::Mail(format!("Failed to send email: {}", e)))?;

        info!(subject = %email.subject, "email sent successfully");
        Ok(())
    }
}
