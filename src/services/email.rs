//! Contact form delivery
//!
//! Messages are sent from and to the configured administrator address.

use std::sync::Arc;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::config::settings::EmailConfig;
use crate::models::email::{ContactMessage, EmailDto};
use crate::services::service::ensure_active;
use crate::utils::errors::{Result, UserEventsError};

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: ContactMessage) -> Result<()>;
}

/// SMTP relay over STARTTLS, authenticated as the administrator.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    admin: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &EmailConfig) -> Result<Self> {
        let admin: Mailbox = config
            .admin_email
            .parse()
            .map_err(|e| UserEventsError::Config(format!("Invalid admin email: {}", e)))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| UserEventsError::Config(e.to_string()))?
            .port(config.port)
            .credentials(Credentials::new(
                config.admin_email.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self { transport, admin })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, message: ContactMessage) -> Result<()> {
        let email = Message::builder()
            .from(self.admin.clone())
            .to(self.admin.clone())
            .subject(message.subject)
            .header(ContentType::TEXT_HTML)
            .body(message.html_body)
            .map_err(|e| UserEventsError::Email(e.to_string()))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| UserEventsError::Email(e.to_string()))?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct EmailService {
    mailer: Option<Arc<dyn Mailer>>,
}

impl EmailService {
    pub fn new(mailer: Option<Arc<dyn Mailer>>) -> Self {
        Self { mailer }
    }

    /// Builds the SMTP mailer when email settings are present.
    pub fn from_config(config: Option<&EmailConfig>) -> Result<Self> {
        let mailer = match config {
            Some(config) => Some(Arc::new(SmtpMailer::new(config)?) as Arc<dyn Mailer>),
            None => None,
        };
        Ok(Self::new(mailer))
    }

    pub async fn send(&self, dto: EmailDto, token: &CancellationToken) -> Result<()> {
        let message = dto.validate()?;
        let mailer = self
            .mailer
            .as_ref()
            .ok_or_else(|| {
                UserEventsError::Config("Email settings are not configured.".to_string())
            })?;

        ensure_active(token)?;
        let subject = message.subject.clone();
        mailer.send(message).await.map_err(|e| {
            error!(error = %e, "Failed to send contact email");
            e
        })?;

        info!(subject = %subject, "Contact email sent");
        Ok(())
    }
}
