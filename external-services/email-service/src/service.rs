// Email service implementation over SMTP
use std::time::Duration;

use logger_redacted::PiiRedactor;
use mail_builder::MessageBuilder;
use mail_send::SmtpClientBuilder;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::{EmailConfig, EmailProvider};
use crate::error::{EmailError, EmailResult};

/// Email service for sending transactional emails via Stalwart
pub struct EmailService {
    config: EmailConfig,
    redactor: PiiRedactor,
}

impl EmailService {
    /// Create a new email service
    ///
    /// # Errors
    ///
    /// [`EmailError::InvalidConfig`] if the sender address is malformed.
    pub fn new(config: EmailConfig) -> EmailResult<Self> {
        if !is_plausible_address(&config.from_email) {
            return Err(EmailError::InvalidConfig(format!(
                "from_email is not an address: {}",
                config.from_email
            )));
        }
        if !config.email_enabled {
            info!("Email service disabled by configuration");
        }
        Ok(Self {
            config,
            redactor: PiiRedactor::default(),
        })
    }

    /// Replace the redactor used for recipient addresses in logs.
    #[must_use]
    pub fn with_redactor(mut self, redactor: PiiRedactor) -> Self {
        self.redactor = redactor;
        self
    }

    pub fn config(&self) -> &EmailConfig {
        &self.config
    }

    /// Send the configured notification to every configured recipient.
    ///
    /// Takes no arguments so it can be bound directly as a workflow task.
    ///
    /// # Errors
    ///
    /// [`EmailError::NoRecipients`] when no recipient is configured, address
    /// validation errors, or SMTP failures.
    pub async fn send_notification(&self) -> EmailResult<String> {
        let notification = &self.config.notification;
        let recipients: Vec<&str> = notification.to.iter().map(String::as_str).collect();
        self.deliver(
            &recipients,
            &notification.subject,
            &notification.body,
            notification.html,
        )
        .await
    }

    /// Send a plain text email
    ///
    /// # Errors
    ///
    /// Address validation errors or SMTP failures.
    pub async fn send_email(&self, to: &str, subject: &str, body: &str) -> EmailResult<String> {
        self.deliver(&[to], subject, body, false).await
    }

    /// Send an HTML email
    ///
    /// # Errors
    ///
    /// Address validation errors or SMTP failures.
    pub async fn send_html_email(
        &self,
        to: &str,
        subject: &str,
        html_body: &str,
    ) -> EmailResult<String> {
        self.deliver(&[to], subject, html_body, true).await
    }

    /// Test email configuration by checking connection without sending
    ///
    /// # Errors
    ///
    /// [`EmailError::ConnectionFailed`] when the server cannot be reached or
    /// rejects the credentials.
    pub async fn verify_email_config(&self) -> EmailResult<()> {
        info!(provider = self.config.provider.name(), "Verifying email configuration");

        let EmailProvider::Smtp { host, port, .. } = &self.config.provider;
        info!(host = %host, port = %port, "Testing SMTP connection");

        let _client = self.smtp_client().connect().await.map_err(|e| {
            EmailError::ConnectionFailed(format!("{host}:{port}: {e}"))
        })?;

        info!(provider = "smtp", "Email configuration verified successfully");
        Ok(())
    }

    async fn deliver(
        &self,
        recipients: &[&str],
        subject: &str,
        body: &str,
        html: bool,
    ) -> EmailResult<String> {
        if recipients.is_empty() {
            return Err(EmailError::NoRecipients);
        }
        if let Some(bad) = recipients.iter().find(|r| !is_plausible_address(r)) {
            return Err(EmailError::InvalidAddress((*bad).to_string()));
        }

        let redacted_to = self.redactor.redact(&recipients.join(", "));

        if !self.config.email_enabled {
            debug!(to = %redacted_to, "Email disabled, skipping send");
            return Ok(format!("disabled-{}", Uuid::new_v4()));
        }

        let message = MessageBuilder::new()
            .from((
                self.config.from_name.as_str(),
                self.config.from_email.as_str(),
            ))
            .to(recipients.to_vec())
            .subject(subject);
        let message = if html {
            message.html_body(body)
        } else {
            message.text_body(body)
        };

        info!(to = %redacted_to, subject, "Sending email");
        self.send_message(message).await
    }

    fn smtp_client(&self) -> SmtpClientBuilder<&str> {
        let EmailProvider::Smtp {
            host,
            port,
            username,
            password,
            implicit_tls,
            timeout_secs,
        } = &self.config.provider;

        let mut builder = SmtpClientBuilder::new(host.as_str(), *port)
            .implicit_tls(*implicit_tls)
            .timeout(Duration::from_secs(*timeout_secs));

        if let (Some(user), Some(pass)) = (username, password) {
            builder = builder.credentials((user.as_str(), pass.as_str()));
        }
        builder
    }

    /// Internal method to send a constructed message using configured provider
    async fn send_message(&self, message: MessageBuilder<'_>) -> EmailResult<String> {
        let mut client = self
            .smtp_client()
            .connect()
            .await
            .map_err(|e| EmailError::ConnectionFailed(e.to_string()))?;

        let message_id = Uuid::new_v4().to_string();
        client
            .send(message)
            .await
            .map_err(|e| EmailError::SendFailed(format!("Failed to send email: {e}")))?;

        debug!(provider = "smtp", message_id = %message_id, "Email sent successfully");
        Ok(message_id)
    }
}

// single-label domains such as `localhost` are accepted
fn is_plausible_address(address: &str) -> bool {
    match address.trim().split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !domain.chars().any(char::is_whitespace)
        }
        None => false,
    }
}
