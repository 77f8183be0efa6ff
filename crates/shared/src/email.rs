//! Sales team mail delivery.
//!
//! Two transports are supported: the SendGrid v3 HTTP API (`reqwest`) and
//! SMTP with STARTTLS (`lettre`). [`SalesMailer`] sends every notification to
//! each configured recipient through the API first and only falls back to
//! SMTP when the API delivered to nobody.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Attachment, Mailbox, MultiPart, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::EmailConfig;

/// Timeout applied to every outbound mail request.
const SEND_TIMEOUT: Duration = Duration::from_secs(15);

/// Email service errors.
#[derive(Debug, Error)]
pub enum EmailError {
    /// Failed to build email message.
    #[error("Failed to build email: {0}")]
    BuildError(String),
    /// Failed to send email.
    #[error("Failed to send email: {0}")]
    SendError(String),
    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
    /// The transport has no credentials configured.
    #[error("Missing credentials: {0}")]
    MissingCredentials(&'static str),
    /// The mail API answered with a non-success status.
    #[error("API status={status}: {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Start of the response body.
        body: String,
    },
}

/// A file attached to an outgoing email.
#[derive(Debug, Clone)]
pub struct EmailAttachment {
    /// File name shown to the recipient.
    pub filename: String,
    /// MIME type.
    pub content_type: String,
    /// Raw file content.
    pub content: Vec<u8>,
}

/// An HTML email addressed to the sales team.
#[derive(Debug, Clone, Default)]
pub struct OutgoingEmail {
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub html: String,
    /// Reply-To address, usually the lead's own email.
    pub reply_to: Option<String>,
    /// Attachments.
    pub attachments: Vec<EmailAttachment>,
}

/// A single mail transport.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Short transport name for logs.
    fn name(&self) -> &'static str;

    /// Sends `email` to a single recipient.
    async fn send(&self, to: &str, email: &OutgoingEmail) -> Result<(), EmailError>;
}

/// Outcome of a sales notification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Number of recipients that accepted the message.
    pub delivered: usize,
    /// Last error seen on any transport.
    pub last_error: Option<String>,
}

impl DeliveryReport {
    /// True when at least one recipient received the message.
    #[must_use]
    pub const fn sent(&self) -> bool {
        self.delivered > 0
    }

    /// The last error cut to at most `max_chars` characters, or an empty string.
    #[must_use]
    pub fn error_excerpt(&self, max_chars: usize) -> String {
        self.last_error
            .as_deref()
            .map(|e| e.chars().take(max_chars).collect())
            .unwrap_or_default()
    }
}

/// Sends notifications to the sales team with API-then-SMTP fallback.
#[derive(Clone)]
pub struct SalesMailer {
    recipients: Vec<String>,
    api: Option<Arc<dyn MailTransport>>,
    smtp: Option<Arc<dyn MailTransport>>,
}

impl std::fmt::Debug for SalesMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SalesMailer")
            .field("recipients", &self.recipients)
            .field("api", &self.api.as_ref().map(|t| t.name()))
            .field("smtp", &self.smtp.as_ref().map(|t| t.name()))
            .finish()
    }
}

impl SalesMailer {
    /// Creates a mailer from explicit transports.
    #[must_use]
    pub fn new(
        recipients: Vec<String>,
        api: Option<Arc<dyn MailTransport>>,
        smtp: Option<Arc<dyn MailTransport>>,
    ) -> Self {
        Self {
            recipients,
            api,
            smtp,
        }
    }

    /// Creates a mailer with the transports selected by `config.transport`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &EmailConfig) -> Result<Self, EmailError> {
        let api: Option<Arc<dyn MailTransport>> = if config.transport.uses_api() {
            Some(Arc::new(SendGridTransport::new(config)?))
        } else {
            None
        };
        let smtp: Option<Arc<dyn MailTransport>> = if config.transport.uses_smtp() {
            Some(Arc::new(SmtpTransport::new(config)))
        } else {
            None
        };
        Ok(Self::new(config.recipients(), api, smtp))
    }

    /// Configured recipients.
    #[must_use]
    pub fn recipients(&self) -> &[String] {
        &self.recipients
    }

    /// Delivers `email` to every recipient.
    ///
    /// The API is tried for each recipient; SMTP is only attempted when the
    /// API reached nobody. Failures are collected in the report, never raised.
    pub async fn notify(&self, email: &OutgoingEmail) -> DeliveryReport {
        let mut report = DeliveryReport::default();
        if self.recipients.is_empty() {
            report.last_error = Some("No recipients configured".to_string());
            return report;
        }

        if let Some(api) = &self.api {
            self.send_all(api.as_ref(), email, &mut report).await;
        }

        if report.delivered == 0 {
            if let Some(smtp) = &self.smtp {
                if self.api.is_some() {
                    warn!(error = ?report.last_error, "Mail API delivered nothing, falling back to SMTP");
                }
                self.send_all(smtp.as_ref(), email, &mut report).await;
            }
        }

        report
    }

    async fn send_all(
        &self,
        transport: &dyn MailTransport,
        email: &OutgoingEmail,
        report: &mut DeliveryReport,
    ) {
        for to in &self.recipients {
            match transport.send(to, email).await {
                Ok(()) => {
                    debug!(transport = transport.name(), to = %to, "Email delivered");
                    report.delivered += 1;
                }
                Err(e) => {
                    warn!(transport = transport.name(), to = %to, error = %e, "Email delivery failed");
                    report.last_error = Some(e.to_string());
                }
            }
        }
    }
}

/// SendGrid v3 `mail/send` transport.
#[derive(Debug, Clone)]
pub struct SendGridTransport {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    from_email: String,
    from_name: String,
    sandbox: bool,
}

impl SendGridTransport {
    /// Creates the transport from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &EmailConfig) -> Result<Self, EmailError> {
        let client = reqwest::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .map_err(|e| EmailError::BuildError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key().map(ToString::to_string),
            from_email: config.from_email.clone(),
            from_name: config.from_name.clone(),
            sandbox: config.sandbox,
        })
    }

    fn request_body<'a>(&'a self, to: &'a str, email: &'a OutgoingEmail) -> SendGridRequest<'a> {
        SendGridRequest {
            personalizations: vec![Personalization {
                to: vec![Address { email: to, name: None }],
                subject: &email.subject,
            }],
            from: Address {
                email: &self.from_email,
                name: Some(&self.from_name).filter(|n| !n.is_empty()).map(String::as_str),
            },
            reply_to: email.reply_to.as_deref().map(|e| Address { email: e, name: None }),
            content: vec![Content {
                kind: "text/html",
                value: &email.html,
            }],
            tracking_settings: TrackingSettings {
                click_tracking: ClickTracking {
                    enable: false,
                    enable_text: false,
                },
            },
            mail_settings: self.sandbox.then_some(MailSettings {
                sandbox_mode: Toggle { enable: true },
            }),
            attachments: email
                .attachments
                .iter()
                .map(|a| SendGridAttachment {
                    content: BASE64.encode(&a.content),
                    kind: &a.content_type,
                    filename: &a.filename,
                    disposition: "attachment",
                })
                .collect(),
        }
    }
}

#[async_trait]
impl MailTransport for SendGridTransport {
    fn name(&self) -> &'static str {
        "sendgrid_api"
    }

    async fn send(&self, to: &str, email: &OutgoingEmail) -> Result<(), EmailError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(EmailError::MissingCredentials("SendGrid API key"));
        };

        let response = self
            .client
            .post(format!("{}/v3/mail/send", self.base_url))
            .bearer_auth(api_key)
            .json(&self.request_body(to, email))
            .send()
            .await
            .map_err(|e| EmailError::SendError(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(EmailError::Api {
            status: status.as_u16(),
            body: body.chars().take(200).collect(),
        })
    }
}

#[derive(Serialize)]
struct SendGridRequest<'a> {
    personalizations: Vec<Personalization<'a>>,
    from: Address<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<Address<'a>>,
    content: Vec<Content<'a>>,
    tracking_settings: TrackingSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    mail_settings: Option<MailSettings>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<SendGridAttachment<'a>>,
}

#[derive(Serialize)]
struct Personalization<'a> {
    to: Vec<Address<'a>>,
    subject: &'a str,
}

#[derive(Serialize)]
struct Address<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    value: &'a str,
}

#[derive(Serialize)]
struct TrackingSettings {
    click_tracking: ClickTracking,
}

#[derive(Serialize)]
struct ClickTracking {
    enable: bool,
    enable_text: bool,
}

#[derive(Serialize)]
struct MailSettings {
    sandbox_mode: Toggle,
}

#[derive(Serialize)]
struct Toggle {
    enable: bool,
}

#[derive(Serialize)]
struct SendGridAttachment<'a> {
    content: String,
    #[serde(rename = "type")]
    kind: &'a str,
    filename: &'a str,
    disposition: &'static str,
}

/// SMTP transport with STARTTLS.
#[derive(Debug, Clone)]
pub struct SmtpTransport {
    host: String,
    port: u16,
    username: String,
    password: Option<String>,
    from: String,
}

impl SmtpTransport {
    /// Creates the transport from configuration.
    #[must_use]
    pub fn new(config: &EmailConfig) -> Self {
        let from = if config.from_name.is_empty() {
            config.from_email.clone()
        } else {
            format!("{} <{}>", config.from_name, config.from_email)
        };
        Self {
            host: config.smtp_host.clone(),
            port: config.smtp_port,
            username: config.smtp_username.clone(),
            password: config.smtp_password().map(ToString::to_string),
            from,
        }
    }

    /// Builds the MIME message for one recipient.
    fn build_message(&self, to: &str, email: &OutgoingEmail) -> Result<Message, EmailError> {
        let from: Mailbox = self
            .from
            .parse()
            .map_err(|e| EmailError::InvalidAddress(format!("{e}")))?;
        let to: Mailbox = to
            .parse()
            .map_err(|e| EmailError::InvalidAddress(format!("{e}")))?;

        let mut builder = Message::builder().from(from).to(to).subject(&email.subject);
        if let Some(reply_to) = email.reply_to.as_deref() {
            let reply_to: Mailbox = reply_to
                .parse()
                .map_err(|e| EmailError::InvalidAddress(format!("{e}")))?;
            builder = builder.reply_to(reply_to);
        }

        let body = MultiPart::alternative_plain_html("HTML email.".to_string(), email.html.clone());
        let message = if email.attachments.is_empty() {
            builder.multipart(body)
        } else {
            let mut mixed = MultiPart::mixed().multipart(body);
            for attachment in &email.attachments {
                let content_type = ContentType::parse(&attachment.content_type)
                    .or_else(|_| ContentType::parse("application/octet-stream"))
                    .map_err(|e| EmailError::BuildError(e.to_string()))?;
                mixed = mixed.singlepart(
                    Attachment::new(attachment.filename.clone())
                        .body(attachment.content.clone(), content_type),
                );
            }
            builder.multipart(mixed)
        };

        message.map_err(|e| EmailError::BuildError(e.to_string()))
    }
}

#[async_trait]
impl MailTransport for SmtpTransport {
    fn name(&self) -> &'static str {
        "smtp"
    }

    async fn send(&self, to: &str, email: &OutgoingEmail) -> Result<(), EmailError> {
        let Some(password) = self.password.clone() else {
            return Err(EmailError::MissingCredentials("SMTP password"));
        };

        let message = self.build_message(to, email)?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.host)
            .map_err(|e| EmailError::SendError(e.to_string()))?
            .port(self.port)
            .credentials(Credentials::new(self.username.clone(), password))
            .timeout(Some(SEND_TIMEOUT))
            .build();

        transport
            .send(message)
            .await
            .map_err(|e| EmailError::SendError(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
#[path = "email_tests.rs"]
mod tests;
