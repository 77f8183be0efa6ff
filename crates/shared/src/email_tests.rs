use std::sync::{Arc, Mutex};

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;
use crate::config::{EmailConfig, EmailTransportMode};

/// Transport double that records recipients and fails on demand.
struct RecordingTransport {
    name: &'static str,
    fail: bool,
    sent_to: Mutex<Vec<String>>,
}

impl RecordingTransport {
    fn new(name: &'static str, fail: bool) -> Arc<Self> {
        Arc::new(Self {
            name,
            fail,
            sent_to: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<String> {
        self.sent_to.lock().expect("lock").clone()
    }
}

#[async_trait]
impl MailTransport for RecordingTransport {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn send(&self, to: &str, _email: &OutgoingEmail) -> Result<(), EmailError> {
        self.sent_to.lock().expect("lock").push(to.to_string());
        if self.fail {
            Err(EmailError::SendError(format!("{} down", self.name)))
        } else {
            Ok(())
        }
    }
}

fn lead_email() -> OutgoingEmail {
    OutgoingEmail {
        subject: "New Lead: Acme - SEO".to_string(),
        html: "<p>hello</p>".to_string(),
        reply_to: Some("lead@acme.test".to_string()),
        attachments: Vec::new(),
    }
}

fn recipients() -> Vec<String> {
    vec!["sales1@zeno.test".to_string(), "sales2@zeno.test".to_string()]
}

#[tokio::test]
async fn test_api_success_skips_smtp() {
    let api = RecordingTransport::new("api", false);
    let smtp = RecordingTransport::new("smtp", false);
    let mailer = SalesMailer::new(recipients(), Some(api.clone()), Some(smtp.clone()));

    let report = mailer.notify(&lead_email()).await;

    assert!(report.sent());
    assert_eq!(report.delivered, 2);
    assert_eq!(api.calls(), recipients());
    assert!(smtp.calls().is_empty());
}

#[tokio::test]
async fn test_api_failure_falls_back_to_smtp() {
    let api = RecordingTransport::new("api", true);
    let smtp = RecordingTransport::new("smtp", false);
    let mailer = SalesMailer::new(recipients(), Some(api.clone()), Some(smtp.clone()));

    let report = mailer.notify(&lead_email()).await;

    assert!(report.sent());
    assert_eq!(report.delivered, 2);
    assert_eq!(api.calls().len(), 2);
    assert_eq!(smtp.calls(), recipients());
    // The API error is kept even though SMTP succeeded.
    assert_eq!(report.last_error.as_deref(), Some("Failed to send email: api down"));
}

#[tokio::test]
async fn test_both_transports_fail() {
    let api = RecordingTransport::new("api", true);
    let smtp = RecordingTransport::new("smtp", true);
    let mailer = SalesMailer::new(recipients(), Some(api), Some(smtp));

    let report = mailer.notify(&lead_email()).await;

    assert!(!report.sent());
    assert_eq!(report.last_error.as_deref(), Some("Failed to send email: smtp down"));
}

#[tokio::test]
async fn test_api_only_mode_never_uses_smtp() {
    let api = RecordingTransport::new("api", true);
    let mailer = SalesMailer::new(recipients(), Some(api.clone()), None);

    let report = mailer.notify(&lead_email()).await;

    assert!(!report.sent());
    assert_eq!(api.calls().len(), 2);
}

#[tokio::test]
async fn test_no_recipients() {
    let api = RecordingTransport::new("api", false);
    let mailer = SalesMailer::new(Vec::new(), Some(api.clone()), None);

    let report = mailer.notify(&lead_email()).await;

    assert!(!report.sent());
    assert_eq!(report.error_excerpt(180), "No recipients configured");
    assert!(api.calls().is_empty());
}

#[test]
fn test_error_excerpt_truncates_on_char_boundary() {
    let report = DeliveryReport {
        delivered: 0,
        last_error: Some("₹".repeat(300)),
    };
    assert_eq!(report.error_excerpt(180).chars().count(), 180);
    assert_eq!(DeliveryReport::default().error_excerpt(180), "");
}

#[test]
fn test_from_config_respects_transport_mode() {
    let config = EmailConfig {
        transport: EmailTransportMode::Smtp,
        ..EmailConfig::default()
    };
    let mailer = SalesMailer::from_config(&config).expect("mailer");
    assert!(mailer.api.is_none());
    assert!(mailer.smtp.is_some());
    assert_eq!(mailer.recipients(), ["partha@infinitetechai.com".to_string()]);
}

#[tokio::test]
async fn test_sendgrid_posts_expected_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/mail/send"))
        .and(header("authorization", "Bearer SG.test"))
        .and(body_partial_json(json!({
            "personalizations": [{
                "to": [{ "email": "sales1@zeno.test" }],
                "subject": "New Lead: Acme - SEO"
            }],
            "from": { "email": "no-reply@infinitecard.in" },
            "reply_to": { "email": "lead@acme.test" },
            "content": [{ "type": "text/html", "value": "<p>hello</p>" }],
            "tracking_settings": { "click_tracking": { "enable": false, "enable_text": false } },
            "mail_settings": { "sandbox_mode": { "enable": true } }
        })))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let config = EmailConfig {
        sendgrid_api_key: Some("SG.test".to_string()),
        api_base_url: server.uri(),
        sandbox: true,
        ..EmailConfig::default()
    };
    let transport = SendGridTransport::new(&config).expect("transport");

    transport
        .send("sales1@zeno.test", &lead_email())
        .await
        .expect("send should succeed");
}

#[tokio::test]
async fn test_sendgrid_encodes_attachments() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/mail/send"))
        .and(body_partial_json(json!({
            "attachments": [{
                "content": "JVBERi0=",
                "type": "application/pdf",
                "filename": "cv.pdf",
                "disposition": "attachment"
            }]
        })))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let config = EmailConfig {
        sendgrid_api_key: Some("SG.test".to_string()),
        api_base_url: server.uri(),
        ..EmailConfig::default()
    };
    let transport = SendGridTransport::new(&config).expect("transport");
    let email = OutgoingEmail {
        attachments: vec![EmailAttachment {
            filename: "cv.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            content: b"%PDF-".to_vec(),
        }],
        ..lead_email()
    };

    transport.send("sales1@zeno.test", &email).await.expect("send");
}

#[tokio::test]
async fn test_sendgrid_rejection_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/mail/send"))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
        .mount(&server)
        .await;

    let config = EmailConfig {
        sendgrid_api_key: Some("SG.bad".to_string()),
        api_base_url: server.uri(),
        ..EmailConfig::default()
    };
    let transport = SendGridTransport::new(&config).expect("transport");

    let err = transport
        .send("sales1@zeno.test", &lead_email())
        .await
        .unwrap_err();
    assert!(matches!(err, EmailError::Api { status: 401, .. }));
}

#[tokio::test]
async fn test_sendgrid_without_key_fails_fast() {
    let transport = SendGridTransport::new(&EmailConfig::default()).expect("transport");
    let err = transport
        .send("sales1@zeno.test", &lead_email())
        .await
        .unwrap_err();
    assert!(matches!(err, EmailError::MissingCredentials(_)));
}

#[tokio::test]
async fn test_smtp_without_password_fails_fast() {
    let transport = SmtpTransport::new(&EmailConfig::default());
    let err = transport
        .send("sales1@zeno.test", &lead_email())
        .await
        .unwrap_err();
    assert!(matches!(err, EmailError::MissingCredentials(_)));
}

#[test]
fn test_smtp_message_headers() {
    let transport = SmtpTransport::new(&EmailConfig::default());
    let email = OutgoingEmail {
        attachments: vec![EmailAttachment {
            filename: "cv.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            content: b"%PDF-1.4".to_vec(),
        }],
        ..lead_email()
    };

    let message = transport
        .build_message("sales1@zeno.test", &email)
        .expect("message should build");
    let raw = String::from_utf8_lossy(&message.formatted()).to_string();

    assert!(raw.contains("Subject: New Lead: Acme - SEO"));
    assert!(raw.contains("Reply-To: lead@acme.test"));
    assert!(raw.contains("To: sales1@zeno.test"));
    assert!(raw.contains("cv.pdf"));
}

#[test]
fn test_smtp_rejects_invalid_recipient() {
    let transport = SmtpTransport::new(&EmailConfig::default());
    let err = transport
        .build_message("not an address", &lead_email())
        .unwrap_err();
    assert!(matches!(err, EmailError::InvalidAddress(_)));
}

#[test]
fn test_email_error_display() {
    assert_eq!(
        format!("{}", EmailError::BuildError("msg".into())),
        "Failed to build email: msg"
    );
    assert_eq!(
        format!("{}", EmailError::SendError("msg".into())),
        "Failed to send email: msg"
    );
    assert_eq!(
        format!("{}", EmailError::InvalidAddress("msg".into())),
        "Invalid email address: msg"
    );
    assert_eq!(
        format!("{}", EmailError::Api { status: 400, body: "bad".into() }),
        "API status=400: bad"
    );
}
