use async_trait::async_trait;
use configs::MailConfig;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info};

use super::{check_status, http_client, transport_error};
use crate::errors::ServiceError;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &Email) -> Result<(), ServiceError>;
}

/// JSON email API: `POST {api_url}/emails` with a bearer key.
pub struct HttpMailer {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    from: String,
}

impl HttpMailer {
    pub fn new(cfg: &MailConfig) -> Result<Self, ServiceError> {
        let from = if cfg.from_name.trim().is_empty() {
            cfg.from_address.clone()
        } else {
            format!("{} <{}>", cfg.from_name.trim(), cfg.from_address)
        };
        Ok(Self {
            client: http_client()?,
            endpoint: format!("{}/emails", cfg.api_url.trim_end_matches('/')),
            api_key: cfg.api_key.clone(),
            from,
        })
    }

    fn payload(&self, email: &Email) -> serde_json::Value {
        let mut body = json!({
            "from": self.from,
            "to": [email.to],
            "subject": email.subject,
            "html": email.html,
            "text": email.text,
        });
        if let Some(reply_to) = &email.reply_to {
            body["reply_to"] = json!(reply_to);
        }
        body
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, email: &Email) -> Result<(), ServiceError> {
        debug!(to = %email.to, subject = %email.subject, "sending email");
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.payload(email))
            .send()
            .await
            .map_err(|e| transport_error("mail", e))?;
        check_status("mail", response).await?;
        info!(to = %email.to, "email sent");
        Ok(())
    }
}

/// Used when no mail provider is configured: logs and drops.
pub struct DisabledMailer;

#[async_trait]
impl Mailer for DisabledMailer {
    async fn send(&self, email: &Email) -> Result<(), ServiceError> {
        info!(to = %email.to, subject = %email.subject, "mail disabled, email dropped");
        Ok(())
    }
}

/// Recording mailer for tests and doc examples
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct RecordingMailer {
        sent: Mutex<Vec<Email>>,
        failing: bool,
    }

    impl RecordingMailer {
        /// A mailer whose every send fails with an integration error.
        pub fn failing() -> Self {
            Self { sent: Mutex::new(Vec::new()), failing: true }
        }

        pub fn sent(&self) -> Vec<Email> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, email: &Email) -> Result<(), ServiceError> {
            if self.failing {
                return Err(ServiceError::Integration("mail provider unavailable".into()));
            }
            self.sent.lock().unwrap().push(email.clone());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> MailConfig {
        MailConfig {
            api_url: "https://mail.example.com/".into(),
            api_key: "k".into(),
            from_address: "hello@studio.test".into(),
            from_name: "Studio".into(),
        }
    }

    #[test]
    fn payload_has_provider_shape() {
        let mailer = HttpMailer::new(&cfg()).unwrap();
        assert_eq!(mailer.endpoint, "https://mail.example.com/emails");
        let email = Email {
            to: "ada@example.com".into(),
            subject: "Hi".into(),
            html: "<p>Hi</p>".into(),
            text: "Hi".into(),
            reply_to: Some("inbox@studio.test".into()),
        };
        let body = mailer.payload(&email);
        assert_eq!(body["from"], "Studio <hello@studio.test>");
        assert_eq!(body["to"][0], "ada@example.com");
        assert_eq!(body["reply_to"], "inbox@studio.test");
    }

    #[tokio::test]
    async fn disabled_mailer_accepts_everything() {
        let email = Email { to: "x@y.z".into(), subject: "s".into(), html: String::new(), text: String::new(), reply_to: None };
        assert!(DisabledMailer.send(&email).await.is_ok());
    }
}
