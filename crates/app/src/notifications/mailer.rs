//! HTTP mail relay client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::{
    domain::orders::records::OrderRecord,
    notifications::{
        errors::NotificationError,
        messages::{EmailMessage, admin_message, customer_message},
        notifier::Notifier,
    },
};

/// Mail relay settings.
#[derive(Debug, Clone)]
pub struct MailerConfig {
    /// Endpoint accepting `{from, to, subject, text}` JSON posts.
    pub relay_url: String,

    /// Sender address for every message.
    pub from: String,

    /// Shop inbox that receives new order notices.
    pub admin_email: String,

    /// Shop name used in customer-facing messages.
    pub shop_name: String,
}

/// Sends notifications as emails through an HTTP mail relay.
#[derive(Debug, Clone)]
pub struct HttpMailer {
    config: MailerConfig,
    http: Client,
}

impl HttpMailer {
    #[must_use]
    pub fn new(config: MailerConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    async fn send(&self, message: &EmailMessage) -> Result<(), NotificationError> {
        let body = RelayMessage {
            from: &self.config.from,
            to: &message.to,
            subject: &message.subject,
            text: &message.text,
        };

        let response = self
            .http
            .post(&self.config.relay_url)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(NotificationError::UnexpectedResponse(format!(
                "mail relay responded with status {status}: {text}"
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl Notifier for HttpMailer {
    async fn notify_admin(&self, order: &OrderRecord) -> Result<(), NotificationError> {
        self.send(&admin_message(order, &self.config.admin_email))
            .await
    }

    async fn notify_customer(&self, order: &OrderRecord) -> Result<(), NotificationError> {
        self.send(&customer_message(order, &self.config.shop_name))
            .await
    }
}

#[derive(Debug, Serialize)]
struct RelayMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}
