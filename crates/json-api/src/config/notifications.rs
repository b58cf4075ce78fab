//! Notifications Config

use clap::Args;

use duka_app::{context::NotifierConfig, notifications::MailerConfig};

/// Order notification settings.
#[derive(Debug, Args)]
pub struct NotificationsConfig {
    /// HTTP mail relay endpoint; notifications are only logged when unset
    #[arg(long, env = "MAIL_RELAY_URL")]
    pub mail_relay_url: Option<String>,

    /// Sender address for notification emails
    #[arg(long, env = "MAIL_FROM", default_value = "orders@duka.local")]
    pub mail_from: String,

    /// Shop inbox receiving new paid order notices
    #[arg(long, env = "ADMIN_EMAIL")]
    pub admin_email: String,

    /// Shop name used in customer emails
    #[arg(long, env = "SHOP_NAME", default_value = "Duka")]
    pub shop_name: String,
}

impl NotificationsConfig {
    /// The relay mailer when a relay is configured, otherwise a log-only notifier.
    pub(crate) fn to_notifier_config(&self) -> NotifierConfig {
        self.mailer_config().map_or_else(
            || NotifierConfig::Log {
                admin_email: self.admin_email.clone(),
                shop_name: self.shop_name.clone(),
            },
            NotifierConfig::Mailer,
        )
    }

    fn mailer_config(&self) -> Option<MailerConfig> {
        let relay_url = self.mail_relay_url.as_deref()?.trim();

        if relay_url.is_empty() {
            return None;
        }

        Some(MailerConfig {
            relay_url: relay_url.to_string(),
            from: self.mail_from.clone(),
            admin_email: self.admin_email.clone(),
            shop_name: self.shop_name.clone(),
        })
    }
}
