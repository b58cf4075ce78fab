//! Server configuration module

use std::net::SocketAddr;

use clap::Parser;

use duka_app::context::AppConfig;

use crate::config::{
    checkout::CheckoutConfig,
    db::DatabaseConfig,
    mpesa::MpesaSettings,
    notifications::NotificationsConfig,
    observability::{LoggingConfig, ObservabilityConfig},
    server::ServerRuntimeConfig,
};

pub(crate) mod checkout;
pub(crate) mod db;
pub(crate) mod mpesa;
pub(crate) mod notifications;
pub(crate) mod observability;
pub(crate) mod server;

/// Duka JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "duka-json", about = "Duka JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Request observability settings.
    #[command(flatten)]
    pub observability: ObservabilityConfig,

    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// M-Pesa gateway settings.
    #[command(flatten)]
    pub mpesa: MpesaSettings,

    /// Order notification settings.
    #[command(flatten)]
    pub notifications: NotificationsConfig,

    /// Checkout and payment lifecycle settings.
    #[command(flatten)]
    pub checkout: CheckoutConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> SocketAddr {
        self.server.socket_addr()
    }

    /// Settings for wiring the application services.
    #[must_use]
    pub fn app_config(&self) -> AppConfig {
        AppConfig {
            mpesa: self.mpesa.to_mpesa_config(),
            notifier: self.notifications.to_notifier_config(),
            sandbox_mode: self.checkout.sandbox_mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use duka_app::context::NotifierConfig;
    use testresult::TestResult;

    use super::*;

    const REQUIRED: [&str; 13] = [
        "duka-json",
        "--database-url",
        "postgres://localhost/duka",
        "--mpesa-consumer-key",
        "key",
        "--mpesa-consumer-secret",
        "secret",
        "--mpesa-passkey",
        "passkey",
        "--mpesa-callback-url",
        "https://shop.example/payments/callback",
        "--admin-email",
        "admin@shop.example",
    ];

    #[test]
    fn defaults_apply_when_only_required_values_are_given() -> TestResult {
        let config = ServerConfig::try_parse_from(REQUIRED)?;

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:5000");
        assert_eq!(config.mpesa.business_shortcode, "174379");
        assert!(!config.checkout.sandbox_mode);
        assert_eq!(config.checkout.pending_payment_ttl_seconds, None);

        Ok(())
    }

    #[test]
    fn notifications_fall_back_to_log_without_relay() -> TestResult {
        let config = ServerConfig::try_parse_from(REQUIRED)?;

        assert!(
            matches!(
                config.app_config().notifier,
                NotifierConfig::Log { ref admin_email, .. } if admin_email == "admin@shop.example"
            ),
            "expected log notifier"
        );

        Ok(())
    }

    #[test]
    fn relay_url_selects_mailer() -> TestResult {
        let config = ServerConfig::try_parse_from(
            REQUIRED
                .into_iter()
                .chain(["--mail-relay-url", "https://relay.example/send"]),
        )?;

        assert!(
            matches!(
                config.app_config().notifier,
                NotifierConfig::Mailer(ref mailer) if mailer.relay_url == "https://relay.example/send"
            ),
            "expected mailer notifier"
        );

        Ok(())
    }

    #[test]
    fn zero_ttl_is_rejected() {
        let result = ServerConfig::try_parse_from(
            REQUIRED
                .into_iter()
                .chain(["--pending-payment-ttl-seconds", "0"]),
        );

        assert!(result.is_err(), "expected a zero ttl to be rejected");
    }
}
