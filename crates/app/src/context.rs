//! App Context

use std::sync::Arc;

use sqlx::migrate::MigrateError;
use thiserror::Error;

use crate::{
    auth::{AuthService, PgAuthService},
    database::{self, Db},
    domain::{
        categories::{CategoriesService, PgCategoriesService},
        orders::{OrdersService, PgOrdersService},
        payments::{
            PaymentSweepService, PaymentsService, PgPaymentSweepService, PgPaymentsService,
        },
        products::{PgProductsService, ProductsService},
    },
    mpesa::{MpesaClient, MpesaConfig},
    notifications::{HttpMailer, LogNotifier, MailerConfig, Notifier},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to apply database migrations")]
    Migrate(#[source] MigrateError),
}

/// Where order notifications go.
#[derive(Debug, Clone)]
pub enum NotifierConfig {
    /// Send emails through an HTTP mail relay.
    Mailer(MailerConfig),

    /// Only log the messages that would have been sent.
    Log {
        admin_email: String,
        shop_name: String,
    },
}

impl NotifierConfig {
    fn build(self) -> Arc<dyn Notifier> {
        match self {
            Self::Mailer(config) => Arc::new(HttpMailer::new(config)),
            Self::Log {
                admin_email,
                shop_name,
            } => Arc::new(LogNotifier::new(admin_email, shop_name)),
        }
    }
}

/// Settings needed to wire the application services.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mpesa: MpesaConfig,
    pub notifier: NotifierConfig,

    /// Accept sandbox payments that cannot be matched to an exact intent.
    pub sandbox_mode: bool,
}

#[derive(Clone)]
pub struct AppContext {
    pub products: Arc<dyn ProductsService>,
    pub categories: Arc<dyn CategoriesService>,
    pub orders: Arc<dyn OrdersService>,
    pub payments: Arc<dyn PaymentsService>,
    pub payment_sweep: Arc<dyn PaymentSweepService>,
    pub auth: Arc<dyn AuthService>,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext").finish_non_exhaustive()
    }
}

impl AppContext {
    /// Build application context from a database URL, applying pending
    /// migrations first.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection or migrating fails.
    pub async fn from_database_url(url: &str, config: AppConfig) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        database::migrate(&pool)
            .await
            .map_err(AppInitError::Migrate)?;

        let db = Db::new(pool.clone());
        let notifier = config.notifier.build();
        let gateway = Arc::new(MpesaClient::new(config.mpesa));

        Ok(Self {
            products: Arc::new(PgProductsService::new(db.clone())),
            categories: Arc::new(PgCategoriesService::new(db.clone())),
            orders: Arc::new(
                PgOrdersService::new(db.clone(), notifier.clone())
                    .with_sandbox_mode(config.sandbox_mode),
            ),
            payments: Arc::new(PgPaymentsService::new(db.clone(), gateway, notifier)),
            payment_sweep: Arc::new(PgPaymentSweepService::new(db)),
            auth: Arc::new(PgAuthService::new(pool)),
        })
    }
}
