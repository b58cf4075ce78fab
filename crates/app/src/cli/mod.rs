use clap::{Args, Parser, Subcommand};
use duka_app::database::{self, Db};

mod admin;
mod category;
mod payments;

#[derive(Debug, Parser)]
#[command(name = "duka-app", about = "Duka storefront administration", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Manage admin API tokens
    Admin(admin::AdminCommand),

    /// Manage product categories
    Category(category::CategoryCommand),

    /// Payment maintenance
    Payments(payments::PaymentsCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Admin(command) => admin::run(command).await,
            Commands::Category(command) => category::run(command).await,
            Commands::Payments(command) => payments::run(command).await,
        }
    }
}

#[derive(Debug, Args)]
pub(crate) struct DatabaseArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

impl DatabaseArgs {
    /// Connect and bring the schema up to date.
    pub(crate) async fn connect(&self) -> Result<Db, String> {
        let pool = database::connect(&self.database_url)
            .await
            .map_err(|error| format!("failed to connect to database: {error}"))?;

        database::migrate(&pool)
            .await
            .map_err(|error| format!("failed to migrate database: {error}"))?;

        Ok(Db::new(pool))
    }
}
