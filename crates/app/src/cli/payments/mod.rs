use clap::{Args, Subcommand};
use duka_app::domain::payments::{PaymentSweepService, PgPaymentSweepService};
use jiff::SignedDuration;

use crate::cli::DatabaseArgs;

#[derive(Debug, Args)]
pub(crate) struct PaymentsCommand {
    #[command(subcommand)]
    command: PaymentsSubcommand,
}

#[derive(Debug, Subcommand)]
enum PaymentsSubcommand {
    /// Fail pending payments that never received a callback
    Sweep(SweepArgs),
}

#[derive(Debug, Args)]
struct SweepArgs {
    #[command(flatten)]
    database: DatabaseArgs,

    /// Age after which a pending payment is considered abandoned
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    older_than_seconds: u32,
}

pub(crate) async fn run(command: PaymentsCommand) -> Result<(), String> {
    match command.command {
        PaymentsSubcommand::Sweep(args) => sweep(args).await,
    }
}

async fn sweep(args: SweepArgs) -> Result<(), String> {
    let db = args.database.connect().await?;

    let expired = PgPaymentSweepService::new(db)
        .expire_stale_payments(SignedDuration::from_secs(i64::from(
            args.older_than_seconds,
        )))
        .await
        .map_err(|error| format!("failed to expire payments: {error}"))?;

    println!("expired_intents: {}", expired.intents);
    println!("expired_orders: {}", expired.orders);

    Ok(())
}
