use clap::{Args, Subcommand};

mod create;
mod list;
mod revoke;

#[derive(Debug, Args)]
pub(crate) struct AdminCommand {
    #[command(subcommand)]
    command: AdminSubcommand,
}

#[derive(Debug, Subcommand)]
enum AdminSubcommand {
    /// Issue a new admin token; it is printed once
    Create(create::CreateAdminArgs),

    /// List admin tokens
    List(list::ListAdminsArgs),

    /// Revoke an admin token
    Revoke(revoke::RevokeAdminArgs),
}

pub(crate) async fn run(command: AdminCommand) -> Result<(), String> {
    match command.command {
        AdminSubcommand::Create(args) => create::run(args).await,
        AdminSubcommand::List(args) => list::run(args).await,
        AdminSubcommand::Revoke(args) => revoke::run(args).await,
    }
}
