use clap::Args;
use duka_app::auth::PgAuthService;

use crate::cli::DatabaseArgs;

#[derive(Debug, Args)]
pub(crate) struct CreateAdminArgs {
    #[command(flatten)]
    database: DatabaseArgs,

    /// Who the token is issued to
    #[arg(long)]
    name: String,
}

pub(crate) async fn run(args: CreateAdminArgs) -> Result<(), String> {
    let db = args.database.connect().await?;

    let issued = PgAuthService::new(db.pool().clone())
        .issue_admin_token(&args.name)
        .await
        .map_err(|error| format!("failed to create admin token: {error}"))?;

    println!("token_uuid: {}", issued.metadata.uuid);
    println!("name: {}", issued.metadata.name);
    println!("created_at: {}", issued.metadata.created_at);
    println!("admin_token: {}", issued.token);
    println!("store this token now; it is only shown once");

    Ok(())
}
