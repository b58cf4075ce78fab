use clap::Args;
use duka_app::auth::PgAuthService;

use crate::cli::DatabaseArgs;

#[derive(Debug, Args)]
pub(crate) struct ListAdminsArgs {
    #[command(flatten)]
    database: DatabaseArgs,
}

pub(crate) async fn run(args: ListAdminsArgs) -> Result<(), String> {
    let db = args.database.connect().await?;

    let tokens = PgAuthService::new(db.pool().clone())
        .list_admin_tokens()
        .await
        .map_err(|error| format!("failed to list admin tokens: {error}"))?;

    if tokens.is_empty() {
        println!("no admin tokens found");
        return Ok(());
    }

    for token in tokens {
        println!("token_uuid: {}", token.uuid);
        println!("name: {}", token.name);
        println!("created_at: {}", token.created_at);
        println!(
            "last_used_at: {}",
            token
                .last_used_at
                .map_or_else(|| "never".to_string(), |value| value.to_string())
        );
        println!(
            "revoked_at: {}",
            token
                .revoked_at
                .map_or_else(|| "active".to_string(), |value| value.to_string())
        );
        println!();
    }

    Ok(())
}
