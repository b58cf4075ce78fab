use clap::Args;
use duka_app::auth::{AdminTokenUuid, PgAuthService};
use uuid::Uuid;

use crate::cli::DatabaseArgs;

#[derive(Debug, Args)]
pub(crate) struct RevokeAdminArgs {
    #[command(flatten)]
    database: DatabaseArgs,

    /// Token UUID to revoke
    #[arg(long)]
    uuid: Uuid,
}

pub(crate) async fn run(args: RevokeAdminArgs) -> Result<(), String> {
    let db = args.database.connect().await?;

    let revoked = PgAuthService::new(db.pool().clone())
        .revoke_admin_token(AdminTokenUuid::from_uuid(args.uuid))
        .await
        .map_err(|error| format!("failed to revoke admin token: {error}"))?;

    if revoked {
        println!("revoked token {}", args.uuid);
    } else {
        println!("token {} was not active", args.uuid);
    }

    Ok(())
}
