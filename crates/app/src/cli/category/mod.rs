use clap::{Args, Subcommand};
use duka_app::domain::categories::{
    CategoriesService, PgCategoriesService, data::NewCategory, records::CategoryUuid,
};

use crate::cli::DatabaseArgs;

#[derive(Debug, Args)]
pub(crate) struct CategoryCommand {
    #[command(subcommand)]
    command: CategorySubcommand,
}

#[derive(Debug, Subcommand)]
enum CategorySubcommand {
    /// Create a category; the slug is derived from the name
    Create(CreateCategoryArgs),

    /// List categories by name
    List(ListCategoriesArgs),
}

#[derive(Debug, Args)]
struct CreateCategoryArgs {
    #[command(flatten)]
    database: DatabaseArgs,

    /// Display name, e.g. "Wall Art"
    #[arg(long)]
    name: String,
}

#[derive(Debug, Args)]
struct ListCategoriesArgs {
    #[command(flatten)]
    database: DatabaseArgs,
}

pub(crate) async fn run(command: CategoryCommand) -> Result<(), String> {
    match command.command {
        CategorySubcommand::Create(args) => create(args).await,
        CategorySubcommand::List(args) => list(args).await,
    }
}

async fn create(args: CreateCategoryArgs) -> Result<(), String> {
    let db = args.database.connect().await?;

    let category = PgCategoriesService::new(db)
        .create_category(NewCategory {
            uuid: CategoryUuid::new(),
            name: args.name,
        })
        .await
        .map_err(|error| format!("failed to create category: {error}"))?;

    println!("category_uuid: {}", category.uuid);
    println!("name: {}", category.name);
    println!("slug: {}", category.slug);

    Ok(())
}

async fn list(args: ListCategoriesArgs) -> Result<(), String> {
    let db = args.database.connect().await?;

    let categories = PgCategoriesService::new(db)
        .list_categories()
        .await
        .map_err(|error| format!("failed to list categories: {error}"))?;

    if categories.is_empty() {
        println!("no categories found");
        return Ok(());
    }

    for category in categories {
        println!("{}\t{}\t{}", category.uuid, category.slug, category.name);
    }

    Ok(())
}
