use clap::{Parser, Subcommand};
use sea_orm::Database;
use sea_orm_migration::prelude::*;

/// Apply or inspect the Ficha schema.
#[derive(Parser, Debug)]
#[command(name = "migration")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:./ficha.db?mode=rwc")]
    database_url: String,

    #[command(subcommand)]
    command: Option<Step>,
}

#[derive(Subcommand, Debug, Default)]
enum Step {
    /// Apply pending migrations.
    #[default]
    Up,
    /// Roll back the last migration.
    Down,
    /// Drop every table and migrate from scratch.
    Fresh,
    /// Print applied and pending migrations.
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    let db = Database::connect(&cli.database_url).await?;

    match cli.command.unwrap_or_default() {
        Step::Up => migration::Migrator::up(&db, None).await?,
        Step::Down => migration::Migrator::down(&db, Some(1)).await?,
        Step::Fresh => migration::Migrator::fresh(&db).await?,
        Step::Status => migration::Migrator::status(&db).await?,
    }

    Ok(())
}
