use std::error::Error;

use clap::{Args, Parser, Subcommand};
use engine::{Engine, Recipe, RecipeCost};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

mod prompt;

mod users {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "users")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub username: String,
        pub password: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

#[derive(Parser, Debug)]
#[command(name = "ficha_admin")]
#[command(about = "Admin utilities for Ficha (bootstrap users, inspect costings)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:./ficha.db?mode=rwc")]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    Recipe(RecipeArgs),
    /// Print inventory statistics for a user.
    Stats(OwnerArgs),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    Create(UserCreateArgs),
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    username: String,
    /// Skip the interactive prompt (also read from `FICHA_ADMIN_PASSWORD`).
    #[arg(long, env = "FICHA_ADMIN_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

#[derive(Args, Debug)]
struct RecipeArgs {
    #[command(subcommand)]
    command: RecipeCommand,
}

#[derive(Subcommand, Debug)]
enum RecipeCommand {
    /// Print the costing of one recipe, or of every recipe of the owner.
    Cost(RecipeCostArgs),
}

#[derive(Args, Debug)]
struct RecipeCostArgs {
    #[arg(long)]
    owner: String,
    #[arg(long)]
    id: Option<Uuid>,
}

#[derive(Args, Debug)]
struct OwnerArgs {
    #[arg(long)]
    owner: String,
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

fn print_costing(recipe: &Recipe, cost: &RecipeCost) {
    let markup = match recipe.markup {
        Some(_) => format!("{:.2}", cost.markup_factor),
        None => format!("{:.2} (default)", cost.markup_factor),
    };
    println!("{} ({})", recipe.name, recipe.id);
    println!(
        "  yield:           {} {}",
        recipe.yield_quantity, recipe.yield_unit
    );
    println!("  total cost:      {:.2}", cost.total_cost);
    println!("  cost / portion:  {:.2}", cost.cost_per_portion);
    println!("  markup:          {markup}");
    println!("  suggested price: {:.2}", cost.suggested_sale_price);
}

async fn require_user(
    db: &DatabaseConnection,
    username: &str,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    if users::Entity::find_by_id(username.to_string())
        .one(db)
        .await?
        .is_none()
    {
        eprintln!("user not found: {username}");
        std::process::exit(1);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;

    match cli.command {
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            if users::Entity::find_by_id(args.username.clone())
                .one(&db)
                .await?
                .is_some()
            {
                eprintln!("user already exists: {}", args.username);
                std::process::exit(1);
            }

            let password = match args.password {
                Some(password) if !password.is_empty() => password,
                Some(_) => {
                    eprintln!("password must not be empty");
                    std::process::exit(2);
                }
                None => prompt::new_password()?,
            };

            let user = users::ActiveModel {
                username: Set(args.username.clone()),
                password: Set(password),
            };
            users::Entity::insert(user).exec(&db).await?;

            println!("created user: {}", args.username);
        }
        Command::Recipe(RecipeArgs {
            command: RecipeCommand::Cost(args),
        }) => {
            require_user(&db, &args.owner).await?;
            let engine = Engine::builder().database(db.clone()).build().await?;

            let recipes = match args.id {
                Some(id) => vec![engine.recipe(id, &args.owner).await?],
                None => engine.list_recipes(&args.owner).await?,
            };
            if recipes.is_empty() {
                println!("no recipes for {}", args.owner);
            }
            for recipe in recipes {
                let cost = engine.recipe_cost(recipe.id, &args.owner).await?;
                print_costing(&recipe, &cost);
            }
        }
        Command::Stats(args) => {
            require_user(&db, &args.owner).await?;
            let engine = Engine::builder().database(db.clone()).build().await?;
            let stats = engine.inventory_statistics(&args.owner).await?;

            println!("ingredients:     {}", stats.ingredient_count);
            println!("recipes:         {}", stats.recipe_count);
            println!("inventory value: {:.2}", stats.inventory_value);
        }
    }

    Ok(())
}
