//! Little Lemon CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Apply schema migrations
//! ll-cli migrate
//!
//! # Create a staff account for the admin panel
//! ll-cli user create -u manager -p 'correct horse' --staff
//!
//! # Load categories, menu items and menus from YAML
//! ll-cli seed crates/cli/seed/menu.yaml
//! ```
//!
//! The database is taken from `DATABASE_URL` (default `sqlite://little_lemon.db`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "ll-cli")]
#[command(author, version, about = "Little Lemon CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Seed the menu from a YAML file
    Seed {
        /// Path to the YAML file
        file: String,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new account
    Create {
        /// Login name
        #[arg(short, long)]
        username: String,

        /// Password (at least 8 characters)
        #[arg(short, long)]
        password: String,

        /// Allow the account to sign in to the admin panel
        #[arg(long)]
        staff: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::User { action } => match action {
            UserAction::Create {
                username,
                password,
                staff,
            } => {
                commands::user::create(&username, &password, staff).await?;
            }
        },
        Commands::Seed { file } => commands::seed::menu(&file).await?,
    }
    Ok(())
}
