//! Store Ratings CLI - command-line front-end for the JSON API.
//!
//! # Usage
//!
//! ```bash
//! # Log in (the session is kept in ~/.store-ratings/session.json)
//! sr-cli login -e user@example.com -p 'User@123'
//!
//! # Browse and rate
//! sr-cli stores list --search grocery
//! sr-cli ratings rate 2 5 --comment "Always fresh"
//!
//! # Admin
//! sr-cli stores create --name "Corner Hardware Supplies" --category Other --owner-id 16
//! sr-cli users delete 7
//!
//! # Offline helpers
//! sr-cli validate user --name "Short" --email a@b
//! sr-cli stars 4.5
//! ```
//!
//! # Environment Variables
//!
//! - `STORE_RATINGS_API_URL` - API base URL (default: `http://localhost:3000/api`)
//! - `STORE_RATINGS_SESSION_FILE` - Session file location
//! - `RUST_LOG` - Log filter (default: `warn`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;

use clap::{Parser, Subcommand};
use secrecy::SecretString;
use tracing_subscriber::EnvFilter;

use store_ratings_core::{StoreCreate, StoreId, UserId};

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "sr-cli")]
#[command(author, version, about = "Store Ratings command-line client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and keep the session
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },
    /// Create a user account and log in
    Register {
        /// Full name (20-60 characters)
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,

        #[arg(short, long, default_value = "")]
        address: String,
    },
    /// Revoke the API token and forget the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Browse and manage stores
    Stores {
        #[command(subcommand)]
        action: StoreAction,
    },
    /// Browse and manage users (admin)
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Read and submit ratings
    Ratings {
        #[command(subcommand)]
        action: RatingAction,
    },
    /// Check form fields without contacting the server
    Validate {
        #[command(subcommand)]
        target: ValidateTarget,
    },
    /// Render a rating as stars
    Stars {
        /// Rating between 0 and 5
        rating: f64,
    },
}

#[derive(Subcommand)]
enum StoreAction {
    /// List stores
    List {
        /// Match name, address or category
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show one store
    Show { id: i32 },
    /// Create a store (admin)
    Create {
        /// Store name (20-60 characters)
        #[arg(short, long)]
        name: String,

        /// Category, e.g. "Food & Dining"
        #[arg(short, long)]
        category: String,

        /// Id of a user with the store owner role
        #[arg(short, long)]
        owner_id: i32,

        #[arg(short, long, default_value = "")]
        address: String,

        #[arg(long, default_value = "")]
        phone: String,

        #[arg(long, default_value = "")]
        website: String,
    },
    /// Delete a store and its ratings (admin)
    Delete { id: i32 },
}

#[derive(Subcommand)]
enum UserAction {
    /// List users
    List {
        /// Match name, email or address
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show one user and their ratings
    Show { id: i32 },
    /// Delete a user and their ratings
    Delete { id: i32 },
}

#[derive(Subcommand)]
enum RatingAction {
    /// Ratings of a store
    ForStore { store_id: i32 },
    /// Rate a store from 1 to 5 (replaces an earlier rating)
    Rate {
        store_id: i32,

        rating: i64,

        #[arg(short, long)]
        comment: Option<String>,
    },
}

#[derive(Subcommand)]
enum ValidateTarget {
    /// Validate user fields; the password is only checked when given
    User {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long, default_value = "")]
        address: String,

        #[arg(short, long)]
        password: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(output) => {
            let mut stdout = std::io::stdout().lock();
            if let Err(e) = writeln!(stdout, "{output}") {
                tracing::error!("Failed to write output: {e}");
                std::process::exit(1);
            }
        }
        Err(e) => {
            for (field, message) in e.field_messages() {
                tracing::error!(field = %field, "{message}");
            }
            tracing::error!("Command failed: {e}");
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<String, CliError> {
    use commands::{auth, connect, local, ratings, stores, users};

    match cli.command {
        Commands::Login { email, password } => {
            auth::login(&connect()?, &email, &SecretString::from(password)).await
        }
        Commands::Register {
            name,
            email,
            password,
            address,
        } => {
            let registration = auth::Registration {
                name,
                email,
                address,
                password: SecretString::from(password),
            };
            auth::register(&connect()?, registration).await
        }
        Commands::Logout => auth::logout(&connect()?).await,
        Commands::Whoami => auth::whoami(&connect()?),
        Commands::Stores { action } => match action {
            StoreAction::List { search } => stores::list(&connect()?, search.as_deref()).await,
            StoreAction::Show { id } => stores::show(&connect()?, StoreId::new(id)).await,
            StoreAction::Create {
                name,
                category,
                owner_id,
                address,
                phone,
                website,
            } => {
                let store = StoreCreate {
                    name,
                    address,
                    category,
                    phone,
                    website,
                    owner_id: Some(UserId::new(owner_id)),
                };
                stores::create(&connect()?, store).await
            }
            StoreAction::Delete { id } => stores::delete(&connect()?, StoreId::new(id)).await,
        },
        Commands::Users { action } => match action {
            UserAction::List { search } => users::list(&connect()?, search.as_deref()).await,
            UserAction::Show { id } => users::show(&connect()?, UserId::new(id)).await,
            UserAction::Delete { id } => users::delete(&connect()?, UserId::new(id)).await,
        },
        Commands::Ratings { action } => match action {
            RatingAction::ForStore { store_id } => {
                ratings::for_store(&connect()?, StoreId::new(store_id)).await
            }
            RatingAction::Rate {
                store_id,
                rating,
                comment,
            } => ratings::rate(&connect()?, StoreId::new(store_id), rating, comment).await,
        },
        Commands::Validate {
            target:
                ValidateTarget::User {
                    name,
                    email,
                    address,
                    password,
                },
        } => local::validate_user_fields(&name, &email, &address, password.as_deref()),
        Commands::Stars { rating } => local::stars(rating),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_rate() {
        let cli = Cli::try_parse_from(["sr-cli", "ratings", "rate", "2", "5", "-c", "Great"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Ratings {
                action: RatingAction::Rate {
                    store_id: 2,
                    rating: 5,
                    ..
                }
            })
        ));
    }
}
