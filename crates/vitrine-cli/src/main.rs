//! Vitrine admin CLI. Account management directly against the database.
//!
//! Reads DATABASE_URL from the environment (or `.env`) unless `--database-url` is given.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::BufRead;
use vitrine_cli::{connect, init_tracing, password_from_line, validate_credentials};
use vitrine_core::password::hash_password;
use vitrine_db::{UserRepository, UserStore};

#[derive(Parser)]
#[command(name = "vitrine-admin", about = "Vitrine operator commands")]
struct Cli {
    /// Postgres connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a login account
    CreateUser {
        #[arg(long)]
        username: String,
        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::CreateUser { username, password } => {
            let password = match password {
                Some(p) => p,
                None => read_password()?,
            };
            let username = validate_credentials(&username, &password)?;
            let password_hash = hash_password(&password)?;

            let pool = connect(&cli.database_url).await?;
            let user = UserRepository::new(pool)
                .create(&username, &password_hash)
                .await
                .with_context(|| format!("Failed to create user '{}'", username))?;

            tracing::info!(user_id = user.id, username = %user.username, "User created");
            println!("{}", user.id);
        }
    }

    Ok(())
}

fn read_password() -> Result<String> {
    eprint!("Password: ");
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read password from stdin")?;
    Ok(password_from_line(&line).to_string())
}
