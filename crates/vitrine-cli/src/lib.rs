//! Shared pieces of the operator CLI.

use anyhow::{bail, Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::path::Path;
use std::time::Duration;
use vitrine_core::constants::MIN_PASSWORD_LENGTH;

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Trim and check an account name and password before anything is written.
pub fn validate_credentials(username: &str, password: &str) -> Result<String> {
    let username = username.trim();
    if username.is_empty() {
        bail!("Username must not be empty");
    }
    if username.chars().count() > 255 {
        bail!("Username must be at most 255 characters");
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        bail!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        );
    }
    Ok(username.to_string())
}

/// Strip the line terminator from a password read off stdin.
pub fn password_from_line(line: &str) -> &str {
    line.trim_end_matches(['\r', '\n'])
}

/// Connect with a small pool and bring the schema up to date.
pub async fn connect(database_url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;

    let migrations_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../migrations");
    let migrator = sqlx::migrate::Migrator::new(migrations_dir)
        .await
        .context("Failed to load migrations")?;
    migrator
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_credentials_trims_username() {
        assert_eq!(validate_credentials("  alice ", "secret1").unwrap(), "alice");
    }

    #[test]
    fn validate_credentials_rejects_short_password() {
        assert!(validate_credentials("alice", "12345").is_err());
        assert!(validate_credentials("alice", "123456").is_ok());
    }

    #[test]
    fn validate_credentials_rejects_blank_username() {
        assert!(validate_credentials("   ", "long enough").is_err());
    }

    #[test]
    fn password_from_line_keeps_inner_spaces() {
        assert_eq!(password_from_line("pass word \r\n"), "pass word ");
        assert_eq!(password_from_line("plain"), "plain");
    }
}
