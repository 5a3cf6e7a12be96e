//! Configuration module
//!
//! Settings are read from the process environment (after loading `.env` through
//! dotenvy) with defaults for everything except the JWT secret.

use std::env;
use std::path::{Path, PathBuf};

use crate::constants::MAX_UPLOAD_BYTES;

const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const JWT_EXPIRY_HOURS: i64 = 24;
const SERVER_PORT: u16 = 8082;
const UPLOAD_PATH: &str = "./uploads";

/// Server, auth and pool settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    pub environment: String,
}

/// Media library settings
#[derive(Clone, Debug)]
pub struct LibraryConfig {
    pub base: BaseConfig,
    pub database_url: String,
    pub upload_path: PathBuf,
    pub max_upload_bytes: u64,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<LibraryConfig>);

impl Config {
    pub fn new(config: LibraryConfig) -> Self {
        Config(Box::new(config))
    }

    fn as_library(&self) -> &LibraryConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_name(&self.as_library().base.environment)
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        let config = LibraryConfig::from_lookup(|key| env::var(key).ok())?;
        Ok(Config::new(config))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_library().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.as_library().base.server_port
    }

    pub fn jwt_secret(&self) -> &str {
        &self.as_library().base.jwt_secret
    }

    pub fn jwt_expiry_hours(&self) -> i64 {
        self.as_library().base.jwt_expiry_hours
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.as_library().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.as_library().base.environment
    }

    pub fn db_max_connections(&self) -> u32 {
        self.as_library().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.as_library().base.db_timeout_seconds
    }

    pub fn database_url(&self) -> &str {
        &self.as_library().database_url
    }

    pub fn upload_path(&self) -> &Path {
        &self.as_library().upload_path
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.as_library().max_upload_bytes
    }
}

fn is_production_name(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

impl LibraryConfig {
    /// Build the configuration from a key lookup. `from_env` passes `std::env::var`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins: Vec<String> = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let base = BaseConfig {
            server_port: lookup("PORT")
                .unwrap_or_else(|| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            db_max_connections: lookup("DB_MAX_CONNECTIONS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: lookup("DB_TIMEOUT_SECONDS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            jwt_secret: lookup("JWT_SECRET")
                .ok_or_else(|| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?,
            jwt_expiry_hours: lookup("JWT_EXPIRY_HOURS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(JWT_EXPIRY_HOURS),
            environment,
        };

        let database_url = match lookup("DATABASE_URL") {
            Some(url) => url,
            None => {
                let host = lookup("DB_HOST").unwrap_or_else(|| "localhost".to_string());
                let port = lookup("DB_PORT").unwrap_or_else(|| "5432".to_string());
                let user = lookup("DB_USER").unwrap_or_else(|| "postgres".to_string());
                let password = lookup("DB_PASSWORD").unwrap_or_default();
                let name = lookup("DB_NAME").unwrap_or_else(|| "vitrine".to_string());
                if password.is_empty() {
                    format!("postgresql://{}@{}:{}/{}", user, host, port, name)
                } else {
                    format!(
                        "postgresql://{}:{}@{}:{}/{}",
                        user, password, host, port, name
                    )
                }
            }
        };

        let max_upload_bytes = lookup("MAX_UPLOAD_SIZE_MB")
            .and_then(|v| v.parse::<u64>().ok())
            .map(|mb| mb * 1024 * 1024)
            .unwrap_or(MAX_UPLOAD_BYTES);

        Ok(LibraryConfig {
            base,
            database_url,
            upload_path: PathBuf::from(
                lookup("UPLOAD_PATH").unwrap_or_else(|| UPLOAD_PATH.to_string()),
            ),
            max_upload_bytes,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.jwt_secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 characters long"
            ));
        }

        if !self.database_url.starts_with("postgresql://")
            && !self.database_url.starts_with("postgres://")
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if is_production_name(&self.base.environment)
            && self.base.cors_origins.iter().any(|o| o == "*")
        {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if self.max_upload_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be greater than zero"));
        }

        if self.base.jwt_expiry_hours <= 0 {
            return Err(anyhow::anyhow!("JWT_EXPIRY_HOURS must be positive"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = LibraryConfig::from_lookup(lookup_from(&[("JWT_SECRET", SECRET)])).unwrap();
        assert_eq!(config.base.server_port, 8082);
        assert_eq!(config.upload_path, PathBuf::from("./uploads"));
        assert_eq!(config.max_upload_bytes, 100 * 1024 * 1024);
        assert_eq!(config.base.jwt_expiry_hours, 24);
        assert_eq!(
            config.database_url,
            "postgresql://postgres@localhost:5432/vitrine"
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_database_url_from_parts() {
        let config = LibraryConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", SECRET),
            ("DB_HOST", "db"),
            ("DB_PORT", "6543"),
            ("DB_USER", "media"),
            ("DB_PASSWORD", "pw"),
            ("DB_NAME", "library"),
        ]))
        .unwrap();
        assert_eq!(config.database_url, "postgresql://media:pw@db:6543/library");
    }

    #[test]
    fn test_missing_jwt_secret_is_an_error() {
        assert!(LibraryConfig::from_lookup(lookup_from(&[])).is_err());
    }

    #[test]
    fn test_short_jwt_secret_fails_validation() {
        let config =
            LibraryConfig::from_lookup(lookup_from(&[("JWT_SECRET", "short")])).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_wildcard_cors_rejected_in_production() {
        let config = LibraryConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", SECRET),
            ("ENVIRONMENT", "production"),
        ]))
        .unwrap();
        assert!(config.validate().is_err());

        let config = LibraryConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", SECRET),
            ("ENVIRONMENT", "production"),
            ("CORS_ORIGINS", "https://photos.example.com"),
        ]))
        .unwrap();
        assert!(config.validate().is_ok());
        assert!(Config::new(config).is_production());
    }

    #[test]
    fn test_upload_ceiling_override() {
        let config = LibraryConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", SECRET),
            ("MAX_UPLOAD_SIZE_MB", "5"),
        ]))
        .unwrap();
        assert_eq!(config.max_upload_bytes, 5 * 1024 * 1024);
    }
}
