use std::path::PathBuf;

use crate::auth::password::HashCost;

/// Deployment environment, read from `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Directory holding `<timestamp>_<label>.sql` migration files.
    pub migrations_dir: PathBuf,
    /// Apply pending migrations before accepting requests (default: `false`).
    pub migrate_on_startup: bool,
    /// Secret appended to every password before hashing (default: empty).
    pub password_pepper: String,
    pub environment: Environment,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:3000`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `MIGRATIONS_DIR`       | `db/migrations`            |
    /// | `MIGRATE_ON_STARTUP`   | `false`                    |
    /// | `PASSWORD_PEPPER`      | empty                      |
    /// | `APP_ENV`              | `development`              |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let migrations_dir = std::env::var("MIGRATIONS_DIR")
            .unwrap_or_else(|_| "db/migrations".into())
            .into();

        let migrate_on_startup: bool = std::env::var("MIGRATE_ON_STARTUP")
            .unwrap_or_else(|_| "false".into())
            .parse()
            .expect("MIGRATE_ON_STARTUP must be `true` or `false`");

        let password_pepper = std::env::var("PASSWORD_PEPPER").unwrap_or_default();

        let environment = Environment::parse(
            &std::env::var("APP_ENV").unwrap_or_else(|_| "development".into()),
        );

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            migrations_dir,
            migrate_on_startup,
            password_pepper,
            environment,
        }
    }

    /// Production hashes use the full Argon2 cost; everything else uses
    /// the minimum so local runs and tests stay fast.
    pub fn hash_cost(&self) -> HashCost {
        match self.environment {
            Environment::Production => HashCost::Production,
            Environment::Development => HashCost::Minimal,
        }
    }

    /// Session cookies carry `Secure` only in production.
    pub fn secure_cookies(&self) -> bool {
        self.environment == Environment::Production
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_parse() {
        assert_eq!(Environment::parse("production"), Environment::Production);
        assert_eq!(Environment::parse(" PROD "), Environment::Production);
        assert_eq!(Environment::parse("development"), Environment::Development);
        assert_eq!(Environment::parse("staging"), Environment::Development);
    }
}
