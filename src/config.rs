//! Configuration loading
//!
//! Loads the connection settings for the introspection source from
//! environment variables, optionally reading a .env file first.

use crate::prelude::SdliftError;
use std::{env, path::Path};
use tracing::{debug, error, trace, warn};

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 5432;
const DEFAULT_SCHEMA: &str = "public";

/// Database connection configuration
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
    /// Schema to introspect
    pub schema: String,
}

impl DbConfig {
    /// Load configuration from environment variables
    ///
    /// Expected variables:
    /// - DB_HOST (default: localhost)
    /// - DB_PORT (default: 5432)
    /// - DB_NAME, DB_USER, DB_PASSWORD (required)
    /// - DB_SCHEMA (default: public)
    pub fn from_env() -> Result<Self, SdliftError> {
        debug!("Loading database configuration from environment");

        let host = optional_var("DB_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match optional_var("DB_PORT") {
            None => DEFAULT_PORT,
            Some(port_str) => port_str.parse::<u16>().map_err(|e| {
                error!(port = ?port_str, error = ?e, "Invalid DB_PORT value");
                SdliftError::Config("DB_PORT must be a valid port number".to_string())
            })?,
        };

        let database = required_var("DB_NAME")?;
        let user = required_var("DB_USER")?;
        let password = required_var("DB_PASSWORD")?;
        let schema = optional_var("DB_SCHEMA").unwrap_or_else(|| DEFAULT_SCHEMA.to_string());

        debug!(
            host = ?host,
            port = ?port,
            database = ?database,
            user = ?user,
            schema = ?schema,
            "Configuration loaded"
        );

        Ok(Self {
            host,
            port,
            database,
            user,
            password,
            schema,
        })
    }

    /// Load a .env file and then read configuration from environment
    pub fn load(env_file: &Path) -> Result<Self, SdliftError> {
        if env_file.exists() {
            debug!(path = ?env_file, "Loading environment file");
            dotenvy::from_path(env_file).map_err(|e| {
                error!(path = ?env_file, error = ?e, "Failed to load environment file");
                SdliftError::Config(format!("Failed to load {}: {}", env_file.display(), e))
            })?;
        } else {
            warn!(path = ?env_file, "Environment file not found, using existing environment");
        }

        Self::from_env()
    }

    /// Build a PostgreSQL connection string
    pub fn postgres_connection_string(&self) -> String {
        format!(
            "host={} port={} dbname={} user={} password={}",
            self.host, self.port, self.database, self.user, self.password
        )
    }

    /// Connection string with the password redacted, for logs and errors
    pub fn redacted_connection_string(&self) -> String {
        format!(
            "host={} port={} dbname={} user={} password=***",
            self.host, self.port, self.database, self.user
        )
    }
}

fn optional_var(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => {
            trace!(var = name, "Not set, using default");
            None
        }
    }
}

fn required_var(name: &str) -> Result<String, SdliftError> {
    env::var(name).map_err(|_| {
        error!(var = name, "Required environment variable is not set");
        SdliftError::Config(format!("{} environment variable is required", name))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, MutexGuard};

    // Tests below share the process environment
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn lock_env() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn clear_env_vars() {
        for var in ["DB_HOST", "DB_PORT", "DB_NAME", "DB_USER", "DB_PASSWORD", "DB_SCHEMA"] {
            env::remove_var(var);
        }
    }

    fn set_required_env_vars() {
        env::set_var("DB_NAME", "testdb");
        env::set_var("DB_USER", "testuser");
        env::set_var("DB_PASSWORD", "testpass");
    }

    fn sample_config() -> DbConfig {
        DbConfig {
            host: "localhost".to_string(),
            port: 5432,
            database: "mydb".to_string(),
            user: "myuser".to_string(),
            password: "secret".to_string(),
            schema: "public".to_string(),
        }
    }

    #[test]
    fn test_from_env_with_defaults() {
        let _guard = lock_env();
        clear_env_vars();
        set_required_env_vars();

        let config = DbConfig::from_env().unwrap();

        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 5432);
        assert_eq!(config.database, "testdb");
        assert_eq!(config.user, "testuser");
        assert_eq!(config.password, "testpass");
        assert_eq!(config.schema, "public");
    }

    #[test]
    fn test_from_env_with_custom_values() {
        let _guard = lock_env();
        clear_env_vars();
        env::set_var("DB_HOST", "db.example.com");
        env::set_var("DB_PORT", "5433");
        env::set_var("DB_SCHEMA", "inventory");
        set_required_env_vars();

        let config = DbConfig::from_env().unwrap();

        assert_eq!(config.host, "db.example.com");
        assert_eq!(config.port, 5433);
        assert_eq!(config.schema, "inventory");
    }

    #[test]
    fn test_from_env_missing_db_name() {
        let _guard = lock_env();
        clear_env_vars();
        env::set_var("DB_USER", "testuser");
        env::set_var("DB_PASSWORD", "testpass");

        let err = DbConfig::from_env().unwrap_err();

        assert!(err.to_string().contains("DB_NAME"));
    }

    #[test]
    fn test_from_env_invalid_port() {
        let _guard = lock_env();
        clear_env_vars();
        set_required_env_vars();
        env::set_var("DB_PORT", "not_a_number");

        let err = DbConfig::from_env().unwrap_err();

        assert!(err.to_string().contains("DB_PORT"));
    }

    #[test]
    fn test_postgres_connection_string() {
        assert_eq!(
            sample_config().postgres_connection_string(),
            "host=localhost port=5432 dbname=mydb user=myuser password=secret"
        );
    }

    #[test]
    fn test_redacted_connection_string() {
        let conn_str = sample_config().redacted_connection_string();

        assert!(!conn_str.contains("secret"));
        assert!(conn_str.contains("***"));
    }
}
