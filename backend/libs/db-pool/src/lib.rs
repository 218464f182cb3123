//! Database connection pool management
//!
//! Provides SQLite pool creation and configuration for Postboard services.
//! Every connection is opened with foreign-key enforcement turned on, so
//! `ON DELETE CASCADE` and reference checks hold at the storage layer.

pub mod env_utils;

use env_utils::{env_opt, env_or};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, error, info};

/// URL of a private in-memory database
pub const IN_MEMORY_URL: &str = "sqlite::memory:";

/// Database connection pool configuration
#[derive(Clone)]
pub struct DbConfig {
    /// Service name for log labeling
    pub service_name: String,
    /// SQLite connection URL
    pub database_url: String,
    /// Maximum number of connections
    pub max_connections: u32,
    /// Minimum number of connections
    pub min_connections: u32,
    /// Connection acquisition timeout (get connection from pool)
    pub acquire_timeout_secs: u64,
    /// How long a statement waits on a locked database
    pub busy_timeout_secs: u64,
    /// Connection idle timeout, `None` keeps idle connections forever
    pub idle_timeout_secs: Option<u64>,
    /// Connection maximum lifetime, `None` never recycles
    pub max_lifetime_secs: Option<u64>,
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("service_name", &self.service_name)
            .field("database_url", &"[REDACTED]")
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .field("busy_timeout_secs", &self.busy_timeout_secs)
            .field("idle_timeout_secs", &self.idle_timeout_secs)
            .field("max_lifetime_secs", &self.max_lifetime_secs)
            .finish()
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            service_name: String::from("unknown"),
            database_url: String::from("sqlite://database.db"),
            max_connections: 5,
            min_connections: 1,
            acquire_timeout_secs: 10,
            busy_timeout_secs: 5,
            idle_timeout_secs: Some(600),
            max_lifetime_secs: Some(1800),
        }
    }
}

impl DbConfig {
    /// Create a new DbConfig from environment variables
    ///
    /// `DATABASE_URL` falls back to `sqlite://database.db` in the working directory.
    pub fn from_env(service_name: &str) -> Self {
        let defaults = Self::default();

        Self {
            service_name: service_name.to_string(),
            database_url: env_or("DATABASE_URL", defaults.database_url),
            max_connections: env_or("DB_MAX_CONNECTIONS", defaults.max_connections),
            min_connections: env_or("DB_MIN_CONNECTIONS", defaults.min_connections),
            acquire_timeout_secs: env_or("DB_ACQUIRE_TIMEOUT_SECS", defaults.acquire_timeout_secs),
            busy_timeout_secs: env_or("DB_BUSY_TIMEOUT_SECS", defaults.busy_timeout_secs),
            idle_timeout_secs: env_opt("DB_IDLE_TIMEOUT_SECS").or(defaults.idle_timeout_secs),
            max_lifetime_secs: env_opt("DB_MAX_LIFETIME_SECS").or(defaults.max_lifetime_secs),
        }
    }

    /// Config for a private in-memory database
    ///
    /// An in-memory SQLite database lives exactly as long as its connection,
    /// so the pool is pinned to a single connection that is never recycled.
    pub fn in_memory(service_name: &str) -> Self {
        Self {
            service_name: service_name.to_string(),
            database_url: IN_MEMORY_URL.to_string(),
            max_connections: 1,
            min_connections: 1,
            idle_timeout_secs: None,
            max_lifetime_secs: None,
            ..Self::default()
        }
    }

    /// Whether the URL points at an in-memory database
    pub fn is_in_memory(&self) -> bool {
        self.database_url.contains(":memory:") || self.database_url.contains("mode=memory")
    }

    /// Log pool configuration details
    pub fn log_config(&self) {
        info!(
            service = %self.service_name,
            max_connections = self.max_connections,
            min_connections = self.min_connections,
            acquire_timeout_secs = self.acquire_timeout_secs,
            in_memory = self.is_in_memory(),
            "Database pool configuration"
        );
    }
}

/// Create a SQLite connection pool and verify it answers queries
pub async fn create_pool(config: DbConfig) -> Result<SqlitePool, sqlx::Error> {
    debug!(
        service = %config.service_name,
        max = config.max_connections,
        min = config.min_connections,
        "Creating database pool"
    );

    let mut options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(config.busy_timeout_secs));

    if !config.is_in_memory() {
        options = options.journal_mode(SqliteJournalMode::Wal);
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(config.idle_timeout_secs.map(Duration::from_secs))
        .max_lifetime(config.max_lifetime_secs.map(Duration::from_secs))
        .connect_with(options)
        .await?;

    match sqlx::query("SELECT 1").execute(&pool).await {
        Ok(_) => {
            info!(
                service = %config.service_name,
                "Database pool created and verified successfully"
            );
            Ok(pool)
        }
        Err(e) => {
            error!(
                service = %config.service_name,
                error = %e,
                "Database connection verification failed"
            );
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[serial_test::serial]
    fn test_default_config() {
        let config = DbConfig::default();
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.min_connections, 1);
        assert_eq!(config.database_url, "sqlite://database.db");
        assert!(!config.is_in_memory());
    }

    #[test]
    #[serial_test::serial]
    fn test_config_from_env_overrides() {
        std::env::set_var("DATABASE_URL", "sqlite://other.db");
        std::env::set_var("DB_MAX_CONNECTIONS", "9");
        std::env::remove_var("DB_MIN_CONNECTIONS");

        let config = DbConfig::from_env("test-service");
        assert_eq!(config.service_name, "test-service");
        assert_eq!(config.database_url, "sqlite://other.db");
        assert_eq!(config.max_connections, 9);
        assert_eq!(config.min_connections, 1);

        std::env::remove_var("DATABASE_URL");
        std::env::remove_var("DB_MAX_CONNECTIONS");
    }

    #[test]
    fn test_in_memory_pins_single_connection() {
        let config = DbConfig::in_memory("test");
        assert!(config.is_in_memory());
        assert_eq!(config.max_connections, 1);
        assert_eq!(config.idle_timeout_secs, None);
        assert_eq!(config.max_lifetime_secs, None);
    }

    #[test]
    fn test_debug_redacts_url() {
        let config = DbConfig {
            database_url: "sqlite:///secret/path.db".into(),
            ..DbConfig::default()
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[tokio::test]
    async fn test_pool_enforces_foreign_keys() {
        let pool = create_pool(DbConfig::in_memory("test")).await.unwrap();

        let enabled: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(enabled, 1);

        sqlx::query("CREATE TABLE parent (id INTEGER PRIMARY KEY)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query(
            "CREATE TABLE child (id INTEGER PRIMARY KEY, parent_id INTEGER NOT NULL REFERENCES parent(id))",
        )
        .execute(&pool)
        .await
        .unwrap();

        let orphan = sqlx::query("INSERT INTO child (parent_id) VALUES (99)")
            .execute(&pool)
            .await;
        assert!(orphan.is_err(), "dangling reference must be rejected");
    }
}
