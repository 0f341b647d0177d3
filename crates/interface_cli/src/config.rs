//! Store configuration

use std::time::Duration;

use infra_db::{DatabaseConfig, StoreOptions};
use serde::Deserialize;

/// Environment variable prefix, e.g. `STORE_DATABASE_URL`
pub const ENV_PREFIX: &str = "STORE";

/// Store configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Database URL; `sqlite:` and `postgres:` schemes are supported
    pub database_url: String,
    pub plan_table_name: String,
    pub subscription_table_name: String,
    /// Create missing tables on startup
    pub automigrate: bool,
    /// Log every generated statement at debug level
    pub debug: bool,
    /// Log level used when `RUST_LOG` is unset
    pub log_level: String,
    /// `pretty` or `json`
    pub log_format: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        let options = StoreOptions::default();
        Self {
            database_url: DatabaseConfig::default().url,
            plan_table_name: options.plan_table_name,
            subscription_table_name: options.subscription_table_name,
            automigrate: options.automigrate,
            debug: options.debug,
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            max_connections: 5,
            acquire_timeout_secs: 30,
        }
    }
}

impl StoreConfig {
    /// Loads configuration from `STORE_*` environment variables
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_environment(config::Environment::with_prefix(ENV_PREFIX))
    }

    /// Loads configuration from an environment source
    pub fn from_environment(
        environment: config::Environment,
    ) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(environment.try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Pool settings for `infra_db::connect`
    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig::new(self.database_url.clone())
            .max_connections(self.max_connections)
            .acquire_timeout(Duration::from_secs(self.acquire_timeout_secs))
    }

    /// Options for `SubscriptionStore::new`
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions::new(&self.plan_table_name, &self.subscription_table_name)
            .automigrate(self.automigrate)
            .debug(self.debug)
    }

    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn environment(vars: &[(&str, &str)]) -> config::Environment {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        config::Environment::with_prefix(ENV_PREFIX).source(Some(source))
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = StoreConfig::from_environment(environment(&[])).unwrap();
        assert_eq!(config, StoreConfig::default());
        assert_eq!(config.database_url, "sqlite://subscriptions.db?mode=rwc");
        assert_eq!(config.plan_table_name, "plans");
        assert!(config.automigrate);
        assert!(!config.debug);
    }

    #[test]
    fn test_overrides_from_environment() {
        let config = StoreConfig::from_environment(environment(&[
            ("STORE_DATABASE_URL", "postgres://localhost/subscriptions"),
            ("STORE_PLAN_TABLE_NAME", "plan_table"),
            ("STORE_AUTOMIGRATE", "false"),
            ("STORE_DEBUG", "true"),
            ("STORE_MAX_CONNECTIONS", "12"),
            ("STORE_LOG_FORMAT", "JSON"),
        ]))
        .unwrap();

        assert_eq!(config.database_url, "postgres://localhost/subscriptions");
        assert_eq!(config.plan_table_name, "plan_table");
        assert_eq!(config.subscription_table_name, "subscriptions");
        assert!(!config.automigrate);
        assert!(config.debug);
        assert_eq!(config.max_connections, 12);
        assert!(config.json_logs());
    }

    #[test]
    fn test_bridges_to_library_types() {
        let config = StoreConfig {
            plan_table_name: "p".to_string(),
            subscription_table_name: "s".to_string(),
            automigrate: false,
            max_connections: 3,
            ..StoreConfig::default()
        };

        let options = config.store_options();
        assert_eq!(options.plan_table_name, "p");
        assert_eq!(options.subscription_table_name, "s");
        assert!(!options.automigrate);

        let database = config.database_config();
        assert_eq!(database.max_connections, 3);
        assert_eq!(database.url, config.database_url);
    }
}
