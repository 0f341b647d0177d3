//! Command-line Interface Layer
//!
//! Configuration and wiring for the `subscription-store` binary, which
//! connects to a database, auto-migrates the store tables and reports what
//! the store holds.
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_cli::config::StoreConfig;
//! use infra_db::{connect, SubscriptionStore};
//!
//! let config = StoreConfig::from_env()?;
//! let db = connect(&config.database_config()).await?;
//! let store = SubscriptionStore::new(db, config.store_options()).await?;
//! ```

pub mod config;
pub mod report;

pub use config::StoreConfig;
pub use report::StoreReport;
