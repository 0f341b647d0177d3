//! Subscription Store - Command-line Binary
//!
//! Connects to the configured database, creates the plan and subscription
//! tables when auto-migration is enabled, and logs how many rows they hold.
//!
//! # Usage
//!
//! ```bash
//! # SQLite file in the working directory
//! cargo run --bin subscription-store
//!
//! # PostgreSQL with statement logging
//! STORE_DATABASE_URL=postgres://... STORE_DEBUG=true RUST_LOG=debug cargo run --bin subscription-store
//! ```
//!
//! # Environment Variables
//!
//! * `STORE_DATABASE_URL` - `sqlite:` or `postgres:` URL (default: sqlite://subscriptions.db?mode=rwc)
//! * `STORE_PLAN_TABLE_NAME` - Plan table (default: plans)
//! * `STORE_SUBSCRIPTION_TABLE_NAME` - Subscription table (default: subscriptions)
//! * `STORE_AUTOMIGRATE` - Create missing tables (default: true)
//! * `STORE_DEBUG` - Log generated SQL (default: false)
//! * `STORE_LOG_LEVEL` - Log level when `RUST_LOG` is unset (default: info)
//! * `STORE_LOG_FORMAT` - `pretty` or `json` (default: pretty)
//! * `STORE_MAX_CONNECTIONS` - Pool size (default: 5)

use anyhow::Context;
use infra_db::{connect, SubscriptionStore};
use interface_cli::{StoreConfig, StoreReport};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = StoreConfig::from_env().context("invalid STORE_* configuration")?;

    init_tracing(&config);

    tracing::info!(
        database = %redact(&config.database_url),
        plan_table = %config.plan_table_name,
        subscription_table = %config.subscription_table_name,
        "Starting subscription store"
    );

    let db = connect(&config.database_config())
        .await
        .context("failed to connect to database")?;
    let store = SubscriptionStore::new(db, config.store_options())
        .await
        .context("failed to open subscription store")?;

    let report = StoreReport::collect(&store)
        .await
        .context("failed to count stored rows")?;
    tracing::info!(
        dialect = %store.dialect(),
        plans = report.plans,
        subscriptions = report.subscriptions,
        "Store ready"
    );
    println!("{report}");

    store.close().await;
    Ok(())
}

/// Initializes the tracing subscriber for structured logging
fn init_tracing(config: &StoreConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    if config.json_logs() {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init();
    }
}

/// Hides the password of a connection URL
fn redact(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            let credentials = &url[scheme_end + 3..at];
            match credentials.split_once(':') {
                Some((user, _)) => format!("{}{}:***{}", &url[..scheme_end + 3], user, &url[at..]),
                None => url.to_string(),
            }
        }
        _ => url.to_string(),
    }
}
