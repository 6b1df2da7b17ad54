//! Engine bootstrap
//!
//! Wires configuration → database → services. The outer surface (CLI or
//! HTTP layer, out of scope here) holds one `Engine` and calls through it.

use super::config::Config;
use crate::customers::CustomerDirectory;
use crate::db::DbService;
use crate::orders::OrderService;
use anyhow::Result;

/// Assembled engine: the customer directory and the order service sharing
/// one database pool.
#[derive(Clone)]
pub struct Engine {
    config: Config,
    db: DbService,
    customers: CustomerDirectory,
    orders: OrderService,
}

impl Engine {
    pub async fn start(config: Config) -> Result<Self> {
        let db = DbService::new(&config.database_path).await?;
        let customers = CustomerDirectory::new(db.clone(), config.write_retry_limit);
        let orders = OrderService::new(db.clone(), customers.clone(), config.write_retry_limit);

        tracing::info!(
            database_path = %config.database_path,
            environment = %config.environment,
            "Engine started"
        );
        Ok(Self {
            config,
            db,
            customers,
            orders,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn db(&self) -> &DbService {
        &self.db
    }

    pub fn customers(&self) -> &CustomerDirectory {
        &self.customers
    }

    pub fn orders(&self) -> &OrderService {
        &self.orders
    }
}
