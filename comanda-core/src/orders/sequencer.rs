//! Order-number sequencer
//!
//! Issues the next order number for a restaurant scope. Backed by one
//! counter row per restaurant advanced atomically; the naive
//! read-max-then-store approach produces duplicate numbers under two
//! concurrent creators and is deliberately not implemented.

use crate::db::DbService;
use crate::db::repository::{self, RepoResult};
use tracing::debug;

/// Per-restaurant order-number source
#[derive(Clone)]
pub struct OrderSequencer {
    db: DbService,
}

impl OrderSequencer {
    pub fn new(db: DbService) -> Self {
        Self { db }
    }

    /// Next order number for `restaurant_id`: strictly greater than every
    /// previously issued value, never handed to two callers.
    pub async fn next(&self, restaurant_id: &str) -> RepoResult<i64> {
        let value = repository::counter::next_value(&self.db.pool, restaurant_id).await?;
        debug!(restaurant_id = %restaurant_id, order_number = value, "Order number issued");
        Ok(value)
    }
}
