//! Order-number counter repository
//!
//! One row per restaurant. The increment is a single UPSERT..RETURNING
//! statement, so two concurrent callers can never observe the same value;
//! deriving the next number from a scan of existing orders is exactly the
//! race this table exists to prevent.

use super::RepoResult;
use sqlx::SqlitePool;

/// Atomically advance and return the counter for `restaurant_id`.
/// The first call for a restaurant returns 1.
pub async fn next_value(pool: &SqlitePool, restaurant_id: &str) -> RepoResult<i64> {
    let value: i64 = sqlx::query_scalar(
        "INSERT INTO order_counter (restaurant_id, value) VALUES (?1, 1)
         ON CONFLICT(restaurant_id) DO UPDATE SET value = value + 1
         RETURNING value",
    )
    .bind(restaurant_id)
    .fetch_one(pool)
    .await?;
    Ok(value)
}

/// Current counter value without advancing it (diagnostics).
pub async fn current_value(pool: &SqlitePool, restaurant_id: &str) -> RepoResult<i64> {
    let value: Option<i64> =
        sqlx::query_scalar("SELECT value FROM order_counter WHERE restaurant_id = ?")
            .bind(restaurant_id)
            .fetch_optional(pool)
            .await?;
    Ok(value.unwrap_or(0))
}
