//! Customer Repository
//!
//! Row access only. The reconcile-and-save logic that decides *what* to
//! write lives in `customers::directory`; this module enforces *how*:
//! inserts fail on duplicate phones, updates are guarded by the row
//! version so concurrent writers cannot silently overwrite each other.

use super::RepoResult;
use shared::models::{Address, Customer};
use sqlx::SqlitePool;

#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: i64,
    phone: String,
    name: String,
    comment: Option<String>,
    addresses: String,
    version: i64,
    created_at: i64,
    updated_at: i64,
}

impl CustomerRow {
    fn into_customer(self) -> RepoResult<Customer> {
        let addresses: Vec<Address> = serde_json::from_str(&self.addresses)?;
        Ok(Customer {
            id: self.id,
            phone: self.phone,
            name: self.name,
            comment: self.comment,
            addresses,
            version: self.version,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const CUSTOMER_SELECT: &str =
    "SELECT id, phone, name, comment, addresses, version, created_at, updated_at FROM customer";

pub async fn find_by_phone(pool: &SqlitePool, phone: &str) -> RepoResult<Option<Customer>> {
    let sql = format!("{CUSTOMER_SELECT} WHERE phone = ?");
    let row = sqlx::query_as::<_, CustomerRow>(&sql)
        .bind(phone)
        .fetch_optional(pool)
        .await?;
    row.map(CustomerRow::into_customer).transpose()
}

/// Insert a fresh customer. A concurrent insert for the same phone
/// surfaces as `RepoError::Duplicate` (UNIQUE on phone).
pub async fn insert(pool: &SqlitePool, customer: &Customer) -> RepoResult<()> {
    let addresses = serde_json::to_string(&customer.addresses)?;
    sqlx::query(
        "INSERT INTO customer (id, phone, name, comment, addresses, version, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )
    .bind(customer.id)
    .bind(&customer.phone)
    .bind(&customer.name)
    .bind(&customer.comment)
    .bind(addresses)
    .bind(customer.version)
    .bind(customer.created_at)
    .bind(customer.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Version-guarded write-back of name/comment/addresses.
///
/// Returns false when `expected_version` no longer matches — the caller
/// re-reads and retries (optimistic concurrency).
pub async fn update_guarded(
    pool: &SqlitePool,
    id: i64,
    name: &str,
    comment: Option<&str>,
    addresses: &[Address],
    expected_version: i64,
) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let addresses = serde_json::to_string(addresses)?;
    let rows = sqlx::query(
        "UPDATE customer
         SET name = ?1, comment = ?2, addresses = ?3, version = version + 1, updated_at = ?4
         WHERE id = ?5 AND version = ?6",
    )
    .bind(name)
    .bind(comment)
    .bind(addresses)
    .bind(now)
    .bind(id)
    .bind(expected_version)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}
