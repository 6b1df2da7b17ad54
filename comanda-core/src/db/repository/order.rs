//! Order Repository
//!
//! Orders are written once at compile time and then mutated only through
//! status-guarded updates: every UPDATE carries the status the caller
//! read, so a concurrent transition invalidates the write instead of
//! being silently overwritten.

use super::{RepoError, RepoResult};
use shared::models::{BuyerRef, LineItemSnapshot, Order, OrderSection, OrderStatus, PaymentMethod};
use sqlx::SqlitePool;

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: String,
    restaurant_id: String,
    order_number: i64,
    line_items: String,
    payment_method: String,
    section: String,
    status: String,
    buyer_name: Option<String>,
    customer_id: Option<i64>,
    selected_address_text: Option<String>,
    delivery_cost: i64,
    total: i64,
    comment: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl OrderRow {
    fn into_order(self) -> RepoResult<Order> {
        let line_items: Vec<LineItemSnapshot> = serde_json::from_str(&self.line_items)?;
        let status = OrderStatus::parse(&self.status)
            .ok_or_else(|| RepoError::Serialization(format!("bad status: {}", self.status)))?;
        let section = OrderSection::parse(&self.section)
            .ok_or_else(|| RepoError::Serialization(format!("bad section: {}", self.section)))?;
        let payment_method = PaymentMethod::parse(&self.payment_method).ok_or_else(|| {
            RepoError::Serialization(format!("bad payment method: {}", self.payment_method))
        })?;
        // Tagged buyer: a customer id wins over an inline name.
        let buyer = match self.customer_id {
            Some(id) => BuyerRef::CustomerRef(id),
            None => BuyerRef::InlineName(self.buyer_name.unwrap_or_default()),
        };
        Ok(Order {
            id: self.id,
            restaurant_id: self.restaurant_id,
            order_number: self.order_number,
            line_items,
            payment_method,
            section,
            status,
            buyer,
            selected_address_text: self.selected_address_text,
            delivery_cost: self.delivery_cost,
            total: self.total,
            comment: self.comment,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn buyer_columns(buyer: &BuyerRef) -> (Option<&str>, Option<i64>) {
    match buyer {
        BuyerRef::InlineName(name) => (Some(name.as_str()), None),
        BuyerRef::CustomerRef(id) => (None, Some(*id)),
    }
}

const ORDER_SELECT: &str = "SELECT id, restaurant_id, order_number, line_items, payment_method, \
     section, status, buyer_name, customer_id, selected_address_text, delivery_cost, total, \
     comment, created_at, updated_at FROM orders";

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, OrderRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    row.map(OrderRow::into_order).transpose()
}

pub async fn insert(pool: &SqlitePool, order: &Order) -> RepoResult<()> {
    let line_items = serde_json::to_string(&order.line_items)?;
    let (buyer_name, customer_id) = buyer_columns(&order.buyer);
    sqlx::query(
        "INSERT INTO orders (id, restaurant_id, order_number, line_items, payment_method, \
         section, status, buyer_name, customer_id, selected_address_text, delivery_cost, total, \
         comment, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
    )
    .bind(&order.id)
    .bind(&order.restaurant_id)
    .bind(order.order_number)
    .bind(line_items)
    .bind(order.payment_method.as_str())
    .bind(order.section.as_str())
    .bind(order.status.as_str())
    .bind(buyer_name)
    .bind(customer_id)
    .bind(&order.selected_address_text)
    .bind(order.delivery_cost)
    .bind(order.total)
    .bind(&order.comment)
    .bind(order.created_at)
    .bind(order.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Status-guarded write-back of the mutable order content.
///
/// Returns false when the status moved under the caller; re-read and
/// re-check editability before retrying.
pub async fn update_content_guarded(
    pool: &SqlitePool,
    order: &Order,
    expected_status: OrderStatus,
) -> RepoResult<bool> {
    let line_items = serde_json::to_string(&order.line_items)?;
    let (buyer_name, customer_id) = buyer_columns(&order.buyer);
    let rows = sqlx::query(
        "UPDATE orders
         SET line_items = ?1, payment_method = ?2, buyer_name = ?3, customer_id = ?4,
             selected_address_text = ?5, delivery_cost = ?6, total = ?7, comment = ?8,
             updated_at = ?9
         WHERE id = ?10 AND status = ?11",
    )
    .bind(line_items)
    .bind(order.payment_method.as_str())
    .bind(buyer_name)
    .bind(customer_id)
    .bind(&order.selected_address_text)
    .bind(order.delivery_cost)
    .bind(order.total)
    .bind(&order.comment)
    .bind(order.updated_at)
    .bind(&order.id)
    .bind(expected_status.as_str())
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Compare-and-set status transition. Returns false when the stored
/// status is no longer `from`.
pub async fn update_status(
    pool: &SqlitePool,
    id: &str,
    from: OrderStatus,
    to: OrderStatus,
) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE orders SET status = ?1, updated_at = ?2 WHERE id = ?3 AND status = ?4",
    )
    .bind(to.as_str())
    .bind(now)
    .bind(id)
    .bind(from.as_str())
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Number of orders in a restaurant scope (tests/diagnostics).
pub async fn count_by_restaurant(pool: &SqlitePool, restaurant_id: &str) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE restaurant_id = ?")
        .bind(restaurant_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}
