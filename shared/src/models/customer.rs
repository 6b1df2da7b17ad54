//! Customer Model
//!
//! A customer is keyed by phone number and exclusively owns its delivery
//! address collection. Addresses are only ever mutated through the
//! reconciliation algorithm in `comanda-core::customers`.

use serde::{Deserialize, Serialize};

/// Delivery address owned by a customer.
///
/// `id` is stable across edits to `text`/`delivery_cost` and is never
/// reused: ids are allocated as max(existing)+1 and addresses are never
/// removed from a collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Address {
    pub id: i64,
    /// Delivery location string — the natural key when `id` is unknown.
    /// Unique (case-sensitive) within one customer's collection.
    pub text: String,
    /// Non-negative, in minor currency units.
    pub delivery_cost: i64,
}

/// Caller-proposed address entry for reconciliation.
///
/// `id` is optional: callers that edited a known address send it back,
/// callers typing a fresh address send only `text`/`delivery_cost`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposedAddress {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub text: String,
    pub delivery_cost: i64,
}

impl ProposedAddress {
    pub fn new(text: impl Into<String>, delivery_cost: i64) -> Self {
        Self {
            id: None,
            text: text.into(),
            delivery_cost,
        }
    }

    pub fn with_id(id: i64, text: impl Into<String>, delivery_cost: i64) -> Self {
        Self {
            id: Some(id),
            text: text.into(),
            delivery_cost,
        }
    }
}

/// Customer entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    /// Unique, immutable once set.
    pub phone: String,
    pub name: String,
    pub comment: Option<String>,
    pub addresses: Vec<Address>,
    /// Optimistic-concurrency row guard, bumped on every persisted write.
    pub version: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Upsert payload — the only write path for customer records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerUpsert {
    pub phone: String,
    /// When absent, the stored name is left unchanged.
    pub name: Option<String>,
    /// When absent, the stored comment is left unchanged.
    pub comment: Option<String>,
    #[serde(default)]
    pub addresses: Vec<ProposedAddress>,
    /// Address designated for the current order; must resolve after merge.
    pub selected_address_text: Option<String>,
}
