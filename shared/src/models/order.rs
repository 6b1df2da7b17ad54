//! Order Model
//!
//! An order snapshots everything it needs at compile time (line-item
//! prices, selected address text, delivery cost) so later edits to foods
//! or customer addresses never rewrite historical orders.

use super::customer::ProposedAddress;
use serde::{Deserialize, Serialize};

/// Order status lifecycle. See `comanda-core::orders::lifecycle` for the
/// allowed transitions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Initial state, the only state in which line items are editable.
    #[default]
    Preparing,
    /// Delivery dispatched (delivery section only).
    Sent,
    /// Delivered to the customer (delivery section only, terminal).
    Delivered,
    /// Counter checkout done (counter section only, terminal).
    Completed,
    /// Terminal, reachable from Preparing or Sent.
    Cancelled,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Completed | Self::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Preparing => "PREPARING",
            Self::Sent => "SENT",
            Self::Delivered => "DELIVERED",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PREPARING" => Some(Self::Preparing),
            "SENT" => Some(Self::Sent),
            "DELIVERED" => Some(Self::Delivered),
            "COMPLETED" => Some(Self::Completed),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order section
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderSection {
    #[default]
    Counter,
    Delivery,
}

impl OrderSection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Counter => "COUNTER",
            Self::Delivery => "DELIVERY",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "COUNTER" => Some(Self::Counter),
            "DELIVERY" => Some(Self::Delivery),
            _ => None,
        }
    }
}

/// Payment method
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "CASH",
            Self::Card => "CARD",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "CASH" => Some(Self::Cash),
            "CARD" => Some(Self::Card),
            _ => None,
        }
    }
}

/// Who the order is for.
///
/// Tagged variant replacing the legacy duck-typed buyer field that was read
/// as a plain string at some call sites and as a customer reference at
/// others. Downstream code matches on the tag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuyerRef {
    /// Walk-in buyer, no phone given; just a display name.
    InlineName(String),
    /// Registered customer record.
    CustomerRef(i64),
}

/// Buyer portion of an order request.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BuyerInput {
    pub name: Option<String>,
    /// Presence of a phone turns the buyer into a customer upsert.
    pub phone: Option<String>,
    pub comment: Option<String>,
}

/// Line item as submitted by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItemInput {
    pub food_id: i64,
    pub quantity: i64,
}

/// Line item as persisted on the order: a price snapshot, not a live
/// reference to the food record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineItemSnapshot {
    pub food_id: i64,
    pub name: String,
    /// Food price at compile time, minor units.
    pub unit_price: i64,
    pub quantity: i64,
}

impl LineItemSnapshot {
    pub fn line_total(&self) -> i64 {
        self.unit_price * self.quantity
    }
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub restaurant_id: String,
    /// Unique and strictly increasing within `restaurant_id`; assigned once
    /// at creation, immutable thereafter.
    pub order_number: i64,
    pub line_items: Vec<LineItemSnapshot>,
    pub payment_method: PaymentMethod,
    pub section: OrderSection,
    pub status: OrderStatus,
    pub buyer: BuyerRef,
    /// Snapshot of the chosen address text at order time.
    pub selected_address_text: Option<String>,
    /// Snapshot, minor units. 0 for counter/inline-name orders.
    pub delivery_cost: i64,
    /// Derived and persisted: Σ(unit_price × quantity) + delivery_cost.
    pub total: i64,
    pub comment: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Order {
    /// Sum of line totals, excluding delivery cost.
    pub fn subtotal(&self) -> i64 {
        self.line_items.iter().map(|i| i.line_total()).sum()
    }
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub restaurant_id: String,
    pub line_items: Vec<LineItemInput>,
    #[serde(default)]
    pub buyer: BuyerInput,
    /// Proposed delivery addresses, merged into the customer record when a
    /// phone is given.
    #[serde(default)]
    pub addresses: Vec<ProposedAddress>,
    pub selected_address_text: Option<String>,
    pub payment_method: PaymentMethod,
    pub section: OrderSection,
    pub comment: Option<String>,
}

/// Update order payload — all fields optional, absent means unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OrderUpdate {
    pub line_items: Option<Vec<LineItemInput>>,
    pub payment_method: Option<PaymentMethod>,
    pub comment: Option<String>,
    pub buyer: Option<BuyerInput>,
    pub addresses: Option<Vec<ProposedAddress>>,
    pub selected_address_text: Option<String>,
}
