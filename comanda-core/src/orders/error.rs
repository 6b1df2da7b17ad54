//! Order engine errors

use crate::customers::{DirectoryError, ReconcileError};
use crate::db::repository::RepoError;
use shared::models::OrderStatus;
use thiserror::Error;

/// Order engine errors
///
/// Validation and state errors are rejected synchronously with no partial
/// writes; `WriteConflict` is the operational surface of exhausted
/// concurrency retries.
#[derive(Debug, Error)]
pub enum OrderError {
    // ========== Validation ==========
    #[error("Order must contain at least one line item")]
    EmptyLineItems,

    #[error("Line item quantity must be between 1 and {max}, got {quantity} for food {food_id}")]
    InvalidQuantity {
        food_id: i64,
        quantity: i64,
        max: i64,
    },

    #[error("Food {food_id} does not belong to this restaurant")]
    ForeignLineItem { food_id: i64 },

    #[error("Delivery cost must be non-negative for address '{text}', got {delivery_cost}")]
    NegativeDeliveryCost { text: String, delivery_cost: i64 },

    #[error("An address selection requires a customer phone number")]
    AddressWithoutCustomer,

    // ========== Consistency ==========
    #[error("Address not associated with customer: {0}")]
    AddressNotAssociated(String),

    // ========== State ==========
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Order is not editable in status {status}")]
    OrderNotEditable { status: OrderStatus },

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    // ========== Operational ==========
    #[error("Write conflict persisted after {0} retries")]
    WriteConflict(u32),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<ReconcileError> for OrderError {
    fn from(err: ReconcileError) -> Self {
        match err {
            ReconcileError::AddressNotAssociated(text) => OrderError::AddressNotAssociated(text),
            ReconcileError::NegativeDeliveryCost {
                text,
                delivery_cost,
            } => OrderError::NegativeDeliveryCost {
                text,
                delivery_cost,
            },
        }
    }
}

impl From<DirectoryError> for OrderError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::Reconcile(e) => e.into(),
            DirectoryError::Repo(e) => OrderError::Repo(e),
            DirectoryError::ConflictRetriesExhausted(n) => OrderError::WriteConflict(n),
        }
    }
}

pub type OrderResult<T> = Result<T, OrderError>;
