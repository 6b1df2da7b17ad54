//! Food Model
//!
//! Menu-item CRUD is a plain record surface and lives outside the engine;
//! the engine only resolves foods by id within a restaurant scope when
//! pricing an order.

use serde::{Deserialize, Serialize};

/// Food entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Food {
    pub id: i64,
    /// Tenant boundary — ownership checks are scoped per restaurant.
    pub restaurant_id: String,
    pub name: String,
    /// Minor currency units.
    pub price: i64,
}

/// Create food payload (seeding/provisioning)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodCreate {
    pub restaurant_id: String,
    pub name: String,
    pub price: i64,
}
