//! Data models
//!
//! Shared between the engine and any API surface. All IDs are `i64`
//! (snowflake, see `shared::util`); order IDs are UUID strings; monetary
//! values are `i64` minor currency units.

pub mod customer;
pub mod food;
pub mod order;

// Re-exports
pub use customer::*;
pub use food::*;
pub use order::*;
