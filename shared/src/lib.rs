//! Shared types for the Comanda POS backend
//!
//! Data models and small utilities used by the order/customer engine and
//! any outer surface (CLI/HTTP layers live elsewhere).

pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
