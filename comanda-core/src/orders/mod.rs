//! Order domain
//!
//! - **compiler**: line-item validation, price snapshots, totals
//! - **sequencer**: per-restaurant order numbers (atomic counter rows)
//! - **lifecycle**: the status state machine
//! - **service**: the exposed create/update/transition operations
//!
//! # Data Flow
//!
//! ```text
//! Request → OrderService → compiler (validate/price)
//!                        → CustomerDirectory ⇄ reconciler (buyer/address)
//!                        → OrderSequencer (create only)
//!                        → persisted order → lifecycle transitions
//! ```

pub mod compiler;
pub mod error;
pub mod lifecycle;
pub mod sequencer;
pub mod service;

pub use error::{OrderError, OrderResult};
pub use lifecycle::Transition;
pub use sequencer::OrderSequencer;
pub use service::OrderService;
