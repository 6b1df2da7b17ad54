//! Customer domain: reconciliation and the directory service.

pub mod directory;
pub mod reconciler;

pub use directory::{CustomerDirectory, DirectoryError, DirectoryResult};
pub use reconciler::{ReconcileError, Reconciled, reconcile};
