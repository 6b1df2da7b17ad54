//! Core: configuration and engine wiring.

pub mod bootstrap;
pub mod config;
pub mod engine;

pub use bootstrap::setup_environment;
pub use config::Config;
pub use engine::Engine;
