//! Infrastructure layer providing external service integrations.
//!
//! Configuration loading, log file setup and the ledger CSV report live
//! here; nothing in this layer holds registry state.

pub mod config;
pub mod export;
pub mod logging;

pub use config::*;
pub use export::*;
pub use logging::*;
