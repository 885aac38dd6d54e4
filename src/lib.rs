//! Land Registry - terminal land registry simulator
//!
//! An in-memory property registry where registrations and ownership
//! transfers are recorded immediately as pending and confirmed after a
//! simulated ledger delay, browsed through a tabbed terminal UI.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;
pub mod error;

pub use domain::*;
pub use application::*;
pub use error::{AppError, AppResult};
