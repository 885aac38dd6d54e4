//! Presentation layer handling terminal UI and user input.
//!
//! Renders the four registry tabs, the details dialog and toasts with
//! ratatui, and maps key presses onto [`App`](crate::application::App)
//! operations.

pub mod ui;
pub mod input;

pub use ui::*;
pub use input::*;
