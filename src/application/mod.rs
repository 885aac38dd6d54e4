//! Application layer managing state and user workflows.
//!
//! This module sits between the registry domain and the terminal
//! presentation: it owns the registry store, the registration form, the
//! details dialog and the toast stack.

pub mod state;
pub mod form;
pub mod notifications;
pub mod text_input;

pub use state::*;
pub use form::*;
pub use notifications::*;
pub use text_input::*;
