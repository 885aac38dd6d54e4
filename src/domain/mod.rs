pub mod models;
pub mod services;
pub mod errors;
pub mod events;
pub mod scheduler;
pub mod projections;

pub use models::*;
pub use services::*;
pub use errors::*;
pub use events::*;
pub use scheduler::*;
pub use projections::*;
