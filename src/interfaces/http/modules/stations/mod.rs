//! Stations module - station CRUD and location lookups

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
