//! Auth module - registration, login and the current account

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
