//! Identity module - accounts and authentication
//!
//! Contains the `UserService` which handles registration, login, admin
//! promotion, account removal and seeding of the first administrator.

pub mod service;

pub use service::{AuthResult, UserService};
