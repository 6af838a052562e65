//! # Station Booking
//!
//! Booking backend for EV charging stations: stations, their time slots,
//! user bookings and account administration over a JSON REST API.
//!
//! ## Architecture
//!
//! - **domain**: entities, status rules and repository traits
//! - **application**: use-case services (authorization, validation, cascades)
//! - **infrastructure**: SeaORM persistence, migrations, bcrypt/JWT helpers
//! - **interfaces**: axum REST API with Swagger documentation
//! - **server**: runtime lifecycle shared by the binaries

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

// Re-export API router
pub use interfaces::http::create_api_router;
