//! Station aggregate
//!
//! A charging station and the repository interface for it. Slots belong to
//! a station and are removed with it.

pub mod model;
pub mod repository;

pub use model::{NewStation, Station, StationChanges, StationOverview};
pub use repository::StationRepository;
