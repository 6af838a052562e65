//! Domain layer
//!
//! Entities, status types and the booking rules, plus the repository
//! interfaces the application layer depends on.

pub mod booking;
pub mod repositories;
pub mod slot;
pub mod station;
pub mod user;

pub use booking::{
    ensure_bookable_date, Booking, BookingDetails, BookingRepository, BookingStatus, NewBooking,
};
pub use repositories::RepositoryProvider;
pub use slot::{NewSlot, Slot, SlotChanges, SlotRepository, SlotStatus};
pub use station::{NewStation, Station, StationChanges, StationOverview, StationRepository};
pub use user::{NewUser, User, UserRepository, UserRole};

pub use crate::shared::errors::{DomainError, DomainResult};
