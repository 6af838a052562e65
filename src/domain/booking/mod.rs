//! Booking aggregate
//!
//! A user's reservation of a slot for a given date, its status machine and
//! the repository interface that persists transitions atomically.

pub mod model;
pub mod repository;

pub use model::{ensure_bookable_date, Booking, BookingDetails, BookingStatus, NewBooking};
pub use repository::BookingRepository;
