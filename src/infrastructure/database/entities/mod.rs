//! Database entities module

pub mod booking;
pub mod slot;
pub mod station;
pub mod user;

pub use booking::Entity as Booking;
pub use slot::Entity as Slot;
pub use station::Entity as Station;
pub use user::Entity as User;
