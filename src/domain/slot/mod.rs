//! Slot aggregate
//!
//! A bookable time window at a station.

pub mod model;
pub mod repository;

pub use model::{NewSlot, Slot, SlotChanges, SlotStatus};
pub use repository::SlotRepository;
