//! Catalog module - stations and their bookable time slots

pub mod slots;
pub mod stations;

pub use slots::SlotService;
pub use stations::StationService;
