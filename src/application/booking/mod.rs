//! Booking module - the booking lifecycle use-cases

pub mod service;

pub use service::BookingService;
