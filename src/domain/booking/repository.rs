//! Booking repository interface

use async_trait::async_trait;

use super::model::{Booking, BookingDetails, NewBooking};
use crate::domain::DomainResult;

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Create an `upcoming` booking and flip its slot to `booked`, in one
    /// transaction.
    ///
    /// Fails with `NotFound` for an unknown slot and with `Conflict` when the
    /// slot is not available or the user already holds an upcoming booking
    /// for the same date and time window.
    async fn place(&self, booking: NewBooking) -> DomainResult<Booking>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Booking>>;

    /// `upcoming → cancelled`; the slot goes back to `available`.
    async fn cancel(&self, id: i32) -> DomainResult<Booking>;

    /// `upcoming → completed`; the slot goes back to `available`.
    async fn complete(&self, id: i32) -> DomainResult<Booking>;

    /// Bookings of one user, ordered by date
    async fn list_for_user(&self, user_id: i32) -> DomainResult<Vec<BookingDetails>>;

    /// Every booking, ordered by date
    async fn list_all(&self) -> DomainResult<Vec<BookingDetails>>;
}
