//! Booking service
//!
//! Checks run in a fixed order: slot lookup, slot availability, date format,
//! past date, then the duplicate-window rule (enforced by the repository in
//! the same transaction that takes the slot).

use std::sync::Arc;

use tracing::info;

use crate::application::Actor;
use crate::domain::{
    ensure_bookable_date, Booking, BookingDetails, DomainError, DomainResult, NewBooking,
    RepositoryProvider,
};
use crate::shared::time::{parse_booking_date, today};

pub const MAX_VEHICLE_NUMBER_LEN: usize = 20;

#[derive(Clone)]
pub struct BookingService {
    repos: Arc<dyn RepositoryProvider>,
}

fn require_admin(actor: Actor) -> DomainResult<()> {
    if !actor.is_admin {
        return Err(DomainError::Forbidden("Admin access required".into()));
    }
    Ok(())
}

impl BookingService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Book `slot_id` for `date` (`YYYY-MM-DD`) on behalf of `actor`.
    pub async fn create(
        &self,
        actor: Actor,
        slot_id: i32,
        date: &str,
        vehicle_number: &str,
    ) -> DomainResult<Booking> {
        let vehicle_number = vehicle_number.trim();
        if vehicle_number.is_empty() {
            return Err(DomainError::Validation("Missing required fields".into()));
        }
        if vehicle_number.chars().count() > MAX_VEHICLE_NUMBER_LEN {
            return Err(DomainError::Validation(format!(
                "vehicle_number must be at most {} characters",
                MAX_VEHICLE_NUMBER_LEN
            )));
        }

        let slot = self
            .repos
            .slots()
            .find_by_id(slot_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Time slot", slot_id))?;
        if !slot.is_available() {
            return Err(DomainError::Conflict(
                "This time slot is not available".into(),
            ));
        }

        let date = parse_booking_date(date)?;
        ensure_bookable_date(date, today())?;

        let booking = self
            .repos
            .bookings()
            .place(NewBooking {
                user_id: actor.user_id,
                slot_id,
                date,
                vehicle_number: vehicle_number.to_string(),
            })
            .await?;

        metrics::counter!("bookings_created_total").increment(1);
        info!(
            booking_id = booking.id,
            user_id = actor.user_id,
            slot_id,
            date = %booking.date,
            "Booking created"
        );
        Ok(booking)
    }

    /// Cancel an upcoming booking. Owners cancel their own, admins any.
    pub async fn cancel(&self, actor: Actor, id: i32) -> DomainResult<Booking> {
        let booking = self
            .repos
            .bookings()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Booking", id))?;

        if !booking.can_be_managed_by(actor.user_id, actor.is_admin) {
            return Err(DomainError::Forbidden(
                "Unauthorized to cancel this booking".into(),
            ));
        }

        let cancelled = self.repos.bookings().cancel(id).await?;
        metrics::counter!("bookings_cancelled_total").increment(1);
        info!(booking_id = id, by = actor.user_id, "Booking cancelled");
        Ok(cancelled)
    }

    /// Mark an upcoming booking as completed and free its slot.
    pub async fn complete(&self, actor: Actor, id: i32) -> DomainResult<Booking> {
        require_admin(actor)?;
        let completed = self.repos.bookings().complete(id).await?;
        metrics::counter!("bookings_completed_total").increment(1);
        info!(booking_id = id, "Booking completed");
        Ok(completed)
    }

    pub async fn list_own(&self, actor: Actor) -> DomainResult<Vec<BookingDetails>> {
        self.repos.bookings().list_for_user(actor.user_id).await
    }

    pub async fn list_all(&self, actor: Actor) -> DomainResult<Vec<BookingDetails>> {
        require_admin(actor)?;
        self.repos.bookings().list_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::repos;
    use crate::domain::{BookingStatus, NewSlot, NewStation, NewUser, SlotChanges, SlotStatus};

    struct Setup {
        svc: BookingService,
        repos: Arc<dyn RepositoryProvider>,
        user: Actor,
        other: Actor,
        slot_id: i32,
    }

    async fn setup() -> Setup {
        let repos = repos().await;
        let mut ids = Vec::new();
        for email in ["dana@example.com", "lee@example.com"] {
            let user = repos
                .users()
                .create(NewUser {
                    name: "Someone".into(),
                    email: email.into(),
                    password_hash: "x".into(),
                    is_admin: false,
                })
                .await
                .unwrap();
            ids.push(user.id);
        }
        let station = repos
            .stations()
            .create(NewStation {
                name: "Central".into(),
                location: "Downtown".into(),
                total_slots: 1,
                price_per_hour: 1.0,
                image: None,
            })
            .await
            .unwrap();
        let slot = repos
            .slots()
            .create(NewSlot {
                station_id: station.id,
                start_time: "08:00".into(),
                end_time: "09:00".into(),
                status: SlotStatus::Available,
            })
            .await
            .unwrap();
        Setup {
            svc: BookingService::new(repos.clone()),
            repos,
            user: Actor::user(ids[0]),
            other: Actor::user(ids[1]),
            slot_id: slot.id,
        }
    }

    #[tokio::test]
    async fn booking_flips_slot_and_blocks_second_attempt() {
        let s = setup().await;
        let booking = s.svc.create(s.user, s.slot_id, "2099-01-01", "AB123").await.unwrap();
        assert_eq!(booking.status, BookingStatus::Upcoming);

        let slot = s.repos.slots().find_by_id(s.slot_id).await.unwrap().unwrap();
        assert_eq!(slot.status, SlotStatus::Booked);

        let err = s
            .svc
            .create(s.other, s.slot_id, "2099-01-01", "XY999")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn rejects_bad_input_in_order() {
        let s = setup().await;
        let err = s.svc.create(s.user, 999, "2099-01-01", "AB1").await.unwrap_err();
        assert_eq!(err.to_string(), "Time slot not found");

        let err = s.svc.create(s.user, s.slot_id, "01-01-2099", "AB1").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid date format");

        let err = s.svc.create(s.user, s.slot_id, "2000-01-01", "AB1").await.unwrap_err();
        assert_eq!(err.to_string(), "Cannot book for past dates");

        let err = s.svc.create(s.user, s.slot_id, "2099-01-01", "  ").await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let long = "X".repeat(MAX_VEHICLE_NUMBER_LEN + 1);
        assert!(s.svc.create(s.user, s.slot_id, "2099-01-01", &long).await.is_err());
    }

    #[tokio::test]
    async fn maintenance_slot_is_not_bookable() {
        let s = setup().await;
        s.repos
            .slots()
            .update(
                s.slot_id,
                SlotChanges {
                    status: Some(SlotStatus::Maintenance),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let err = s
            .svc
            .create(s.user, s.slot_id, "2099-01-01", "AB1")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "This time slot is not available");
    }

    #[tokio::test]
    async fn only_owner_or_admin_cancels() {
        let s = setup().await;
        let booking = s.svc.create(s.user, s.slot_id, "2099-01-01", "AB1").await.unwrap();

        let err = s.svc.cancel(s.other, booking.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));

        let cancelled = s.svc.cancel(Actor::admin(s.other.user_id), booking.id).await.unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);
        let slot = s.repos.slots().find_by_id(s.slot_id).await.unwrap().unwrap();
        assert_eq!(slot.status, SlotStatus::Available);

        let err = s.svc.cancel(s.user, booking.id).await.unwrap_err();
        assert_eq!(err.to_string(), "Only upcoming bookings can be cancelled");
    }

    #[tokio::test]
    async fn complete_and_list_all_need_admin() {
        let s = setup().await;
        let booking = s.svc.create(s.user, s.slot_id, "2099-01-01", "AB1").await.unwrap();

        assert!(matches!(
            s.svc.complete(s.user, booking.id).await,
            Err(DomainError::Forbidden(_))
        ));
        assert!(matches!(
            s.svc.list_all(s.user).await,
            Err(DomainError::Forbidden(_))
        ));

        let admin = Actor::admin(s.other.user_id);
        let done = s.svc.complete(admin, booking.id).await.unwrap();
        assert_eq!(done.status, BookingStatus::Completed);
        assert_eq!(s.svc.list_all(admin).await.unwrap().len(), 1);
        assert_eq!(s.svc.list_own(s.user).await.unwrap().len(), 1);
        assert!(s.svc.list_own(s.other).await.unwrap().is_empty());
    }
}
