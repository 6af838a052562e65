//! SeaORM implementation of BookingRepository
//!
//! Every status transition writes the booking row and its slot inside one
//! transaction. Slot flips are conditional updates checked through
//! `rows_affected`, so two concurrent bookings of the same slot cannot both
//! succeed.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, NotSet,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::{debug, info};

use crate::domain::{
    Booking, BookingDetails, BookingRepository, BookingStatus, DomainError, DomainResult,
    NewBooking,
};
use crate::infrastructure::database::entities::{booking, slot, station, user};

use super::slot_repository;

pub struct SeaOrmBookingRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Move an upcoming booking to a terminal state and free its slot.
    async fn finish(
        &self,
        id: i32,
        transition: fn(&mut Booking) -> DomainResult<()>,
    ) -> DomainResult<Booking> {
        let txn = self.db.begin().await?;

        let model = booking::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| DomainError::not_found("Booking", id))?;
        let mut booking = model_to_domain(model);
        transition(&mut booking)?;

        let result = booking::Entity::update_many()
            .col_expr(
                booking::Column::Status,
                Expr::value(status_to_entity(booking.status)),
            )
            .filter(booking::Column::Id.eq(id))
            .filter(booking::Column::Status.eq(booking::BookingStatus::Upcoming))
            .exec(&txn)
            .await?;
        if result.rows_affected == 0 {
            return Err(DomainError::Conflict(
                "Booking is no longer upcoming".into(),
            ));
        }

        release_slot(&txn, booking.slot_id).await?;
        txn.commit().await?;

        info!(
            booking_id = id,
            slot_id = booking.slot_id,
            status = %booking.status,
            "Booking finished"
        );
        Ok(booking)
    }

    async fn details(&self, models: Vec<booking::Model>) -> DomainResult<Vec<BookingDetails>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let slot_ids: Vec<i32> = models.iter().map(|m| m.slot_id).collect();
        let user_ids: Vec<i32> = models.iter().map(|m| m.user_id).collect();

        let slots: HashMap<i32, slot::Model> = slot::Entity::find()
            .filter(slot::Column::Id.is_in(slot_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        let station_ids: Vec<i32> = slots.values().map(|s| s.station_id).collect();
        let stations: HashMap<i32, String> = station::Entity::find()
            .filter(station::Column::Id.is_in(station_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|s| (s.id, s.name))
            .collect();

        let users: HashMap<i32, String> = user::Entity::find()
            .filter(user::Column::Id.is_in(user_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|u| (u.id, u.name))
            .collect();

        Ok(models
            .into_iter()
            .filter_map(|b| {
                let slot = slots.get(&b.slot_id)?;
                Some(BookingDetails {
                    id: b.id,
                    user_id: b.user_id,
                    user_name: users.get(&b.user_id).cloned().unwrap_or_default(),
                    slot_id: b.slot_id,
                    station_id: slot.station_id,
                    station_name: stations.get(&slot.station_id).cloned().unwrap_or_default(),
                    date: b.date,
                    start_time: slot.start_time.clone(),
                    end_time: slot.end_time.clone(),
                    vehicle_number: b.vehicle_number,
                    status: status_to_domain(b.status),
                })
            })
            .collect())
    }
}

fn status_to_domain(status: booking::BookingStatus) -> BookingStatus {
    match status {
        booking::BookingStatus::Upcoming => BookingStatus::Upcoming,
        booking::BookingStatus::Completed => BookingStatus::Completed,
        booking::BookingStatus::Cancelled => BookingStatus::Cancelled,
    }
}

fn status_to_entity(status: BookingStatus) -> booking::BookingStatus {
    match status {
        BookingStatus::Upcoming => booking::BookingStatus::Upcoming,
        BookingStatus::Completed => booking::BookingStatus::Completed,
        BookingStatus::Cancelled => booking::BookingStatus::Cancelled,
    }
}

fn model_to_domain(model: booking::Model) -> Booking {
    Booking {
        id: model.id,
        user_id: model.user_id,
        slot_id: model.slot_id,
        date: model.date,
        vehicle_number: model.vehicle_number,
        status: status_to_domain(model.status),
        created_at: model.created_at,
    }
}

async fn release_slot(txn: &DatabaseTransaction, slot_id: i32) -> DomainResult<()> {
    slot::Entity::update_many()
        .col_expr(slot::Column::Status, Expr::value(slot::SlotStatus::Available))
        .filter(slot::Column::Id.eq(slot_id))
        .filter(slot::Column::Status.eq(slot::SlotStatus::Booked))
        .exec(txn)
        .await?;
    Ok(())
}

#[async_trait]
impl BookingRepository for SeaOrmBookingRepository {
    async fn place(&self, new_booking: NewBooking) -> DomainResult<Booking> {
        let txn = self.db.begin().await?;

        let slot_model = slot::Entity::find_by_id(new_booking.slot_id)
            .one(&txn)
            .await?
            .ok_or_else(|| DomainError::not_found("Time slot", new_booking.slot_id))?;
        let mut slot = slot_repository::model_to_domain(slot_model);
        slot.reserve()?;

        let duplicates = booking::Entity::find()
            .inner_join(slot::Entity)
            .filter(booking::Column::UserId.eq(new_booking.user_id))
            .filter(booking::Column::Date.eq(new_booking.date))
            .filter(booking::Column::Status.eq(booking::BookingStatus::Upcoming))
            .filter(slot::Column::StartTime.eq(slot.start_time.as_str()))
            .filter(slot::Column::EndTime.eq(slot.end_time.as_str()))
            .count(&txn)
            .await?;
        if duplicates > 0 {
            return Err(DomainError::Conflict(
                "You already have a booking for this time slot".into(),
            ));
        }

        let flipped = slot::Entity::update_many()
            .col_expr(slot::Column::Status, Expr::value(slot::SlotStatus::Booked))
            .filter(slot::Column::Id.eq(slot.id))
            .filter(slot::Column::Status.eq(slot::SlotStatus::Available))
            .exec(&txn)
            .await?;
        if flipped.rows_affected == 0 {
            return Err(DomainError::Conflict(
                "This time slot is not available".into(),
            ));
        }

        let saved = booking::ActiveModel {
            id: NotSet,
            user_id: Set(new_booking.user_id),
            slot_id: Set(slot.id),
            date: Set(new_booking.date),
            vehicle_number: Set(new_booking.vehicle_number),
            status: Set(booking::BookingStatus::Upcoming),
            created_at: Set(Utc::now()),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        debug!(booking_id = saved.id, slot_id = saved.slot_id, "Booking placed");
        Ok(model_to_domain(saved))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Booking>> {
        let model = booking::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(model_to_domain))
    }

    async fn cancel(&self, id: i32) -> DomainResult<Booking> {
        self.finish(id, Booking::cancel).await
    }

    async fn complete(&self, id: i32) -> DomainResult<Booking> {
        self.finish(id, Booking::complete).await
    }

    async fn list_for_user(&self, user_id: i32) -> DomainResult<Vec<BookingDetails>> {
        let models = booking::Entity::find()
            .filter(booking::Column::UserId.eq(user_id))
            .order_by_asc(booking::Column::Date)
            .order_by_asc(booking::Column::Id)
            .all(&self.db)
            .await?;
        self.details(models).await
    }

    async fn list_all(&self) -> DomainResult<Vec<BookingDetails>> {
        let models = booking::Entity::find()
            .order_by_asc(booking::Column::Date)
            .order_by_asc(booking::Column::Id)
            .all(&self.db)
            .await?;
        self.details(models).await
    }
}
