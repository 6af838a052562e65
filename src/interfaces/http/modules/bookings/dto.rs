//! Booking DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{Booking, BookingDetails};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBookingRequest {
    pub slot_id: i32,
    /// Calendar date, `YYYY-MM-DD`
    #[validate(length(min = 1, message = "date is required"))]
    pub date: String,
    #[validate(length(min = 1, max = 20, message = "vehicle_number must be 1-20 characters"))]
    pub vehicle_number: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BookingDto {
    pub id: i32,
    pub user_id: i32,
    pub slot_id: i32,
    pub date: NaiveDate,
    pub vehicle_number: String,
    /// `upcoming`, `completed` or `cancelled`
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<Booking> for BookingDto {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id,
            user_id: b.user_id,
            slot_id: b.slot_id,
            date: b.date,
            vehicle_number: b.vehicle_number,
            status: b.status.as_str().to_string(),
            created_at: b.created_at,
        }
    }
}

/// Booking row in listings, joined with its station and slot
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingListItem {
    pub id: i32,
    /// Present in the admin listing only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    pub station_id: i32,
    pub station_name: String,
    pub slot_id: i32,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub vehicle_number: String,
    pub status: String,
}

impl BookingListItem {
    pub fn new(d: BookingDetails, with_user: bool) -> Self {
        Self {
            id: d.id,
            user_name: with_user.then_some(d.user_name),
            station_id: d.station_id,
            station_name: d.station_name,
            slot_id: d.slot_id,
            date: d.date,
            start_time: d.start_time,
            end_time: d.end_time,
            vehicle_number: d.vehicle_number,
            status: d.status.as_str().to_string(),
        }
    }
}
