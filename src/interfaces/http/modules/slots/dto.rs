//! Slot DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{DomainError, DomainResult, Slot, SlotStatus};

#[derive(Debug, Serialize, ToSchema)]
pub struct SlotDto {
    pub id: i32,
    pub station_id: i32,
    /// "HH:MM"
    pub start_time: String,
    /// "HH:MM"
    pub end_time: String,
    /// `available`, `booked` or `maintenance`
    pub status: String,
}

impl From<Slot> for SlotDto {
    fn from(s: Slot) -> Self {
        Self {
            id: s.id,
            station_id: s.station_id,
            start_time: s.start_time,
            end_time: s.end_time,
            status: s.status.as_str().to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSlotRequest {
    pub station_id: i32,
    #[validate(length(equal = 5, message = "start_time must be HH:MM"))]
    pub start_time: String,
    #[validate(length(equal = 5, message = "end_time must be HH:MM"))]
    pub end_time: String,
    /// Defaults to `available`
    pub status: Option<String>,
}

/// Partial update; omitted fields keep their value
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateSlotRequest {
    #[validate(length(equal = 5, message = "start_time must be HH:MM"))]
    pub start_time: Option<String>,
    #[validate(length(equal = 5, message = "end_time must be HH:MM"))]
    pub end_time: Option<String>,
    pub status: Option<String>,
}

/// Parse an optional status field from a request body
pub fn parse_status(raw: Option<&str>) -> DomainResult<Option<SlotStatus>> {
    raw.map(|s| {
        SlotStatus::parse(s.trim()).ok_or_else(|| {
            DomainError::Validation(format!(
                "Invalid status '{}', expected available, booked or maintenance",
                s
            ))
        })
    })
    .transpose()
}
