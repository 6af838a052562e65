//! Station DTOs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::{NewStation, Station, StationChanges, StationOverview};

/// Station with its current number of bookable slots
#[derive(Debug, Serialize, ToSchema)]
pub struct StationDto {
    pub id: i32,
    pub name: String,
    pub location: String,
    pub total_slots: i32,
    pub available_slots: u64,
    pub price_per_hour: f64,
    pub image: Option<String>,
}

impl From<StationOverview> for StationDto {
    fn from(o: StationOverview) -> Self {
        let StationOverview {
            station,
            available_slots,
        } = o;
        Self {
            id: station.id,
            name: station.name,
            location: station.location,
            total_slots: station.total_slots,
            available_slots,
            price_per_hour: station.price_per_hour,
            image: station.image,
        }
    }
}

impl StationDto {
    /// Freshly created stations have no slots yet
    pub fn without_slots(station: Station) -> Self {
        Self::from(StationOverview {
            station,
            available_slots: 0,
        })
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateStationRequest {
    #[validate(length(min = 1, max = 100, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 200, message = "location is required"))]
    pub location: String,
    #[validate(range(min = 0, message = "total_slots must not be negative"))]
    pub total_slots: i32,
    #[validate(range(min = 0.0, message = "price_per_hour must not be negative"))]
    pub price_per_hour: f64,
    #[validate(length(max = 200))]
    pub image: Option<String>,
}

impl From<CreateStationRequest> for NewStation {
    fn from(r: CreateStationRequest) -> Self {
        Self {
            name: r.name,
            location: r.location,
            total_slots: r.total_slots,
            price_per_hour: r.price_per_hour,
            image: r.image,
        }
    }
}

/// Partial update; omitted fields keep their value
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateStationRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub location: Option<String>,
    #[validate(range(min = 0))]
    pub total_slots: Option<i32>,
    #[validate(range(min = 0.0))]
    pub price_per_hour: Option<f64>,
    #[validate(length(max = 200))]
    pub image: Option<String>,
}

impl From<UpdateStationRequest> for StationChanges {
    fn from(r: UpdateStationRequest) -> Self {
        Self {
            name: r.name,
            location: r.location,
            total_slots: r.total_slots,
            price_per_hour: r.price_per_hour,
            image: r.image,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct LocationSearchParams {
    /// Substring of the station location
    pub location: String,
}
