//! Station repository interface

use async_trait::async_trait;

use super::model::{NewStation, Station, StationChanges, StationOverview};
use crate::domain::DomainResult;

#[async_trait]
pub trait StationRepository: Send + Sync {
    async fn create(&self, station: NewStation) -> DomainResult<Station>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Station>>;

    /// Station with its count of `available` slots
    async fn overview(&self, id: i32) -> DomainResult<Option<StationOverview>>;

    /// All stations with their count of `available` slots
    async fn list(&self) -> DomainResult<Vec<StationOverview>>;

    /// Apply a partial update. Returns `None` when the station does not exist.
    async fn update(&self, id: i32, changes: StationChanges) -> DomainResult<Option<Station>>;

    /// Delete a station together with its slots and their bookings, in one
    /// transaction. Returns `false` when the station does not exist.
    async fn delete_cascade(&self, id: i32) -> DomainResult<bool>;

    /// Distinct station locations, sorted
    async fn locations(&self) -> DomainResult<Vec<String>>;

    /// Stations whose location equals `location` exactly
    async fn find_by_location(&self, location: &str) -> DomainResult<Vec<StationOverview>>;

    /// Stations whose location contains `fragment`
    async fn search_by_location(&self, fragment: &str) -> DomainResult<Vec<StationOverview>>;
}
