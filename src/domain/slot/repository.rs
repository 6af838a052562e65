//! Slot repository interface

use async_trait::async_trait;

use super::model::{NewSlot, Slot, SlotChanges};
use crate::domain::DomainResult;

#[async_trait]
pub trait SlotRepository: Send + Sync {
    async fn create(&self, slot: NewSlot) -> DomainResult<Slot>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Slot>>;

    async fn list_for_station(&self, station_id: i32) -> DomainResult<Vec<Slot>>;

    /// Apply a partial update. Returns `None` when the slot does not exist.
    async fn update(&self, id: i32, changes: SlotChanges) -> DomainResult<Option<Slot>>;

    /// Delete a slot and its bookings in one transaction.
    /// Returns `false` when the slot does not exist.
    async fn delete_cascade(&self, id: i32) -> DomainResult<bool>;
}
