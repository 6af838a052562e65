//! SeaORM implementation of SlotRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::{debug, info};

use crate::domain::{DomainError, DomainResult, NewSlot, Slot, SlotChanges, SlotRepository, SlotStatus};
use crate::infrastructure::database::entities::{booking, slot};

pub struct SeaOrmSlotRepository {
    db: DatabaseConnection,
}

impl SeaOrmSlotRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

pub(super) fn status_to_domain(status: slot::SlotStatus) -> SlotStatus {
    match status {
        slot::SlotStatus::Available => SlotStatus::Available,
        slot::SlotStatus::Booked => SlotStatus::Booked,
        slot::SlotStatus::Maintenance => SlotStatus::Maintenance,
    }
}

fn status_to_entity(status: SlotStatus) -> slot::SlotStatus {
    match status {
        SlotStatus::Available => slot::SlotStatus::Available,
        SlotStatus::Booked => slot::SlotStatus::Booked,
        SlotStatus::Maintenance => slot::SlotStatus::Maintenance,
    }
}

pub(super) fn model_to_domain(model: slot::Model) -> Slot {
    Slot {
        id: model.id,
        station_id: model.station_id,
        start_time: model.start_time,
        end_time: model.end_time,
        status: status_to_domain(model.status),
    }
}

#[async_trait]
impl SlotRepository for SeaOrmSlotRepository {
    async fn create(&self, new_slot: NewSlot) -> DomainResult<Slot> {
        let model = slot::ActiveModel {
            id: NotSet,
            station_id: Set(new_slot.station_id),
            start_time: Set(new_slot.start_time),
            end_time: Set(new_slot.end_time),
            status: Set(status_to_entity(new_slot.status)),
        };
        let saved = model.insert(&self.db).await?;
        debug!(slot_id = saved.id, station_id = saved.station_id, "Slot created");
        Ok(model_to_domain(saved))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Slot>> {
        let model = slot::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(model_to_domain))
    }

    async fn list_for_station(&self, station_id: i32) -> DomainResult<Vec<Slot>> {
        let models = slot::Entity::find()
            .filter(slot::Column::StationId.eq(station_id))
            .order_by_asc(slot::Column::StartTime)
            .order_by_asc(slot::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn update(&self, id: i32, changes: SlotChanges) -> DomainResult<Option<Slot>> {
        let Some(existing) = slot::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        let previous_status = existing.status;

        let mut updated = model_to_domain(existing);
        changes.apply(&mut updated)?;

        // Guard on the status we read so a booking placed in between is not
        // overwritten.
        let active = slot::ActiveModel {
            id: NotSet,
            station_id: NotSet,
            start_time: Set(updated.start_time.clone()),
            end_time: Set(updated.end_time.clone()),
            status: Set(status_to_entity(updated.status)),
        };
        let result = slot::Entity::update_many()
            .set(active)
            .filter(slot::Column::Id.eq(id))
            .filter(slot::Column::Status.eq(previous_status))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(DomainError::Conflict(
                "Time slot was modified concurrently".into(),
            ));
        }
        Ok(Some(updated))
    }

    async fn delete_cascade(&self, id: i32) -> DomainResult<bool> {
        let txn = self.db.begin().await?;

        if slot::Entity::find_by_id(id).one(&txn).await?.is_none() {
            return Ok(false);
        }

        let removed = booking::Entity::delete_many()
            .filter(booking::Column::SlotId.eq(id))
            .exec(&txn)
            .await?;
        slot::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        info!(
            slot_id = id,
            bookings_removed = removed.rows_affected,
            "Slot deleted"
        );
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewStation, StationRepository};
    use crate::infrastructure::database::repositories::SeaOrmStationRepository;
    use crate::infrastructure::database::test_connection;

    async fn setup() -> (SeaOrmSlotRepository, i32) {
        let db = test_connection().await;
        let station = SeaOrmStationRepository::new(db.clone())
            .create(NewStation {
                name: "Central".into(),
                location: "Downtown".into(),
                total_slots: 2,
                price_per_hour: 1.0,
                image: None,
            })
            .await
            .unwrap();
        (SeaOrmSlotRepository::new(db), station.id)
    }

    fn new_slot(station_id: i32, start: &str, end: &str) -> NewSlot {
        NewSlot {
            station_id,
            start_time: start.into(),
            end_time: end.into(),
            status: SlotStatus::Available,
        }
    }

    #[tokio::test]
    async fn slots_are_listed_by_start_time() {
        let (repo, station_id) = setup().await;
        repo.create(new_slot(station_id, "10:00", "11:00")).await.unwrap();
        repo.create(new_slot(station_id, "08:00", "09:00")).await.unwrap();

        let slots = repo.list_for_station(station_id).await.unwrap();
        let starts: Vec<_> = slots.iter().map(|s| s.start_time.as_str()).collect();
        assert_eq!(starts, vec!["08:00", "10:00"]);
        assert!(repo.list_for_station(station_id + 1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_applies_partial_changes() {
        let (repo, station_id) = setup().await;
        let slot = repo.create(new_slot(station_id, "08:00", "09:00")).await.unwrap();

        let updated = repo
            .update(
                slot.id,
                SlotChanges {
                    end_time: Some("09:30".into()),
                    status: Some(SlotStatus::Maintenance),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.start_time, "08:00");
        assert_eq!(updated.end_time, "09:30");

        let stored = repo.find_by_id(slot.id).await.unwrap().unwrap();
        assert_eq!(stored, updated);
    }

    #[tokio::test]
    async fn update_rejects_invalid_window_and_missing_slot() {
        let (repo, station_id) = setup().await;
        let slot = repo.create(new_slot(station_id, "08:00", "09:00")).await.unwrap();

        let err = repo
            .update(
                slot.id,
                SlotChanges {
                    start_time: Some("09:00".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(repo.update(999, SlotChanges::default()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_removes_slot() {
        let (repo, station_id) = setup().await;
        let slot = repo.create(new_slot(station_id, "08:00", "09:00")).await.unwrap();
        assert!(repo.delete_cascade(slot.id).await.unwrap());
        assert!(repo.find_by_id(slot.id).await.unwrap().is_none());
        assert!(!repo.delete_cascade(slot.id).await.unwrap());
    }
}
