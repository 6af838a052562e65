//! SeaORM implementation of StationRepository

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    NotSet, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::info;

use crate::domain::{
    DomainResult, NewStation, Station, StationChanges, StationOverview, StationRepository,
};
use crate::infrastructure::database::entities::{booking, slot, station};

pub struct SeaOrmStationRepository {
    db: DatabaseConnection,
}

impl SeaOrmStationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Attach available-slot counts to a batch of stations
    async fn with_availability(
        &self,
        models: Vec<station::Model>,
    ) -> DomainResult<Vec<StationOverview>> {
        let ids: Vec<i32> = models.iter().map(|m| m.id).collect();
        let counts = available_counts(&self.db, ids).await?;
        Ok(models
            .into_iter()
            .map(|m| {
                let available_slots = counts.get(&m.id).copied().unwrap_or(0);
                StationOverview {
                    station: model_to_domain(m),
                    available_slots,
                }
            })
            .collect())
    }
}

fn model_to_domain(model: station::Model) -> Station {
    Station {
        id: model.id,
        name: model.name,
        location: model.location,
        total_slots: model.total_slots,
        price_per_hour: model.price_per_hour,
        image: model.image,
    }
}

/// Count `available` slots per station
async fn available_counts<C: ConnectionTrait>(
    db: &C,
    station_ids: Vec<i32>,
) -> Result<HashMap<i32, u64>, DbErr> {
    if station_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<(i32, i64)> = slot::Entity::find()
        .select_only()
        .column(slot::Column::StationId)
        .column_as(Expr::col(slot::Column::Id).count(), "available")
        .filter(slot::Column::StationId.is_in(station_ids))
        .filter(slot::Column::Status.eq(slot::SlotStatus::Available))
        .group_by(slot::Column::StationId)
        .into_tuple()
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(id, count)| (id, count.max(0) as u64))
        .collect())
}

#[async_trait]
impl StationRepository for SeaOrmStationRepository {
    async fn create(&self, new_station: NewStation) -> DomainResult<Station> {
        let model = station::ActiveModel {
            id: NotSet,
            name: Set(new_station.name),
            location: Set(new_station.location),
            total_slots: Set(new_station.total_slots),
            price_per_hour: Set(new_station.price_per_hour),
            image: Set(new_station.image),
        };
        let saved = model.insert(&self.db).await?;
        info!(station_id = saved.id, name = %saved.name, "Station created");
        Ok(model_to_domain(saved))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Station>> {
        let model = station::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(model_to_domain))
    }

    async fn overview(&self, id: i32) -> DomainResult<Option<StationOverview>> {
        let Some(model) = station::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        Ok(self.with_availability(vec![model]).await?.pop())
    }

    async fn list(&self) -> DomainResult<Vec<StationOverview>> {
        let models = station::Entity::find()
            .order_by_asc(station::Column::Id)
            .all(&self.db)
            .await?;
        self.with_availability(models).await
    }

    async fn update(&self, id: i32, changes: StationChanges) -> DomainResult<Option<Station>> {
        let Some(existing) = station::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut station = model_to_domain(existing.clone());
        changes.apply(&mut station);

        let mut active: station::ActiveModel = existing.into();
        active.name = Set(station.name);
        active.location = Set(station.location);
        active.total_slots = Set(station.total_slots);
        active.price_per_hour = Set(station.price_per_hour);
        active.image = Set(station.image);

        let updated = active.update(&self.db).await?;
        Ok(Some(model_to_domain(updated)))
    }

    async fn delete_cascade(&self, id: i32) -> DomainResult<bool> {
        let txn = self.db.begin().await?;

        if station::Entity::find_by_id(id).one(&txn).await?.is_none() {
            return Ok(false);
        }

        let slot_ids: Vec<i32> = slot::Entity::find()
            .select_only()
            .column(slot::Column::Id)
            .filter(slot::Column::StationId.eq(id))
            .into_tuple()
            .all(&txn)
            .await?;

        let bookings_removed = if slot_ids.is_empty() {
            0
        } else {
            booking::Entity::delete_many()
                .filter(booking::Column::SlotId.is_in(slot_ids.clone()))
                .exec(&txn)
                .await?
                .rows_affected
        };

        slot::Entity::delete_many()
            .filter(slot::Column::StationId.eq(id))
            .exec(&txn)
            .await?;
        station::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        info!(
            station_id = id,
            slots_removed = slot_ids.len(),
            bookings_removed,
            "Station deleted"
        );
        Ok(true)
    }

    async fn locations(&self) -> DomainResult<Vec<String>> {
        let locations: Vec<String> = station::Entity::find()
            .select_only()
            .column(station::Column::Location)
            .distinct()
            .order_by_asc(station::Column::Location)
            .into_tuple()
            .all(&self.db)
            .await?;
        Ok(locations)
    }

    async fn find_by_location(&self, location: &str) -> DomainResult<Vec<StationOverview>> {
        let models = station::Entity::find()
            .filter(station::Column::Location.eq(location))
            .order_by_asc(station::Column::Id)
            .all(&self.db)
            .await?;
        self.with_availability(models).await
    }

    async fn search_by_location(&self, fragment: &str) -> DomainResult<Vec<StationOverview>> {
        let models = station::Entity::find()
            .filter(station::Column::Location.contains(fragment))
            .order_by_asc(station::Column::Id)
            .all(&self.db)
            .await?;
        self.with_availability(models).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewSlot, SlotRepository, SlotStatus};
    use crate::infrastructure::database::repositories::SeaOrmSlotRepository;
    use crate::infrastructure::database::test_connection;

    fn new_station(name: &str, location: &str) -> NewStation {
        NewStation {
            name: name.into(),
            location: location.into(),
            total_slots: 4,
            price_per_hour: 2.5,
            image: None,
        }
    }

    fn new_slot(station_id: i32, start: &str, status: SlotStatus) -> NewSlot {
        NewSlot {
            station_id,
            start_time: start.into(),
            end_time: "23:00".into(),
            status,
        }
    }

    #[tokio::test]
    async fn overview_counts_only_available_slots() {
        let db = test_connection().await;
        let stations = SeaOrmStationRepository::new(db.clone());
        let slots = SeaOrmSlotRepository::new(db);

        let s = stations.create(new_station("Central", "Downtown")).await.unwrap();
        slots.create(new_slot(s.id, "08:00", SlotStatus::Available)).await.unwrap();
        slots.create(new_slot(s.id, "09:00", SlotStatus::Available)).await.unwrap();
        slots.create(new_slot(s.id, "10:00", SlotStatus::Maintenance)).await.unwrap();

        let overview = stations.overview(s.id).await.unwrap().unwrap();
        assert_eq!(overview.available_slots, 2);
        assert_eq!(overview.station.name, "Central");

        let empty = stations.create(new_station("Empty", "Harbor")).await.unwrap();
        let list = stations.list().await.unwrap();
        assert_eq!(list.len(), 2);
        let harbor = list.iter().find(|o| o.station.id == empty.id).unwrap();
        assert_eq!(harbor.available_slots, 0);
    }

    #[tokio::test]
    async fn update_keeps_absent_fields() {
        let repo = SeaOrmStationRepository::new(test_connection().await);
        let s = repo.create(new_station("Central", "Downtown")).await.unwrap();

        let updated = repo
            .update(
                s.id,
                StationChanges {
                    price_per_hour: Some(4.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.price_per_hour, 4.0);
        assert_eq!(updated.name, "Central");
        assert!(repo.update(999, StationChanges::default()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn location_lookups() {
        let repo = SeaOrmStationRepository::new(test_connection().await);
        repo.create(new_station("A", "North Park")).await.unwrap();
        repo.create(new_station("B", "North Park")).await.unwrap();
        repo.create(new_station("C", "South Bay")).await.unwrap();

        assert_eq!(
            repo.locations().await.unwrap(),
            vec!["North Park".to_string(), "South Bay".to_string()]
        );
        assert_eq!(repo.find_by_location("North Park").await.unwrap().len(), 2);
        assert!(repo.find_by_location("North").await.unwrap().is_empty());
        assert_eq!(repo.search_by_location("Bay").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_missing_station_reports_false() {
        let repo = SeaOrmStationRepository::new(test_connection().await);
        assert!(!repo.delete_cascade(1).await.unwrap());
    }
}
