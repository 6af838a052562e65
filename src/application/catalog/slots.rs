//! Slot use-cases

use std::sync::Arc;

use crate::domain::{
    DomainError, DomainResult, NewSlot, RepositoryProvider, Slot, SlotChanges,
};

#[derive(Clone)]
pub struct SlotService {
    repos: Arc<dyn RepositoryProvider>,
}

impl SlotService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    async fn ensure_station(&self, station_id: i32) -> DomainResult<()> {
        if self.repos.stations().find_by_id(station_id).await?.is_none() {
            return Err(DomainError::not_found("Station", station_id));
        }
        Ok(())
    }

    pub async fn list_for_station(&self, station_id: i32) -> DomainResult<Vec<Slot>> {
        self.ensure_station(station_id).await?;
        self.repos.slots().list_for_station(station_id).await
    }

    pub async fn get(&self, id: i32) -> DomainResult<Slot> {
        self.repos
            .slots()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Slot", id))
    }

    pub async fn create(&self, slot: NewSlot) -> DomainResult<Slot> {
        self.ensure_station(slot.station_id).await?;
        slot.validate()?;
        self.repos.slots().create(slot).await
    }

    pub async fn update(&self, id: i32, changes: SlotChanges) -> DomainResult<Slot> {
        self.repos
            .slots()
            .update(id, changes)
            .await?
            .ok_or_else(|| DomainError::not_found("Slot", id))
    }

    /// Delete a slot and every booking made for it.
    pub async fn delete(&self, id: i32) -> DomainResult<()> {
        if !self.repos.slots().delete_cascade(id).await? {
            return Err(DomainError::not_found("Slot", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::repos;
    use crate::application::StationService;
    use crate::domain::{NewStation, SlotStatus};

    async fn setup() -> (SlotService, i32) {
        let repos = repos().await;
        let station = StationService::new(repos.clone())
            .create(NewStation {
                name: "Central".into(),
                location: "Downtown".into(),
                total_slots: 1,
                price_per_hour: 1.0,
                image: None,
            })
            .await
            .unwrap();
        (SlotService::new(repos), station.id)
    }

    fn slot(station_id: i32, start: &str, end: &str) -> NewSlot {
        NewSlot {
            station_id,
            start_time: start.into(),
            end_time: end.into(),
            status: SlotStatus::Available,
        }
    }

    #[tokio::test]
    async fn create_requires_existing_station() {
        let (svc, station_id) = setup().await;
        let err = svc.create(slot(station_id + 1, "08:00", "09:00")).await.unwrap_err();
        assert_eq!(err.to_string(), "Station not found");
        assert!(svc.list_for_station(station_id + 1).await.is_err());
    }

    #[tokio::test]
    async fn create_validates_times() {
        let (svc, station_id) = setup().await;
        for (start, end) in [("8:00", "09:00"), ("09:00", "08:00"), ("10:00", "24:00")] {
            let err = svc.create(slot(station_id, start, end)).await.unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)), "{start}-{end}");
        }
        let created = svc.create(slot(station_id, "08:00", "09:00")).await.unwrap();
        assert_eq!(created.status, SlotStatus::Available);
        assert_eq!(svc.list_for_station(station_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn maintenance_toggle() {
        let (svc, station_id) = setup().await;
        let created = svc.create(slot(station_id, "08:00", "09:00")).await.unwrap();

        let down = svc
            .update(
                created.id,
                SlotChanges {
                    status: Some(SlotStatus::Maintenance),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(down.status, SlotStatus::Maintenance);
        assert_eq!(svc.get(created.id).await.unwrap().status, SlotStatus::Maintenance);

        svc.delete(created.id).await.unwrap();
        assert_eq!(svc.get(created.id).await.unwrap_err().to_string(), "Slot not found");
    }
}
