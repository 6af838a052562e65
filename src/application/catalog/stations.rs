//! Station use-cases

use std::sync::Arc;

use tracing::info;

use crate::domain::{
    DomainError, DomainResult, NewStation, RepositoryProvider, Station, StationChanges,
    StationOverview,
};

#[derive(Clone)]
pub struct StationService {
    repos: Arc<dyn RepositoryProvider>,
}

fn check_text(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::Validation(format!("{} must not be empty", field)));
    }
    Ok(())
}

fn check_numbers(total_slots: Option<i32>, price_per_hour: Option<f64>) -> DomainResult<()> {
    if total_slots.is_some_and(|n| n < 0) {
        return Err(DomainError::Validation(
            "total_slots must not be negative".into(),
        ));
    }
    if price_per_hour.is_some_and(|p| !p.is_finite() || p < 0.0) {
        return Err(DomainError::Validation(
            "price_per_hour must not be negative".into(),
        ));
    }
    Ok(())
}

impl StationService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn list(&self) -> DomainResult<Vec<StationOverview>> {
        self.repos.stations().list().await
    }

    pub async fn get(&self, id: i32) -> DomainResult<StationOverview> {
        self.repos
            .stations()
            .overview(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Station", id))
    }

    pub async fn create(&self, station: NewStation) -> DomainResult<Station> {
        check_text("name", &station.name)?;
        check_text("location", &station.location)?;
        check_numbers(Some(station.total_slots), Some(station.price_per_hour))?;
        self.repos.stations().create(station).await
    }

    pub async fn update(&self, id: i32, changes: StationChanges) -> DomainResult<Station> {
        if let Some(name) = &changes.name {
            check_text("name", name)?;
        }
        if let Some(location) = &changes.location {
            check_text("location", location)?;
        }
        check_numbers(changes.total_slots, changes.price_per_hour)?;

        self.repos
            .stations()
            .update(id, changes)
            .await?
            .ok_or_else(|| DomainError::not_found("Station", id))
    }

    /// Delete a station together with its slots and bookings.
    pub async fn delete(&self, id: i32) -> DomainResult<()> {
        if !self.repos.stations().delete_cascade(id).await? {
            return Err(DomainError::not_found("Station", id));
        }
        info!(station_id = id, "Station removed by admin");
        Ok(())
    }

    pub async fn locations(&self) -> DomainResult<Vec<String>> {
        self.repos.stations().locations().await
    }

    pub async fn at_location(&self, location: &str) -> DomainResult<Vec<StationOverview>> {
        self.repos.stations().find_by_location(location.trim()).await
    }

    pub async fn search(&self, fragment: &str) -> DomainResult<Vec<StationOverview>> {
        let fragment = fragment.trim();
        if fragment.is_empty() {
            return Err(DomainError::Validation("location must not be empty".into()));
        }
        self.repos.stations().search_by_location(fragment).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::repos;

    fn station(name: &str) -> NewStation {
        NewStation {
            name: name.into(),
            location: "Downtown".into(),
            total_slots: 3,
            price_per_hour: 2.0,
            image: None,
        }
    }

    #[tokio::test]
    async fn create_rejects_negative_numbers_and_blank_names() {
        let svc = StationService::new(repos().await);
        let mut bad = station("Central");
        bad.price_per_hour = -1.0;
        assert!(matches!(svc.create(bad).await, Err(DomainError::Validation(_))));

        let mut bad = station("Central");
        bad.total_slots = -2;
        assert!(matches!(svc.create(bad).await, Err(DomainError::Validation(_))));

        assert!(matches!(
            svc.create(station("  ")).await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn unknown_station_is_not_found() {
        let svc = StationService::new(repos().await);
        let err = svc.get(5).await.unwrap_err();
        assert_eq!(err.to_string(), "Station not found");
        assert!(matches!(
            svc.update(5, StationChanges::default()).await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(matches!(svc.delete(5).await, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn crud_round() {
        let svc = StationService::new(repos().await);
        let created = svc.create(station("Central")).await.unwrap();
        let fetched = svc.get(created.id).await.unwrap();
        assert_eq!(fetched.station, created);
        assert_eq!(fetched.available_slots, 0);

        let renamed = svc
            .update(
                created.id,
                StationChanges {
                    name: Some("Central Hub".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.name, "Central Hub");
        assert_eq!(renamed.location, "Downtown");

        assert_eq!(svc.locations().await.unwrap(), vec!["Downtown".to_string()]);
        assert_eq!(svc.search("town").await.unwrap().len(), 1);

        svc.delete(created.id).await.unwrap();
        assert!(svc.list().await.unwrap().is_empty());
    }
}
