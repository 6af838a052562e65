//! Station domain entity

/// Charging station
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub id: i32,
    pub name: String,
    pub location: String,
    /// Advertised capacity of the station
    pub total_slots: i32,
    pub price_per_hour: f64,
    pub image: Option<String>,
}

/// Station together with how many of its slots can currently be booked
#[derive(Debug, Clone, PartialEq)]
pub struct StationOverview {
    pub station: Station,
    pub available_slots: u64,
}

#[derive(Debug, Clone)]
pub struct NewStation {
    pub name: String,
    pub location: String,
    pub total_slots: i32,
    pub price_per_hour: f64,
    pub image: Option<String>,
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct StationChanges {
    pub name: Option<String>,
    pub location: Option<String>,
    pub total_slots: Option<i32>,
    pub price_per_hour: Option<f64>,
    pub image: Option<String>,
}

impl StationChanges {
    pub fn apply(self, station: &mut Station) {
        if let Some(name) = self.name {
            station.name = name;
        }
        if let Some(location) = self.location {
            station.location = location;
        }
        if let Some(total_slots) = self.total_slots {
            station.total_slots = total_slots;
        }
        if let Some(price) = self.price_per_hour {
            station.price_per_hour = price;
        }
        if let Some(image) = self.image {
            station.image = Some(image);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station() -> Station {
        Station {
            id: 1,
            name: "Central".into(),
            location: "Downtown".into(),
            total_slots: 4,
            price_per_hour: 2.5,
            image: None,
        }
    }

    #[test]
    fn empty_changes_keep_everything() {
        let mut s = station();
        StationChanges::default().apply(&mut s);
        assert_eq!(s, station());
    }

    #[test]
    fn partial_changes_only_touch_given_fields() {
        let mut s = station();
        StationChanges {
            price_per_hour: Some(3.0),
            image: Some("central.png".into()),
            ..Default::default()
        }
        .apply(&mut s);
        assert_eq!(s.name, "Central");
        assert_eq!(s.price_per_hour, 3.0);
        assert_eq!(s.image.as_deref(), Some("central.png"));
    }
}
