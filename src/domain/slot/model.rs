//! Slot domain entity

use crate::domain::{DomainError, DomainResult};
use crate::shared::time::validate_window;

/// Slot status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStatus {
    /// Free to be booked
    Available,
    /// Held by exactly one upcoming booking
    Booked,
    /// Taken out of service by an admin
    Maintenance,
}

impl SlotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Booked => "booked",
            Self::Maintenance => "maintenance",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "available" => Some(Self::Available),
            "booked" => Some(Self::Booked),
            "maintenance" => Some(Self::Maintenance),
            _ => None,
        }
    }
}

impl std::fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Time slot at a station
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    pub id: i32,
    pub station_id: i32,
    /// "HH:MM"
    pub start_time: String,
    /// "HH:MM"
    pub end_time: String,
    pub status: SlotStatus,
}

impl Slot {
    pub fn is_available(&self) -> bool {
        self.status == SlotStatus::Available
    }

    /// Take the slot for a new booking
    pub fn reserve(&mut self) -> DomainResult<()> {
        if !self.is_available() {
            return Err(DomainError::Conflict(
                "This time slot is not available".into(),
            ));
        }
        self.status = SlotStatus::Booked;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct NewSlot {
    pub station_id: i32,
    pub start_time: String,
    pub end_time: String,
    pub status: SlotStatus,
}

impl NewSlot {
    pub fn validate(&self) -> DomainResult<()> {
        if self.status == SlotStatus::Booked {
            return Err(DomainError::Validation(
                "A new slot cannot start out booked".into(),
            ));
        }
        validate_window(&self.start_time, &self.end_time)
    }
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct SlotChanges {
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub status: Option<SlotStatus>,
}

impl SlotChanges {
    /// Apply to `slot`, re-validating the resulting window.
    ///
    /// `booked` is owned by the booking lifecycle: it can neither be set nor
    /// cleared by hand.
    pub fn apply(self, slot: &mut Slot) -> DomainResult<()> {
        if let Some(status) = self.status {
            if status != slot.status
                && (status == SlotStatus::Booked || slot.status == SlotStatus::Booked)
            {
                return Err(DomainError::Conflict(
                    "Booked status is managed by bookings".into(),
                ));
            }
        }
        let start = self.start_time.unwrap_or_else(|| slot.start_time.clone());
        let end = self.end_time.unwrap_or_else(|| slot.end_time.clone());
        validate_window(&start, &end)?;
        slot.start_time = start;
        slot.end_time = end;
        if let Some(status) = self.status {
            slot.status = status;
        }
        Ok(())
    }
}
