//! Booking domain entity

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::{DomainError, DomainResult};

/// Booking status
///
/// `Upcoming` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStatus {
    Upcoming,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Slot reservation for a date
#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    pub id: i32,
    pub user_id: i32,
    pub slot_id: i32,
    pub date: NaiveDate,
    pub vehicle_number: String,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn is_upcoming(&self) -> bool {
        self.status == BookingStatus::Upcoming
    }

    /// Owners manage their own bookings, admins manage all of them.
    pub fn can_be_managed_by(&self, user_id: i32, is_admin: bool) -> bool {
        is_admin || self.user_id == user_id
    }

    pub fn cancel(&mut self) -> DomainResult<()> {
        if !self.is_upcoming() {
            return Err(DomainError::Conflict(
                "Only upcoming bookings can be cancelled".into(),
            ));
        }
        self.status = BookingStatus::Cancelled;
        Ok(())
    }

    pub fn complete(&mut self) -> DomainResult<()> {
        if !self.is_upcoming() {
            return Err(DomainError::Conflict(
                "Only upcoming bookings can be completed".into(),
            ));
        }
        self.status = BookingStatus::Completed;
        Ok(())
    }
}

/// Reject dates before `today`.
pub fn ensure_bookable_date(date: NaiveDate, today: NaiveDate) -> DomainResult<()> {
    if date < today {
        return Err(DomainError::Conflict("Cannot book for past dates".into()));
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct NewBooking {
    pub user_id: i32,
    pub slot_id: i32,
    pub date: NaiveDate,
    pub vehicle_number: String,
}

/// Booking joined with its user, slot and station for listings
#[derive(Debug, Clone, PartialEq)]
pub struct BookingDetails {
    pub id: i32,
    pub user_id: i32,
    pub user_name: String,
    pub slot_id: i32,
    pub station_id: i32,
    pub station_name: String,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub vehicle_number: String,
    pub status: BookingStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking(status: BookingStatus) -> Booking {
        Booking {
            id: 1,
            user_id: 10,
            slot_id: 5,
            date: NaiveDate::from_ymd_opt(2099, 1, 1).unwrap(),
            vehicle_number: "AB123".into(),
            status,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn cancel_from_upcoming() {
        let mut b = booking(BookingStatus::Upcoming);
        b.cancel().unwrap();
        assert_eq!(b.status, BookingStatus::Cancelled);
    }

    #[test]
    fn terminal_states_reject_transitions() {
        for status in [BookingStatus::Cancelled, BookingStatus::Completed] {
            let mut b = booking(status);
            assert!(matches!(b.cancel(), Err(DomainError::Conflict(_))));
            assert!(matches!(b.complete(), Err(DomainError::Conflict(_))));
            assert_eq!(b.status, status);
        }
    }

    #[test]
    fn complete_from_upcoming() {
        let mut b = booking(BookingStatus::Upcoming);
        b.complete().unwrap();
        assert_eq!(b.status, BookingStatus::Completed);
    }

    #[test]
    fn only_owner_or_admin_manages() {
        let b = booking(BookingStatus::Upcoming);
        assert!(b.can_be_managed_by(10, false));
        assert!(b.can_be_managed_by(99, true));
        assert!(!b.can_be_managed_by(99, false));
    }

    #[test]
    fn past_dates_are_not_bookable() {
        let today = NaiveDate::from_ymd_opt(2030, 6, 15).unwrap();
        assert!(ensure_bookable_date(today, today).is_ok());
        assert!(ensure_bookable_date(today.succ_opt().unwrap(), today).is_ok());
        let err = ensure_bookable_date(today.pred_opt().unwrap(), today).unwrap_err();
        assert_eq!(err.to_string(), "Cannot book for past dates");
    }
}
