//! Application layer - use-case orchestration
//!
//! Services apply authorization and input rules, then delegate persistence
//! to the repositories behind [`RepositoryProvider`](crate::domain::RepositoryProvider).

pub mod booking;
pub mod catalog;
pub mod identity;

pub use booking::BookingService;
pub use catalog::{SlotService, StationService};
pub use identity::{AuthResult, UserService};

/// Caller of a use-case, taken from a verified access token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: i32,
    pub is_admin: bool,
}

impl Actor {
    pub fn user(user_id: i32) -> Self {
        Self {
            user_id,
            is_admin: false,
        }
    }

    pub fn admin(user_id: i32) -> Self {
        Self {
            user_id,
            is_admin: true,
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use crate::domain::RepositoryProvider;
    use crate::infrastructure::database::test_connection;
    use crate::infrastructure::SeaOrmRepositoryProvider;

    pub async fn repos() -> Arc<dyn RepositoryProvider> {
        Arc::new(SeaOrmRepositoryProvider::new(test_connection().await))
    }
}
