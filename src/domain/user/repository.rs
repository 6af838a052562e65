use async_trait::async_trait;

use super::{NewUser, User};
use crate::domain::DomainResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `Conflict` when the email is already registered.
    async fn create(&self, user: NewUser) -> DomainResult<User>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>>;
    async fn list(&self) -> DomainResult<Vec<User>>;
    async fn count(&self) -> DomainResult<u64>;

    async fn set_admin(&self, id: i32, is_admin: bool) -> DomainResult<Option<User>>;

    /// Delete a user and their bookings in one transaction. Slots held by
    /// the user's upcoming bookings become `available` again.
    /// Returns `false` when the user does not exist.
    async fn delete_cascade(&self, id: i32) -> DomainResult<bool>;
}
