//! SeaORM implementation of UserRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};
use tracing::{debug, info};

use crate::domain::{DomainError, DomainResult, NewUser, User, UserRepository};
use crate::infrastructure::database::entities::{booking, slot, user};

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(model: user::Model) -> User {
    User {
        id: model.id,
        name: model.name,
        email: model.email,
        password_hash: model.password_hash,
        is_admin: model.is_admin,
        created_at: model.created_at,
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create(&self, new_user: NewUser) -> DomainResult<User> {
        let model = user::ActiveModel {
            id: NotSet,
            name: Set(new_user.name),
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
            is_admin: Set(new_user.is_admin),
            created_at: Set(Utc::now()),
        };

        let saved = model.insert(&self.db).await.map_err(|e| {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                DomainError::Conflict("Email already registered".to_string())
            } else {
                e.into()
            }
        })?;

        debug!(user_id = saved.id, "User created");
        Ok(model_to_domain(saved))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        Ok(model.map(model_to_domain))
    }

    async fn list(&self) -> DomainResult<Vec<User>> {
        let models = user::Entity::find()
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(user::Entity::find().count(&self.db).await?)
    }

    async fn set_admin(&self, id: i32, is_admin: bool) -> DomainResult<Option<User>> {
        let Some(existing) = user::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut active: user::ActiveModel = existing.into();
        active.is_admin = Set(is_admin);
        let updated = active.update(&self.db).await?;
        Ok(Some(model_to_domain(updated)))
    }

    async fn delete_cascade(&self, id: i32) -> DomainResult<bool> {
        let txn = self.db.begin().await?;

        if user::Entity::find_by_id(id).one(&txn).await?.is_none() {
            return Ok(false);
        }

        let held_slots: Vec<i32> = booking::Entity::find()
            .select_only()
            .column(booking::Column::SlotId)
            .filter(booking::Column::UserId.eq(id))
            .filter(booking::Column::Status.eq(booking::BookingStatus::Upcoming))
            .into_tuple()
            .all(&txn)
            .await?;

        if !held_slots.is_empty() {
            slot::Entity::update_many()
                .col_expr(slot::Column::Status, Expr::value(slot::SlotStatus::Available))
                .filter(slot::Column::Id.is_in(held_slots.clone()))
                .filter(slot::Column::Status.eq(slot::SlotStatus::Booked))
                .exec(&txn)
                .await?;
        }

        let removed = booking::Entity::delete_many()
            .filter(booking::Column::UserId.eq(id))
            .exec(&txn)
            .await?;
        user::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        info!(
            user_id = id,
            bookings_removed = removed.rows_affected,
            slots_released = held_slots.len(),
            "User deleted"
        );
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::test_connection;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Dana".into(),
            email: email.into(),
            password_hash: "hash".into(),
            is_admin: false,
        }
    }

    #[tokio::test]
    async fn create_and_find_by_email() {
        let repo = SeaOrmUserRepository::new(test_connection().await);
        let created = repo.create(new_user("dana@example.com")).await.unwrap();
        assert!(created.id > 0);
        assert!(!created.is_admin);

        let found = repo.find_by_email("dana@example.com").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert!(repo.find_by_email("nobody@example.com").await.unwrap().is_none());
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let repo = SeaOrmUserRepository::new(test_connection().await);
        repo.create(new_user("dup@example.com")).await.unwrap();
        let err = repo.create(new_user("dup@example.com")).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(err.to_string(), "Email already registered");
    }

    #[tokio::test]
    async fn set_admin_on_missing_user_returns_none() {
        let repo = SeaOrmUserRepository::new(test_connection().await);
        assert!(repo.set_admin(42, true).await.unwrap().is_none());

        let user = repo.create(new_user("a@example.com")).await.unwrap();
        let promoted = repo.set_admin(user.id, true).await.unwrap().unwrap();
        assert!(promoted.is_admin);
    }

    #[tokio::test]
    async fn delete_missing_user_reports_false() {
        let repo = SeaOrmUserRepository::new(test_connection().await);
        assert!(!repo.delete_cascade(7).await.unwrap());
    }
}
