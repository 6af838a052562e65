//! User management service - application-layer orchestration
//!
//! HTTP handlers are thin wrappers that delegate to this service.

use std::sync::Arc;

use tracing::{info, warn};

use crate::application::Actor;
use crate::domain::{DomainError, DomainResult, NewUser, RepositoryProvider, User};
use crate::infrastructure::crypto::jwt::{create_token, JwtConfig};
use crate::infrastructure::crypto::password::{hash_password, verify_password};

/// Authentication result returned after a successful login
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

/// Orchestrates identity and user-management use-cases.
#[derive(Clone)]
pub struct UserService {
    repos: Arc<dyn RepositoryProvider>,
    jwt_config: JwtConfig,
    bcrypt_cost: u32,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl UserService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, jwt_config: JwtConfig, bcrypt_cost: u32) -> Self {
        Self {
            repos,
            jwt_config,
            bcrypt_cost,
        }
    }

    fn hash(&self, password: &str) -> DomainResult<String> {
        hash_password(password, self.bcrypt_cost)
            .map_err(|e| DomainError::Internal(format!("Failed to hash password: {}", e)))
    }

    // ── Authentication ──────────────────────────────────────────

    /// Register a regular (non-admin) account.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> DomainResult<User> {
        let name = name.trim();
        let email = normalize_email(email);
        if name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(DomainError::Validation("Missing required fields".into()));
        }

        if self.repos.users().find_by_email(&email).await?.is_some() {
            return Err(DomainError::Conflict("Email already registered".into()));
        }

        let user = self
            .repos
            .users()
            .create(NewUser {
                name: name.to_string(),
                email,
                password_hash: self.hash(password)?,
                is_admin: false,
            })
            .await?;

        info!(user_id = user.id, email = %user.email, "New user registered");
        Ok(user)
    }

    /// Check credentials and issue a bearer token.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<AuthResult> {
        let invalid = || DomainError::Unauthorized("Invalid credentials".into());

        let Some(user) = self.repos.users().find_by_email(&normalize_email(email)).await? else {
            return Err(invalid());
        };

        if !verify_password(password, &user.password_hash).unwrap_or(false) {
            warn!(user_id = user.id, "Failed login attempt");
            return Err(invalid());
        }

        let token = create_token(&user, &self.jwt_config)
            .map_err(|e| DomainError::Internal(format!("Failed to create token: {}", e)))?;

        Ok(AuthResult {
            token,
            token_type: "Bearer".into(),
            expires_in: self.jwt_config.expires_in(),
            user,
        })
    }

    /// Account behind a verified token.
    pub async fn me(&self, actor: Actor) -> DomainResult<User> {
        self.repos
            .users()
            .find_by_id(actor.user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", actor.user_id))
    }

    // ── Administration ──────────────────────────────────────────

    pub async fn list(&self) -> DomainResult<Vec<User>> {
        self.repos.users().list().await
    }

    pub async fn make_admin(&self, id: i32) -> DomainResult<User> {
        let user = self
            .repos
            .users()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))?;

        if user.is_admin {
            return Err(DomainError::Conflict("User is already an admin".into()));
        }

        let promoted = self
            .repos
            .users()
            .set_admin(id, true)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))?;

        info!(user_id = id, "User promoted to admin");
        Ok(promoted)
    }

    /// Remove an account with its bookings. Admins cannot remove themselves.
    pub async fn delete(&self, actor: Actor, id: i32) -> DomainResult<()> {
        if self.repos.users().find_by_id(id).await?.is_none() {
            return Err(DomainError::not_found("User", id));
        }
        if actor.user_id == id {
            return Err(DomainError::Conflict("Cannot delete yourself".into()));
        }

        if !self.repos.users().delete_cascade(id).await? {
            return Err(DomainError::not_found("User", id));
        }
        Ok(())
    }

    /// Create the configured administrator when no account exists yet.
    ///
    /// Returns `true` when an account was created. There is no built-in
    /// password: seeding an empty store without one is an error.
    pub async fn ensure_default_admin(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> DomainResult<bool> {
        if self.repos.users().count().await? > 0 {
            return Ok(false);
        }
        if password.is_empty() || email.trim().is_empty() {
            return Err(DomainError::Validation(
                "Default admin email and password must be configured".into(),
            ));
        }

        let user = self
            .repos
            .users()
            .create(NewUser {
                name: name.to_string(),
                email: normalize_email(email),
                password_hash: self.hash(password)?,
                is_admin: true,
            })
            .await?;

        warn!(
            email = %user.email,
            "Default admin account created; change its password"
        );
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::repos;
    use crate::infrastructure::crypto::jwt::verify_token;

    async fn service() -> UserService {
        UserService::new(repos().await, JwtConfig::new("test-secret", 1), 4)
    }

    #[tokio::test]
    async fn register_then_login_issues_token() {
        let svc = service().await;
        let user = svc.register("Dana", " Dana@Example.com ", "pw123456").await.unwrap();
        assert_eq!(user.email, "dana@example.com");
        assert!(!user.is_admin);

        let auth = svc.login("dana@example.com", "pw123456").await.unwrap();
        assert_eq!(auth.token_type, "Bearer");
        assert_eq!(auth.expires_in, 3600);
        let claims = verify_token(&auth.token, &JwtConfig::new("test-secret", 1)).unwrap();
        assert_eq!(claims.user_id(), Some(user.id));
        assert_eq!(claims.role, "user");
    }

    #[tokio::test]
    async fn duplicate_email_rejected() {
        let svc = service().await;
        svc.register("Dana", "dana@example.com", "pw").await.unwrap();
        let err = svc.register("Other", "DANA@example.com", "pw").await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(err.to_string(), "Email already registered");
    }

    #[tokio::test]
    async fn bad_credentials_are_unauthorized() {
        let svc = service().await;
        svc.register("Dana", "dana@example.com", "right").await.unwrap();
        for (email, password) in [("dana@example.com", "wrong"), ("ghost@example.com", "right")] {
            let err = svc.login(email, password).await.unwrap_err();
            assert!(matches!(err, DomainError::Unauthorized(_)));
        }
    }

    #[tokio::test]
    async fn make_admin_twice_is_rejected() {
        let svc = service().await;
        let user = svc.register("Dana", "dana@example.com", "pw").await.unwrap();
        assert!(svc.make_admin(user.id).await.unwrap().is_admin);
        let err = svc.make_admin(user.id).await.unwrap_err();
        assert_eq!(err.to_string(), "User is already an admin");
        assert!(matches!(
            svc.make_admin(999).await.unwrap_err(),
            DomainError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn admin_cannot_delete_self() {
        let svc = service().await;
        assert!(svc.ensure_default_admin("Admin", "admin@example.com", "pw").await.unwrap());
        let admin = svc.login("admin@example.com", "pw").await.unwrap().user;
        assert!(admin.is_admin);

        let err = svc.delete(Actor::admin(admin.id), admin.id).await.unwrap_err();
        assert_eq!(err.to_string(), "Cannot delete yourself");

        let user = svc.register("Dana", "dana@example.com", "pw").await.unwrap();
        svc.delete(Actor::admin(admin.id), user.id).await.unwrap();
        assert_eq!(svc.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn default_admin_only_seeded_into_empty_store() {
        let svc = service().await;
        svc.register("Dana", "dana@example.com", "pw").await.unwrap();
        assert!(!svc.ensure_default_admin("Admin", "admin@example.com", "pw").await.unwrap());
        assert!(svc.login("admin@example.com", "pw").await.is_err());
    }

    #[tokio::test]
    async fn default_admin_requires_a_password() {
        let svc = service().await;
        let err = svc
            .ensure_default_admin("Admin", "admin@example.com", "")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(svc.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn hashing_failure_is_a_server_fault() {
        let svc = UserService::new(repos().await, JwtConfig::new("test-secret", 1), 2);
        let err = svc.register("Dana", "dana@example.com", "pw").await.unwrap_err();
        assert!(matches!(err, DomainError::Internal(_)));
    }
}
