//! Authentication middleware for Axum
//!
//! `auth_middleware` turns a bearer token into an [`AuthenticatedUser`]
//! request extension. The account is re-read on every request so deleted
//! users lose access and promotions apply without a new login.
//! `admin_middleware` is layered inside it on admin-only routes.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, error};

use crate::application::Actor;
use crate::domain::RepositoryProvider;
use crate::infrastructure::crypto::jwt::{verify_token, JwtConfig, TokenError};
use crate::interfaces::http::common::ApiResponse;

/// Authentication error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    ExpiredToken,
    AdminRequired,
    Internal,
}

impl AuthError {
    fn status_and_message(self) -> (StatusCode, &'static str) {
        match self {
            Self::MissingToken => (StatusCode::UNAUTHORIZED, "Missing authentication token"),
            Self::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid authentication token"),
            Self::ExpiredToken => (StatusCode::UNAUTHORIZED, "Token has expired"),
            Self::AdminRequired => (StatusCode::FORBIDDEN, "Admin access required"),
            Self::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Expired => Self::ExpiredToken,
            TokenError::Invalid => Self::InvalidToken,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}

/// State needed to authenticate requests
#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
    pub repos: Arc<dyn RepositoryProvider>,
}

/// Caller identity attached to authenticated requests
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub email: String,
    pub is_admin: bool,
}

impl AuthenticatedUser {
    pub fn actor(&self) -> Actor {
        Actor {
            user_id: self.user_id,
            is_admin: self.is_admin,
        }
    }
}

fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

async fn authenticate(
    auth_state: &AuthState,
    headers: &HeaderMap,
) -> Result<AuthenticatedUser, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AuthError::MissingToken)?;

    let token = extract_token(auth_header).ok_or(AuthError::InvalidToken)?;
    let claims = verify_token(token, &auth_state.jwt_config)?;
    let user_id = claims.user_id().ok_or(AuthError::InvalidToken)?;

    let user = auth_state
        .repos
        .users()
        .find_by_id(user_id)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to load token owner");
            AuthError::Internal
        })?
        .ok_or_else(|| {
            debug!(user_id, "Token refers to a removed account");
            AuthError::InvalidToken
        })?;

    Ok(AuthenticatedUser {
        user_id: user.id,
        email: user.email,
        is_admin: user.is_admin,
    })
}

/// JWT bearer authentication middleware
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    // The request body is not `Sync`, so only the headers cross the await.
    let headers = request.headers().clone();
    match authenticate(&auth_state, &headers).await {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

/// Rejects authenticated non-admins. Must run after [`auth_middleware`].
pub async fn admin_middleware(request: Request<Body>, next: Next) -> Response {
    let is_admin = request
        .extensions()
        .get::<AuthenticatedUser>()
        .is_some_and(|u| u.is_admin);

    if !is_admin {
        return AuthError::AdminRequired.into_response();
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use axum::routing::get;
    use axum::{middleware, Extension, Router};
    use tower::ServiceExt;

    use super::*;
    use crate::application::testing::repos;
    use crate::domain::NewUser;
    use crate::infrastructure::crypto::jwt::create_token;

    #[test]
    fn bearer_prefix_is_required() {
        assert_eq!(extract_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(extract_token("Bearer   "), None);
        assert_eq!(extract_token("Basic abc"), None);
        assert_eq!(extract_token("abc.def"), None);
    }

    #[test]
    fn token_errors_keep_their_messages() {
        assert_eq!(
            AuthError::from(TokenError::Expired).status_and_message(),
            (StatusCode::UNAUTHORIZED, "Token has expired")
        );
        assert_eq!(
            AuthError::AdminRequired.status_and_message().0,
            StatusCode::FORBIDDEN
        );
    }

    async fn whoami(Extension(user): Extension<AuthenticatedUser>) -> String {
        user.email
    }

    async fn app_with_user(is_admin: bool) -> (Router, String) {
        let repos = repos().await;
        let jwt_config = JwtConfig::new("middleware-test", 1);
        let user = repos
            .users()
            .create(NewUser {
                name: "Dana".into(),
                email: "dana@example.com".into(),
                password_hash: "x".into(),
                is_admin,
            })
            .await
            .unwrap();
        let token = create_token(&user, &jwt_config).unwrap();

        let state = AuthState { jwt_config, repos };
        let router = Router::new()
            .route("/me", get(whoami))
            .route(
                "/admin",
                get(whoami).layer(middleware::from_fn(admin_middleware)),
            )
            .layer(middleware::from_fn_with_state(state, auth_middleware));
        (router, token)
    }

    async fn call(router: &Router, uri: &str, token: Option<&str>) -> StatusCode {
        let mut req = Request::builder().uri(uri);
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        router
            .clone()
            .oneshot(req.body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn valid_token_reaches_the_handler() {
        let (router, token) = app_with_user(false).await;
        assert_eq!(call(&router, "/me", Some(&token)).await, StatusCode::OK);
        assert_eq!(call(&router, "/me", None).await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn admin_gate_uses_the_stored_flag() {
        let (router, token) = app_with_user(false).await;
        assert_eq!(
            call(&router, "/admin", Some(&token)).await,
            StatusCode::FORBIDDEN
        );

        let (router, token) = app_with_user(true).await;
        assert_eq!(call(&router, "/admin", Some(&token)).await, StatusCode::OK);
    }
}
