//! User management API handlers
//!
//! Admin-only endpoints. Delegates to `UserService` from the identity layer.

use axum::extract::State;
use axum::Extension;

use super::dto::UserDto;
use crate::application::UserService;
use crate::interfaces::http::common::{ok, ApiPath, ApiResponse, ApiResult, MessageResponse};
use crate::interfaces::http::middleware::AuthenticatedUser;

#[derive(Clone)]
pub struct UserHandlerState {
    pub users: UserService,
}

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All accounts", body = ApiResponse<Vec<UserDto>>),
        (status = 403, description = "Admin access required")
    )
)]
pub async fn list_users(State(state): State<UserHandlerState>) -> ApiResult<Vec<UserDto>> {
    let users = state.users.list().await?;
    ok(users.into_iter().map(UserDto::from).collect())
}

#[utoipa::path(
    put,
    path = "/api/users/{id}/make-admin",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User promoted", body = ApiResponse<UserDto>),
        (status = 400, description = "User is already an admin"),
        (status = 404, description = "User not found")
    )
)]
pub async fn make_admin(
    State(state): State<UserHandlerState>,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<UserDto> {
    let user = state.users.make_admin(id).await?;
    ok(UserDto::from(user))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User and their bookings deleted", body = ApiResponse<MessageResponse>),
        (status = 400, description = "Cannot delete yourself"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<UserHandlerState>,
    Extension(caller): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<MessageResponse> {
    state.users.delete(caller.actor(), id).await?;
    ok(MessageResponse::new("User deleted successfully"))
}
