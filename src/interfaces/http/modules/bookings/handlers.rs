//! Booking API handlers
//!
//! Every route here sits behind `auth_middleware`; `all` and `complete`
//! additionally require an admin.

use axum::extract::State;
use axum::Extension;

use super::dto::{BookingDto, BookingListItem, CreateBookingRequest};
use crate::application::BookingService;
use crate::interfaces::http::common::{
    created, ok, ApiPath, ApiResponse, ApiResult, CreatedResult, ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;

#[derive(Clone)]
pub struct BookingHandlerState {
    pub bookings: BookingService,
}

#[utoipa::path(
    get,
    path = "/api/bookings",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's bookings ordered by date", body = ApiResponse<Vec<BookingListItem>>),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn list_own_bookings(
    State(state): State<BookingHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Vec<BookingListItem>> {
    let bookings = state.bookings.list_own(user.actor()).await?;
    ok(bookings
        .into_iter()
        .map(|b| BookingListItem::new(b, false))
        .collect())
}

#[utoipa::path(
    get,
    path = "/api/bookings/all",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Every booking ordered by date", body = ApiResponse<Vec<BookingListItem>>),
        (status = 403, description = "Admin access required")
    )
)]
pub async fn list_all_bookings(
    State(state): State<BookingHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Vec<BookingListItem>> {
    let bookings = state.bookings.list_all(user.actor()).await?;
    ok(bookings
        .into_iter()
        .map(|b| BookingListItem::new(b, true))
        .collect())
}

#[utoipa::path(
    post,
    path = "/api/bookings",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking created, slot is now booked", body = ApiResponse<BookingDto>),
        (status = 400, description = "Invalid date, past date, slot unavailable or duplicate booking"),
        (status = 404, description = "Time slot not found")
    )
)]
pub async fn create_booking(
    State(state): State<BookingHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateBookingRequest>,
) -> CreatedResult<BookingDto> {
    let booking = state
        .bookings
        .create(
            user.actor(),
            request.slot_id,
            &request.date,
            &request.vehicle_number,
        )
        .await?;
    created(BookingDto::from(booking))
}

#[utoipa::path(
    delete,
    path = "/api/bookings/{id}",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking cancelled, slot available again", body = ApiResponse<BookingDto>),
        (status = 400, description = "Only upcoming bookings can be cancelled"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn cancel_booking(
    State(state): State<BookingHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<BookingDto> {
    let booking = state.bookings.cancel(user.actor(), id).await?;
    ok(BookingDto::from(booking))
}

#[utoipa::path(
    post,
    path = "/api/bookings/{id}/complete",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking completed, slot available again", body = ApiResponse<BookingDto>),
        (status = 400, description = "Only upcoming bookings can be completed"),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn complete_booking(
    State(state): State<BookingHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<BookingDto> {
    let booking = state.bookings.complete(user.actor(), id).await?;
    ok(BookingDto::from(booking))
}
