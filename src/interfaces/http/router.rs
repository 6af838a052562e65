//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{delete, get, post, put, MethodRouter},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{BookingService, SlotService, StationService, UserService};
use crate::domain::RepositoryProvider;
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::interfaces::http::common::MessageResponse;
use crate::interfaces::http::middleware::{admin_middleware, auth_middleware, AuthState};

use super::modules::{auth, bookings, health, metrics, request_id, slots, stations, users};

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token from /api/auth/login"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Auth
        auth::register,
        auth::login,
        auth::me,
        // Stations
        stations::list_stations,
        stations::get_station,
        stations::create_station,
        stations::update_station,
        stations::delete_station,
        stations::list_locations,
        stations::stations_at_location,
        stations::search_stations,
        // Slots
        slots::list_station_slots,
        slots::get_slot,
        slots::create_slot,
        slots::update_slot,
        slots::delete_slot,
        // Bookings
        bookings::list_own_bookings,
        bookings::list_all_bookings,
        bookings::create_booking,
        bookings::cancel_booking,
        bookings::complete_booking,
        // Users
        users::list_users,
        users::make_admin,
        users::delete_user,
    ),
    components(
        schemas(
            MessageResponse,
            health::HealthResponse,
            health::ComponentHealth,
            auth::RegisterRequest,
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UserInfo,
            stations::StationDto,
            stations::CreateStationRequest,
            stations::UpdateStationRequest,
            slots::SlotDto,
            slots::CreateSlotRequest,
            slots::UpdateSlotRequest,
            bookings::BookingDto,
            bookings::BookingListItem,
            bookings::CreateBookingRequest,
            users::UserDto,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Authentication", description = "Registration, login (JWT) and the current account"),
        (name = "Stations", description = "Charging stations and location lookups"),
        (name = "Slots", description = "Bookable time slots of a station"),
        (name = "Bookings", description = "Booking lifecycle: create, cancel, complete"),
        (name = "Users", description = "Account administration"),
    ),
    info(
        title = "Station Booking API",
        version = "1.0.0",
        description = "Booking backend for EV charging stations",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Requires a valid bearer token. `route_layer` leaves the method fallback
/// alone, so unsupported methods still answer 405.
fn protected<S>(route: MethodRouter<S>, auth: &AuthState) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    route.route_layer(middleware::from_fn_with_state(auth.clone(), auth_middleware))
}

/// Requires a valid bearer token of an admin
fn admin_only<S>(route: MethodRouter<S>, auth: &AuthState) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    protected(route.route_layer(middleware::from_fn(admin_middleware)), auth)
}

/// Create the API router with all routes
pub fn create_api_router(
    repos: Arc<dyn RepositoryProvider>,
    db: DatabaseConnection,
    jwt_config: JwtConfig,
    bcrypt_cost: u32,
    prometheus_handle: PrometheusHandle,
) -> Router {
    let auth_state = AuthState {
        jwt_config: jwt_config.clone(),
        repos: repos.clone(),
    };

    let user_service = UserService::new(repos.clone(), jwt_config, bcrypt_cost);

    // Auth routes
    let auth_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", protected(get(auth::me), &auth_state))
        .with_state(auth::AuthHandlerState {
            users: user_service.clone(),
        });

    // Station routes (reads public, writes admin)
    let station_routes = Router::new()
        .route(
            "/stations",
            admin_only(post(stations::create_station), &auth_state)
                .merge(get(stations::list_stations)),
        )
        .route("/stations/search", get(stations::search_stations))
        .route(
            "/stations/location/{name}",
            get(stations::stations_at_location),
        )
        .route(
            "/stations/{id}",
            admin_only(
                put(stations::update_station).delete(stations::delete_station),
                &auth_state,
            )
            .merge(get(stations::get_station)),
        )
        .route("/locations", get(stations::list_locations))
        .with_state(stations::StationHandlerState {
            stations: StationService::new(repos.clone()),
        });

    // Slot routes (reads public, writes admin)
    let slot_routes = Router::new()
        .route("/stations/{id}/slots", get(slots::list_station_slots))
        .route("/slots", admin_only(post(slots::create_slot), &auth_state))
        .route(
            "/slots/{id}",
            admin_only(
                put(slots::update_slot).delete(slots::delete_slot),
                &auth_state,
            )
            .merge(get(slots::get_slot)),
        )
        .with_state(slots::SlotHandlerState {
            slots: SlotService::new(repos.clone()),
        });

    // Booking routes (authenticated)
    let booking_routes = Router::new()
        .route(
            "/bookings",
            protected(
                get(bookings::list_own_bookings).post(bookings::create_booking),
                &auth_state,
            ),
        )
        .route(
            "/bookings/all",
            admin_only(get(bookings::list_all_bookings), &auth_state),
        )
        .route(
            "/bookings/{id}",
            protected(delete(bookings::cancel_booking), &auth_state),
        )
        .route(
            "/bookings/{id}/complete",
            admin_only(post(bookings::complete_booking), &auth_state),
        )
        .with_state(bookings::BookingHandlerState {
            bookings: BookingService::new(repos),
        });

    // User administration (admin)
    let user_routes = Router::new()
        .route("/users", get(users::list_users))
        .route("/users/{id}/make-admin", put(users::make_admin))
        .route("/users/{id}", delete(users::delete_user))
        .layer(middleware::from_fn(admin_middleware))
        .layer(middleware::from_fn_with_state(auth_state, auth_middleware))
        .with_state(users::UserHandlerState {
            users: user_service,
        });

    let api_routes = Router::new()
        .merge(auth_routes)
        .merge(station_routes)
        .merge(slot_routes)
        .merge(booking_routes)
        .merge(user_routes);

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health::HealthState {
            db,
            started_at: Arc::new(Instant::now()),
        });

    let metrics_routes = Router::new()
        .route("/metrics", get(metrics::prometheus_metrics))
        .with_state(metrics::MetricsState {
            handle: prometheus_handle,
        });

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    Router::new()
        .merge(swagger_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .nest("/api", api_routes)
        // Middleware
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(middleware::from_fn(request_id::request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
