//! Station API handlers

use axum::extract::State;

use super::dto::{CreateStationRequest, LocationSearchParams, StationDto, UpdateStationRequest};
use crate::application::StationService;
use crate::domain::StationOverview;
use crate::interfaces::http::common::{
    created, ok, ApiError, ApiPath, ApiQuery, ApiResponse, ApiResult, CreatedResult,
    MessageResponse, ValidatedJson,
};

#[derive(Clone)]
pub struct StationHandlerState {
    pub stations: StationService,
}

fn to_dtos(stations: Vec<StationOverview>) -> Vec<StationDto> {
    stations.into_iter().map(StationDto::from).collect()
}

#[utoipa::path(
    get,
    path = "/api/stations",
    tag = "Stations",
    responses(
        (status = 200, description = "All stations", body = ApiResponse<Vec<StationDto>>)
    )
)]
pub async fn list_stations(State(state): State<StationHandlerState>) -> ApiResult<Vec<StationDto>> {
    ok(to_dtos(state.stations.list().await?))
}

#[utoipa::path(
    get,
    path = "/api/stations/{id}",
    tag = "Stations",
    params(("id" = i32, Path, description = "Station ID")),
    responses(
        (status = 200, description = "Station details", body = ApiResponse<StationDto>),
        (status = 404, description = "Station not found")
    )
)]
pub async fn get_station(
    State(state): State<StationHandlerState>,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<StationDto> {
    ok(StationDto::from(state.stations.get(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/stations",
    tag = "Stations",
    security(("bearer_auth" = [])),
    request_body = CreateStationRequest,
    responses(
        (status = 201, description = "Station created", body = ApiResponse<StationDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Admin access required")
    )
)]
pub async fn create_station(
    State(state): State<StationHandlerState>,
    ValidatedJson(request): ValidatedJson<CreateStationRequest>,
) -> CreatedResult<StationDto> {
    let station = state.stations.create(request.into()).await?;
    created(StationDto::without_slots(station))
}

#[utoipa::path(
    put,
    path = "/api/stations/{id}",
    tag = "Stations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Station ID")),
    request_body = UpdateStationRequest,
    responses(
        (status = 200, description = "Station updated", body = ApiResponse<StationDto>),
        (status = 404, description = "Station not found")
    )
)]
pub async fn update_station(
    State(state): State<StationHandlerState>,
    ApiPath(id): ApiPath<i32>,
    ValidatedJson(request): ValidatedJson<UpdateStationRequest>,
) -> ApiResult<StationDto> {
    state.stations.update(id, request.into()).await?;
    ok(StationDto::from(state.stations.get(id).await?))
}

#[utoipa::path(
    delete,
    path = "/api/stations/{id}",
    tag = "Stations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Station ID")),
    responses(
        (status = 200, description = "Station, slots and bookings deleted", body = ApiResponse<MessageResponse>),
        (status = 404, description = "Station not found")
    )
)]
pub async fn delete_station(
    State(state): State<StationHandlerState>,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<MessageResponse> {
    state.stations.delete(id).await?;
    ok(MessageResponse::new("Station deleted successfully"))
}

#[utoipa::path(
    get,
    path = "/api/locations",
    tag = "Stations",
    responses(
        (status = 200, description = "Distinct station locations", body = ApiResponse<Vec<String>>)
    )
)]
pub async fn list_locations(State(state): State<StationHandlerState>) -> ApiResult<Vec<String>> {
    ok(state.stations.locations().await?)
}

#[utoipa::path(
    get,
    path = "/api/stations/location/{name}",
    tag = "Stations",
    params(("name" = String, Path, description = "Exact location name")),
    responses(
        (status = 200, description = "Stations at the location", body = ApiResponse<Vec<StationDto>>),
        (status = 404, description = "No stations found for the selected location")
    )
)]
pub async fn stations_at_location(
    State(state): State<StationHandlerState>,
    ApiPath(name): ApiPath<String>,
) -> ApiResult<Vec<StationDto>> {
    let stations = state.stations.at_location(&name).await?;
    if stations.is_empty() {
        return Err(ApiError::not_found(
            "No stations found for the selected location",
        ));
    }
    ok(to_dtos(stations))
}

#[utoipa::path(
    get,
    path = "/api/stations/search",
    tag = "Stations",
    params(LocationSearchParams),
    responses(
        (status = 200, description = "Stations whose location matches", body = ApiResponse<Vec<StationDto>>),
        (status = 404, description = "No stations found for the selected location")
    )
)]
pub async fn search_stations(
    State(state): State<StationHandlerState>,
    ApiQuery(params): ApiQuery<LocationSearchParams>,
) -> ApiResult<Vec<StationDto>> {
    let stations = state.stations.search(&params.location).await?;
    if stations.is_empty() {
        return Err(ApiError::not_found(
            "No stations found for the selected location",
        ));
    }
    ok(to_dtos(stations))
}
