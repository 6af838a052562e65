//! Slot API handlers

use axum::extract::State;

use super::dto::{parse_status, CreateSlotRequest, SlotDto, UpdateSlotRequest};
use crate::application::SlotService;
use crate::domain::{NewSlot, SlotChanges, SlotStatus};
use crate::interfaces::http::common::{
    created, ok, ApiPath, ApiResponse, ApiResult, CreatedResult, MessageResponse, ValidatedJson,
};

#[derive(Clone)]
pub struct SlotHandlerState {
    pub slots: SlotService,
}

#[utoipa::path(
    get,
    path = "/api/stations/{id}/slots",
    tag = "Slots",
    params(("id" = i32, Path, description = "Station ID")),
    responses(
        (status = 200, description = "Slots of the station", body = ApiResponse<Vec<SlotDto>>),
        (status = 404, description = "Station not found")
    )
)]
pub async fn list_station_slots(
    State(state): State<SlotHandlerState>,
    ApiPath(station_id): ApiPath<i32>,
) -> ApiResult<Vec<SlotDto>> {
    let slots = state.slots.list_for_station(station_id).await?;
    ok(slots.into_iter().map(SlotDto::from).collect())
}

#[utoipa::path(
    get,
    path = "/api/slots/{id}",
    tag = "Slots",
    params(("id" = i32, Path, description = "Slot ID")),
    responses(
        (status = 200, description = "Slot details", body = ApiResponse<SlotDto>),
        (status = 404, description = "Slot not found")
    )
)]
pub async fn get_slot(
    State(state): State<SlotHandlerState>,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<SlotDto> {
    ok(SlotDto::from(state.slots.get(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/slots",
    tag = "Slots",
    security(("bearer_auth" = [])),
    request_body = CreateSlotRequest,
    responses(
        (status = 201, description = "Slot created", body = ApiResponse<SlotDto>),
        (status = 400, description = "Invalid times or status"),
        (status = 404, description = "Station not found")
    )
)]
pub async fn create_slot(
    State(state): State<SlotHandlerState>,
    ValidatedJson(request): ValidatedJson<CreateSlotRequest>,
) -> CreatedResult<SlotDto> {
    let status = parse_status(request.status.as_deref())?.unwrap_or(SlotStatus::Available);
    let slot = state
        .slots
        .create(NewSlot {
            station_id: request.station_id,
            start_time: request.start_time,
            end_time: request.end_time,
            status,
        })
        .await?;
    created(SlotDto::from(slot))
}

#[utoipa::path(
    put,
    path = "/api/slots/{id}",
    tag = "Slots",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Slot ID")),
    request_body = UpdateSlotRequest,
    responses(
        (status = 200, description = "Slot updated", body = ApiResponse<SlotDto>),
        (status = 400, description = "Invalid times or status change"),
        (status = 404, description = "Slot not found")
    )
)]
pub async fn update_slot(
    State(state): State<SlotHandlerState>,
    ApiPath(id): ApiPath<i32>,
    ValidatedJson(request): ValidatedJson<UpdateSlotRequest>,
) -> ApiResult<SlotDto> {
    let changes = SlotChanges {
        start_time: request.start_time,
        end_time: request.end_time,
        status: parse_status(request.status.as_deref())?,
    };
    ok(SlotDto::from(state.slots.update(id, changes).await?))
}

#[utoipa::path(
    delete,
    path = "/api/slots/{id}",
    tag = "Slots",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Slot ID")),
    responses(
        (status = 200, description = "Slot and its bookings deleted", body = ApiResponse<MessageResponse>),
        (status = 404, description = "Slot not found")
    )
)]
pub async fn delete_slot(
    State(state): State<SlotHandlerState>,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<MessageResponse> {
    state.slots.delete(id).await?;
    ok(MessageResponse::new("Time slot deleted successfully"))
}
