//! Ride API handlers

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::Utc;

use super::dto::{
    CreateRideRequest, RideDto, RideHistoryParams, RideSearchParams, RideStopDto,
    UpdateRideStatusRequest,
};
use crate::application::services::ride::RideService;
use crate::domain::ride::RideStop;
use crate::domain::GeoPoint;
use crate::interfaces::http::common::{ApiError, ApiResponse, PaginatedResponse, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;

/// Ride state
#[derive(Clone)]
pub struct RideHandlerState {
    pub service: Arc<RideService>,
}

fn to_stop(dto: RideStopDto) -> RideStop {
    RideStop {
        address: dto.address,
        point: GeoPoint::new(dto.longitude, dto.latitude),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/rides/search",
    tag = "Rides",
    params(RideSearchParams),
    responses(
        (status = 200, description = "Pending rides of the vehicle class, soonest first", body = ApiResponse<Vec<RideDto>>)
    )
)]
pub async fn search_rides(
    State(state): State<RideHandlerState>,
    Query(params): Query<RideSearchParams>,
) -> Result<Json<ApiResponse<Vec<RideDto>>>, ApiError> {
    let rides = state.service.search_pending(params.vehicle_type).await?;
    Ok(Json(ApiResponse::success(
        rides.into_iter().map(Into::into).collect(),
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/rides",
    tag = "Rides",
    security(("bearer_auth" = [])),
    request_body = CreateRideRequest,
    responses(
        (status = 201, description = "Ride quoted and created", body = ApiResponse<RideDto>),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_ride(
    State(state): State<RideHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateRideRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RideDto>>), ApiError> {
    let ride = state
        .service
        .create_ride(
            &user.user_id,
            to_stop(request.from),
            to_stop(request.to),
            request.vehicle_type,
            request.booking_time.unwrap_or_else(Utc::now),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(ride.into()))))
}

#[utoipa::path(
    get,
    path = "/api/v1/rides/history",
    tag = "Rides",
    security(("bearer_auth" = [])),
    params(RideHistoryParams),
    responses(
        (status = 200, description = "One page of the user's rides, newest first", body = ApiResponse<PaginatedResponse<RideDto>>)
    )
)]
pub async fn ride_history(
    State(state): State<RideHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(params): Query<RideHistoryParams>,
) -> Result<Json<ApiResponse<PaginatedResponse<RideDto>>>, ApiError> {
    let limit = params.limit.clamp(1, 100);
    let page = state
        .service
        .ride_history(&user.user_id, params.status, params.page, limit)
        .await?;
    let items = page.rides.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        items, page.total, page.page, page.limit,
    ))))
}

#[utoipa::path(
    get,
    path = "/api/v1/rides/active",
    tag = "Rides",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The user's non-terminal rides, soonest first", body = ApiResponse<Vec<RideDto>>)
    )
)]
pub async fn active_rides(
    State(state): State<RideHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<Vec<RideDto>>>, ApiError> {
    let rides = state.service.active_rides(&user.user_id).await?;
    Ok(Json(ApiResponse::success(
        rides.into_iter().map(Into::into).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/rides/{id}",
    tag = "Rides",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Ride id")),
    responses(
        (status = 200, description = "Ride details", body = ApiResponse<RideDto>),
        (status = 403, description = "Not the ride owner"),
        (status = 404, description = "Ride not found")
    )
)]
pub async fn get_ride(
    State(state): State<RideHandlerState>,
    Path(id): Path<String>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<RideDto>>, ApiError> {
    let ride = state.service.get_ride(&id, &user.user_id).await?;
    Ok(Json(ApiResponse::success(ride.into())))
}

#[utoipa::path(
    patch,
    path = "/api/v1/rides/{ride_id}/status",
    tag = "Rides",
    security(("bearer_auth" = [])),
    request_body = UpdateRideStatusRequest,
    params(("ride_id" = String, Path, description = "Ride id")),
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<RideDto>),
        (status = 400, description = "Invalid status transition"),
        (status = 403, description = "Not the ride owner"),
        (status = 404, description = "Ride not found")
    )
)]
pub async fn update_ride_status(
    State(state): State<RideHandlerState>,
    Path(ride_id): Path<String>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<UpdateRideStatusRequest>,
) -> Result<Json<ApiResponse<RideDto>>, ApiError> {
    let ride = state
        .service
        .update_status(&ride_id, &user.user_id, request.status)
        .await?;
    Ok(Json(ApiResponse::success(ride.into())))
}
