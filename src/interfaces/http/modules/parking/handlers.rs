//! Parking API handlers

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::{DateTime, Utc};

use super::dto::{
    AvailabilityParams, BookSlotRequest, BookingDto, BookingRecordDto, LocationDetailDto,
    ParkingLocationDto, SearchParams,
};
use crate::application::services::parking::ParkingService;
use crate::domain::{DomainError, GeoPoint};
use crate::interfaces::http::common::{ApiError, ApiResponse, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;

/// Parking state
#[derive(Clone)]
pub struct ParkingHandlerState {
    pub service: Arc<ParkingService>,
}

fn check_interval(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), ApiError> {
    if end <= start {
        return Err(
            DomainError::Validation("end_time must be after start_time".to_string()).into(),
        );
    }
    Ok(())
}

#[utoipa::path(
    get,
    path = "/api/v1/parking/search",
    tag = "Parking",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching parking locations", body = ApiResponse<Vec<ParkingLocationDto>>),
        (status = 400, description = "Incomplete origin coordinates")
    )
)]
pub async fn search_locations(
    State(state): State<ParkingHandlerState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<ApiResponse<Vec<ParkingLocationDto>>>, ApiError> {
    let origin = match (params.longitude, params.latitude) {
        (Some(longitude), Some(latitude)) => Some(GeoPoint::new(longitude, latitude)),
        (None, None) => None,
        _ => {
            return Err(DomainError::Validation(
                "longitude and latitude must be provided together".to_string(),
            )
            .into())
        }
    };

    let hits = state.service.search(origin, params.radius_km).await?;
    let dtos = hits.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

#[utoipa::path(
    get,
    path = "/api/v1/parking/{id}",
    tag = "Parking",
    params(
        ("id" = String, Path, description = "Parking location id"),
        AvailabilityParams
    ),
    responses(
        (status = 200, description = "Location details", body = ApiResponse<LocationDetailDto>),
        (status = 404, description = "Location not found")
    )
)]
pub async fn get_location(
    State(state): State<ParkingHandlerState>,
    Path(id): Path<String>,
    Query(params): Query<AvailabilityParams>,
) -> Result<Json<ApiResponse<LocationDetailDto>>, ApiError> {
    let availability = match (params.start_time, params.end_time, params.vehicle_type) {
        (Some(start), Some(end), Some(vehicle_type)) => {
            check_interval(start, end)?;
            Some((start, end, vehicle_type))
        }
        (None, None, None) => None,
        _ => {
            return Err(DomainError::Validation(
                "start_time, end_time and vehicle_type must be provided together".to_string(),
            )
            .into())
        }
    };

    let filtered = availability.is_some();
    let detail = state.service.get_location(&id, availability).await?;
    let slots = if filtered {
        detail.available_slots.unwrap_or_default()
    } else {
        detail.location.slots.clone()
    };

    Ok(Json(ApiResponse::success(LocationDetailDto {
        location: ParkingLocationDto::from_location(&detail.location, None),
        slots: slots.into_iter().map(Into::into).collect(),
    })))
}

#[utoipa::path(
    post,
    path = "/api/v1/parking/{parking_id}/slots/{slot_id}/book",
    tag = "Parking",
    security(("bearer_auth" = [])),
    request_body = BookSlotRequest,
    params(
        ("parking_id" = String, Path, description = "Parking location id"),
        ("slot_id" = String, Path, description = "Slot id within the location")
    ),
    responses(
        (status = 201, description = "Slot booked", body = ApiResponse<BookingDto>),
        (status = 400, description = "Time conflict or duplicate active booking"),
        (status = 404, description = "Location or slot not found")
    )
)]
pub async fn book_slot(
    State(state): State<ParkingHandlerState>,
    Path((parking_id, slot_id)): Path<(String, String)>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<BookSlotRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BookingDto>>), ApiError> {
    check_interval(request.start_time, request.end_time)?;

    let booking = state
        .service
        .book_slot(
            &parking_id,
            &slot_id,
            &user.user_id,
            request.start_time,
            request.end_time,
            request.vehicle_type,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(booking.into()))))
}

#[utoipa::path(
    post,
    path = "/api/v1/parking/{parking_id}/slots/{slot_id}/bookings/{booking_id}/cancel",
    tag = "Parking",
    security(("bearer_auth" = [])),
    params(
        ("parking_id" = String, Path, description = "Parking location id"),
        ("slot_id" = String, Path, description = "Slot id within the location"),
        ("booking_id" = String, Path, description = "Booking id")
    ),
    responses(
        (status = 200, description = "Booking cancelled", body = ApiResponse<BookingDto>),
        (status = 400, description = "Booking is not upcoming"),
        (status = 403, description = "Not the booking owner"),
        (status = 404, description = "Location, slot or booking not found")
    )
)]
pub async fn cancel_booking(
    State(state): State<ParkingHandlerState>,
    Path((parking_id, slot_id, booking_id)): Path<(String, String, String)>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<BookingDto>>, ApiError> {
    let booking = state
        .service
        .cancel_booking(&parking_id, &slot_id, &booking_id, &user.user_id)
        .await?;
    Ok(Json(ApiResponse::success(booking.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/parking/bookings/history",
    tag = "Parking",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All of the user's bookings, newest start first", body = ApiResponse<Vec<BookingRecordDto>>)
    )
)]
pub async fn booking_history(
    State(state): State<ParkingHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<Vec<BookingRecordDto>>>, ApiError> {
    let records = state.service.booking_history(&user.user_id).await?;
    Ok(Json(ApiResponse::success(
        records.into_iter().map(Into::into).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/parking/bookings/active",
    tag = "Parking",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The user's upcoming/active bookings that have not ended", body = ApiResponse<Vec<BookingRecordDto>>)
    )
)]
pub async fn active_bookings(
    State(state): State<ParkingHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<Vec<BookingRecordDto>>>, ApiError> {
    let records = state
        .service
        .active_bookings(&user.user_id, Utc::now())
        .await?;
    Ok(Json(ApiResponse::success(
        records.into_iter().map(Into::into).collect(),
    )))
}
