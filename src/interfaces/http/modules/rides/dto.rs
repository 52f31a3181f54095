//! Ride DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::ride::{Ride, RideStatus, RideStop, RideVehicleType};

/// One end of a ride
#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct RideStopDto {
    #[validate(length(min = 1, max = 200, message = "address is required"))]
    pub address: String,
    pub longitude: f64,
    pub latitude: f64,
}

impl From<RideStop> for RideStopDto {
    fn from(s: RideStop) -> Self {
        Self {
            address: s.address,
            longitude: s.point.longitude,
            latitude: s.point.latitude,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRideRequest {
    #[validate(nested)]
    pub from: RideStopDto,
    #[validate(nested)]
    pub to: RideStopDto,
    pub vehicle_type: RideVehicleType,
    /// Requested pickup time. Default: now
    pub booking_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRideStatusRequest {
    pub status: RideStatus,
}

/// Query parameters for the pending-rides search
#[derive(Debug, Deserialize, IntoParams)]
pub struct RideSearchParams {
    pub vehicle_type: RideVehicleType,
}

/// Query parameters for ride history
#[derive(Debug, Deserialize, IntoParams)]
pub struct RideHistoryParams {
    pub status: Option<RideStatus>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    20
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RideDto {
    pub id: String,
    pub user_id: String,
    pub driver_id: Option<String>,
    pub from: RideStopDto,
    pub to: RideStopDto,
    pub vehicle_type: RideVehicleType,
    pub status: RideStatus,
    pub booking_time: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub price: f64,
    pub distance_km: f64,
    pub created_at: DateTime<Utc>,
}

impl From<Ride> for RideDto {
    fn from(r: Ride) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            driver_id: r.driver_id,
            from: r.from.into(),
            to: r.to.into(),
            vehicle_type: r.vehicle_type,
            status: r.status,
            booking_time: r.booking_time,
            completed_at: r.completed_at,
            price: r.price,
            distance_km: r.distance_km,
            created_at: r.created_at,
        }
    }
}
