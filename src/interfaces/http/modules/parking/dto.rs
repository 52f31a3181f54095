//! Parking DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::services::parking::{BookingRecord, LocationSearchHit};
use crate::domain::parking::{Booking, BookingStatus, ParkingLocation, Slot, VehicleType};

/// Query parameters for location search. Without an origin, every location
/// is returned; with one, results are filtered to `radius_km` and sorted
/// nearest first.
#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchParams {
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    /// Search radius in kilometers. Default: 5
    pub radius_km: Option<f64>,
}

/// Query parameters for the location detail view. Supplying all three turns
/// on availability filtering of the slot list.
#[derive(Debug, Deserialize, IntoParams)]
pub struct AvailabilityParams {
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub vehicle_type: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BookingDto {
    pub id: String,
    pub user_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: BookingStatus,
    pub vehicle_type: VehicleType,
}

impl From<Booking> for BookingDto {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id,
            user_id: b.user_id,
            start_time: b.start_time,
            end_time: b.end_time,
            status: b.status,
            vehicle_type: b.vehicle_type,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SlotDto {
    pub id: String,
    pub number: String,
    #[serde(rename = "type")]
    pub slot_type: String,
    pub available: bool,
    pub bookings: Vec<BookingDto>,
}

impl From<Slot> for SlotDto {
    fn from(s: Slot) -> Self {
        Self {
            id: s.id,
            number: s.number,
            slot_type: s.slot_type,
            available: s.available,
            bookings: s.bookings.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ParkingLocationDto {
    pub id: String,
    pub name: String,
    pub address: String,
    pub longitude: f64,
    pub latitude: f64,
    pub total_slots: i32,
    pub available_slots: i32,
    pub price_per_hour: f64,
    pub rating: f64,
    pub reviews: i32,
    pub features: Vec<String>,
    /// Distance from the search origin, when one was given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

impl ParkingLocationDto {
    pub fn from_location(location: &ParkingLocation, distance_km: Option<f64>) -> Self {
        Self {
            id: location.id.clone(),
            name: location.name.clone(),
            address: location.address.clone(),
            longitude: location.location.longitude,
            latitude: location.location.latitude,
            total_slots: location.total_slots,
            available_slots: location.available_slots,
            price_per_hour: location.price_per_hour,
            rating: location.rating,
            reviews: location.reviews,
            features: location.features.clone(),
            distance_km,
        }
    }
}

impl From<LocationSearchHit> for ParkingLocationDto {
    fn from(hit: LocationSearchHit) -> Self {
        Self::from_location(&hit.location, hit.distance_km)
    }
}

/// Location detail: summary plus its slot list. `slots` holds only the
/// bookable subset when the request carried an availability query.
#[derive(Debug, Serialize, ToSchema)]
pub struct LocationDetailDto {
    #[serde(flatten)]
    pub location: ParkingLocationDto,
    pub slots: Vec<SlotDto>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BookSlotRequest {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub vehicle_type: VehicleType,
}

/// Booking with location context, as shown in history/active views
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingRecordDto {
    pub parking_id: String,
    pub parking_name: String,
    pub address: String,
    pub price_per_hour: f64,
    pub slot_id: String,
    pub slot_number: String,
    pub booking: BookingDto,
}

impl From<BookingRecord> for BookingRecordDto {
    fn from(r: BookingRecord) -> Self {
        Self {
            parking_id: r.parking_id,
            parking_name: r.parking_name,
            address: r.address,
            price_per_hour: r.price_per_hour,
            slot_id: r.slot_id,
            slot_number: r.slot_number,
            booking: r.booking.into(),
        }
    }
}
