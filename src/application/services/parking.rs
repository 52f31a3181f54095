//! Parking service: search, availability, and booking use cases.
//!
//! Every booking mutation is a load / mutate-aggregate / persist sequence
//! over one location row. There is no locking or version check between the
//! load and the update; concurrent writers can interleave.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use metrics::counter;
use tracing::info;

use crate::domain::parking::{
    Booking, ParkingLocation, ParkingLocationRepository, Slot, VehicleType,
};
use crate::domain::{DomainError, DomainResult, GeoPoint};

/// A location search hit, with the distance from the search origin when one
/// was given.
#[derive(Debug, Clone)]
pub struct LocationSearchHit {
    pub location: ParkingLocation,
    pub distance_km: Option<f64>,
}

/// A location detail view; `available_slots` is populated when the caller
/// asked for an availability-filtered view.
#[derive(Debug, Clone)]
pub struct LocationDetail {
    pub location: ParkingLocation,
    pub available_slots: Option<Vec<Slot>>,
}

/// One booking with enough location context to render a history row.
#[derive(Debug, Clone)]
pub struct BookingRecord {
    pub parking_id: String,
    pub parking_name: String,
    pub address: String,
    pub price_per_hour: f64,
    pub slot_id: String,
    pub slot_number: String,
    pub booking: Booking,
}

/// Service for parking locations and slot bookings
pub struct ParkingService {
    locations: Arc<dyn ParkingLocationRepository>,
}

impl ParkingService {
    pub fn new(locations: Arc<dyn ParkingLocationRepository>) -> Self {
        Self { locations }
    }

    /// List locations, optionally filtered to those within `radius_km` of
    /// `origin`. With an origin, hits carry their distance and are sorted
    /// nearest first.
    pub async fn search(
        &self,
        origin: Option<GeoPoint>,
        radius_km: Option<f64>,
    ) -> DomainResult<Vec<LocationSearchHit>> {
        let all = self.locations.find_all().await?;

        let mut hits: Vec<LocationSearchHit> = match origin {
            None => all
                .into_iter()
                .map(|location| LocationSearchHit {
                    location,
                    distance_km: None,
                })
                .collect(),
            Some(origin) => {
                let radius = radius_km.unwrap_or(5.0);
                all.into_iter()
                    .filter_map(|location| {
                        let d = origin.distance_km(&location.location);
                        (d <= radius).then_some(LocationSearchHit {
                            location,
                            distance_km: Some(d),
                        })
                    })
                    .collect()
            }
        };

        if origin.is_some() {
            hits.sort_by(|a, b| {
                a.distance_km
                    .partial_cmp(&b.distance_km)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }
        Ok(hits)
    }

    /// Fetch one location. When an interval and vehicle type are given, the
    /// availability resolver runs over its slots and the matching slots are
    /// returned alongside.
    pub async fn get_location(
        &self,
        id: &str,
        availability: Option<(DateTime<Utc>, DateTime<Utc>, String)>,
    ) -> DomainResult<LocationDetail> {
        let location = self
            .locations
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "ParkingLocation",
                field: "id",
                value: id.to_string(),
            })?;

        let available_slots = availability.map(|(start, end, vehicle_type)| {
            location
                .find_available_slots(start, end, &vehicle_type)
                .into_iter()
                .cloned()
                .collect()
        });

        Ok(LocationDetail {
            location,
            available_slots,
        })
    }

    /// Reserve a slot. The duplicate-active-booking rule is checked here and
    /// again inside the ledger; both sides enforce it independently.
    pub async fn book_slot(
        &self,
        parking_id: &str,
        slot_id: &str,
        user_id: &str,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        vehicle_type: VehicleType,
    ) -> DomainResult<Booking> {
        let mut location = self
            .locations
            .find_by_id(parking_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "ParkingLocation",
                field: "id",
                value: parking_id.to_string(),
            })?;

        if location.has_active_booking(user_id) {
            return Err(DomainError::DuplicateActiveBooking);
        }

        let booking = location.book_slot(slot_id, user_id, start_time, end_time, vehicle_type)?;
        location.updated_at = Utc::now();
        self.locations.update(&location).await?;

        counter!("parkride_bookings_created_total").increment(1);
        info!(
            parking_id,
            slot_id,
            user_id,
            booking_id = %booking.id,
            "Slot booked"
        );
        Ok(booking)
    }

    /// Cancel a booking on behalf of its owner.
    pub async fn cancel_booking(
        &self,
        parking_id: &str,
        slot_id: &str,
        booking_id: &str,
        user_id: &str,
    ) -> DomainResult<Booking> {
        let mut location = self
            .locations
            .find_by_id(parking_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "ParkingLocation",
                field: "id",
                value: parking_id.to_string(),
            })?;

        let booking = location.cancel_booking(slot_id, booking_id, user_id)?;
        location.updated_at = Utc::now();
        self.locations.update(&location).await?;

        counter!("parkride_bookings_cancelled_total").increment(1);
        info!(parking_id, slot_id, booking_id, user_id, "Booking cancelled");
        Ok(booking)
    }

    /// All of a user's bookings across every location, newest start first.
    pub async fn booking_history(&self, user_id: &str) -> DomainResult<Vec<BookingRecord>> {
        let mut records = self.collect_bookings(user_id).await?;
        records.sort_by(|a, b| b.booking.start_time.cmp(&a.booking.start_time));
        Ok(records)
    }

    /// A user's upcoming/active bookings that have not yet ended, soonest
    /// start first.
    pub async fn active_bookings(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<Vec<BookingRecord>> {
        let mut records = self.collect_bookings(user_id).await?;
        records.retain(|r| r.booking.status.is_active() && r.booking.end_time >= now);
        records.sort_by(|a, b| a.booking.start_time.cmp(&b.booking.start_time));
        Ok(records)
    }

    async fn collect_bookings(&self, user_id: &str) -> DomainResult<Vec<BookingRecord>> {
        let locations = self.locations.find_all().await?;
        let mut records = Vec::new();
        for location in locations {
            for slot in &location.slots {
                for booking in &slot.bookings {
                    if booking.user_id == user_id {
                        records.push(BookingRecord {
                            parking_id: location.id.clone(),
                            parking_name: location.name.clone(),
                            address: location.address.clone(),
                            price_per_hour: location.price_per_hour,
                            slot_id: slot.id.clone(),
                            slot_number: slot.number.clone(),
                            booking: booking.clone(),
                        });
                    }
                }
            }
        }
        Ok(records)
    }
}

// ── Tests ──────────────────────────────────────────────────────
