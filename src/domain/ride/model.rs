//! Ride domain entity, pricing and lifecycle

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::geo::{round2, GeoPoint};

/// Ride lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub enum RideStatus {
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "confirmed")]
    Confirmed,
    #[serde(rename = "in-progress")]
    InProgress,
    #[serde(rename = "completed")]
    Completed,
    #[serde(rename = "cancelled")]
    Cancelled,
}

impl RideStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "confirmed" => Some(Self::Confirmed),
            "in-progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Fixed transition table: pending → confirmed|cancelled,
    /// confirmed → in-progress|cancelled, in-progress → completed|cancelled.
    /// `completed` and `cancelled` are terminal.
    pub fn can_transition_to(&self, next: RideStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed)
                | (Self::Pending, Self::Cancelled)
                | (Self::Confirmed, Self::InProgress)
                | (Self::Confirmed, Self::Cancelled)
                | (Self::InProgress, Self::Completed)
                | (Self::InProgress, Self::Cancelled)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Non-terminal statuses shown in the "active rides" view
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }
}

impl std::fmt::Display for RideStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Vehicle class of the ride fleet. A separate enum from the parking
/// `VehicleType`: the fleet offers Luxury but no Truck/Motorcycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub enum RideVehicleType {
    Sedan,
    #[serde(rename = "SUV")]
    Suv,
    Luxury,
    Van,
}

impl RideVehicleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sedan => "Sedan",
            Self::Suv => "SUV",
            Self::Luxury => "Luxury",
            Self::Van => "Van",
        }
    }

    /// Per-kilometer base rate
    pub fn rate_per_km(&self) -> f64 {
        match self {
            Self::Sedan => 2.5,
            Self::Suv => 3.5,
            Self::Luxury => 5.0,
            Self::Van => 4.0,
        }
    }
}

impl std::fmt::Display for RideVehicleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One end of a ride: street address plus coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RideStop {
    pub address: String,
    pub point: GeoPoint,
}

/// Price quote for a ride between two points.
/// `price = round2(distance_km * rate_per_km)`, pure arithmetic.
pub fn quote(from: &GeoPoint, to: &GeoPoint, vehicle_type: RideVehicleType) -> (f64, f64) {
    let distance_km = from.distance_km(to);
    let price = round2(distance_km * vehicle_type.rate_per_km());
    (distance_km, price)
}

/// A user's ride booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ride {
    pub id: String,
    pub user_id: String,
    pub driver_id: Option<String>,
    pub from: RideStop,
    pub to: RideStop,
    pub vehicle_type: RideVehicleType,
    pub status: RideStatus,
    pub booking_time: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub price: f64,
    pub distance_km: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ride {
    /// Create a new `pending` ride with distance and price derived from the
    /// endpoints.
    pub fn new(
        user_id: impl Into<String>,
        driver_id: Option<String>,
        from: RideStop,
        to: RideStop,
        vehicle_type: RideVehicleType,
        booking_time: DateTime<Utc>,
    ) -> Self {
        let (distance_km, price) = quote(&from.point, &to.point, vehicle_type);
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            driver_id,
            from,
            to,
            vehicle_type,
            status: RideStatus::Pending,
            booking_time,
            completed_at: None,
            price,
            distance_km,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a status transition, enforcing the fixed table. Completing a
    /// ride records `completed_at`.
    pub fn transition_to(&mut self, next: RideStatus) -> DomainResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::invalid_transition(
                self.status.as_str(),
                next.as_str(),
            ));
        }
        self.status = next;
        if next == RideStatus::Completed {
            self.completed_at = Some(Utc::now());
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────
