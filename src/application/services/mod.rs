//! Application services

pub mod parking;
pub mod ride;

pub use parking::{BookingRecord, LocationDetail, LocationSearchHit, ParkingService};
pub use ride::{RideHistoryPage, RideService};
