//! Parking aggregate: locations, slots, bookings and the booking ledger

pub mod model;
pub mod repository;

pub use model::{
    find_available_slots, Booking, BookingStatus, ParkingLocation, Slot, VehicleType,
};
pub use repository::ParkingLocationRepository;
