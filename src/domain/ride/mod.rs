//! Ride aggregate: rides, pricing and the status state machine

pub mod model;
pub mod repository;

pub use model::{quote, Ride, RideStatus, RideStop, RideVehicleType};
pub use repository::RideRepository;
