//! Parking module: location search, availability, slot bookings

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
