//! Aggregated access to all repositories

use std::sync::Arc;

use crate::domain::parking::ParkingLocationRepository;
use crate::domain::ride::RideRepository;
use crate::domain::user::UserRepository;

/// Provides repository instances to the application layer. Implemented by
/// the database infrastructure; services depend only on this trait.
pub trait RepositoryProvider: Send + Sync {
    fn parking_locations(&self) -> Arc<dyn ParkingLocationRepository>;
    fn rides(&self) -> Arc<dyn RideRepository>;
    fn users(&self) -> Arc<dyn UserRepository>;
}
