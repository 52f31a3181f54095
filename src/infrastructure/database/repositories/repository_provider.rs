//! SeaORM implementation of RepositoryProvider

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::domain::parking::ParkingLocationRepository;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::ride::RideRepository;
use crate::domain::user::UserRepository;

use super::parking_repository::SeaOrmParkingLocationRepository;
use super::ride_repository::SeaOrmRideRepository;
use super::user_repository::SeaOrmUserRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let lot = repos.parking_locations().find_by_id("CMS").await?;
/// let rides = repos.rides().find_active_for_user("u1").await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    parking_locations: Arc<SeaOrmParkingLocationRepository>,
    rides: Arc<SeaOrmRideRepository>,
    users: Arc<SeaOrmUserRepository>,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            parking_locations: Arc::new(SeaOrmParkingLocationRepository::new(db.clone())),
            rides: Arc::new(SeaOrmRideRepository::new(db.clone())),
            users: Arc::new(SeaOrmUserRepository::new(db)),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn parking_locations(&self) -> Arc<dyn ParkingLocationRepository> {
        self.parking_locations.clone()
    }

    fn rides(&self) -> Arc<dyn RideRepository> {
        self.rides.clone()
    }

    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }
}
