//! Parking location repository interface

use async_trait::async_trait;

use super::model::ParkingLocation;
use crate::domain::DomainResult;

#[async_trait]
pub trait ParkingLocationRepository: Send + Sync {
    /// Insert a new location document
    async fn insert(&self, location: ParkingLocation) -> DomainResult<()>;

    /// Persist the full location document (slots and bookings included).
    /// All ledger mutations go through this single-document update.
    async fn update(&self, location: &ParkingLocation) -> DomainResult<()>;

    /// Find a location by id
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<ParkingLocation>>;

    /// All locations, in insertion order
    async fn find_all(&self) -> DomainResult<Vec<ParkingLocation>>;

    /// Number of stored locations
    async fn count(&self) -> DomainResult<u64>;
}
