//! Ride repository interface

use async_trait::async_trait;

use super::model::{Ride, RideStatus, RideVehicleType};
use crate::domain::DomainResult;

#[async_trait]
pub trait RideRepository: Send + Sync {
    /// Save a new ride
    async fn insert(&self, ride: Ride) -> DomainResult<()>;

    /// Update an existing ride
    async fn update(&self, ride: &Ride) -> DomainResult<()>;

    /// Find ride by ID
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Ride>>;

    /// Pending rides of a vehicle class, soonest booking time first
    async fn find_pending_by_vehicle_type(
        &self,
        vehicle_type: RideVehicleType,
    ) -> DomainResult<Vec<Ride>>;

    /// One page of a user's rides, newest first, optionally filtered by status
    async fn find_for_user(
        &self,
        user_id: &str,
        status: Option<RideStatus>,
        page: u32,
        limit: u32,
    ) -> DomainResult<Vec<Ride>>;

    /// Total count matching `find_for_user`'s filter (for pagination)
    async fn count_for_user(
        &self,
        user_id: &str,
        status: Option<RideStatus>,
    ) -> DomainResult<u64>;

    /// A user's non-terminal rides, soonest booking time first
    async fn find_active_for_user(&self, user_id: &str) -> DomainResult<Vec<Ride>>;
}
