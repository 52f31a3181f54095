//! Ride service: quoting, booking and lifecycle use cases

use std::sync::Arc;

use chrono::{DateTime, Utc};
use metrics::counter;
use tracing::info;

use crate::domain::ride::{Ride, RideRepository, RideStatus, RideStop, RideVehicleType};
use crate::domain::user::UserRepository;
use crate::domain::{DomainError, DomainResult};

/// One page of a user's ride history plus the total row count.
#[derive(Debug, Clone)]
pub struct RideHistoryPage {
    pub rides: Vec<Ride>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

/// Service for ride bookings
pub struct RideService {
    rides: Arc<dyn RideRepository>,
    users: Arc<dyn UserRepository>,
}

impl RideService {
    pub fn new(rides: Arc<dyn RideRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { rides, users }
    }

    /// Pending rides of a vehicle class, soonest booking time first.
    pub async fn search_pending(
        &self,
        vehicle_type: RideVehicleType,
    ) -> DomainResult<Vec<Ride>> {
        self.rides.find_pending_by_vehicle_type(vehicle_type).await
    }

    /// Quote and create a new `pending` ride for the user.
    pub async fn create_ride(
        &self,
        user_id: &str,
        from: RideStop,
        to: RideStop,
        vehicle_type: RideVehicleType,
        booking_time: DateTime<Utc>,
    ) -> DomainResult<Ride> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "User",
                field: "id",
                value: user_id.to_string(),
            })?;

        let ride = Ride::new(user.id, None, from, to, vehicle_type, booking_time);
        self.rides.insert(ride.clone()).await?;

        counter!("parkride_rides_created_total").increment(1);
        info!(
            ride_id = %ride.id,
            user_id,
            vehicle_type = %ride.vehicle_type,
            distance_km = ride.distance_km,
            price = ride.price,
            "Ride created"
        );
        Ok(ride)
    }

    /// Fetch one ride; only its owner may see it.
    pub async fn get_ride(&self, ride_id: &str, user_id: &str) -> DomainResult<Ride> {
        let ride = self.find_owned(ride_id, user_id).await?;
        Ok(ride)
    }

    /// One page of the user's rides, newest first, optionally filtered by
    /// status.
    pub async fn ride_history(
        &self,
        user_id: &str,
        status: Option<RideStatus>,
        page: u32,
        limit: u32,
    ) -> DomainResult<RideHistoryPage> {
        let rides = self.rides.find_for_user(user_id, status, page, limit).await?;
        let total = self.rides.count_for_user(user_id, status).await?;
        Ok(RideHistoryPage {
            rides,
            total,
            page: page.max(1),
            limit,
        })
    }

    /// The user's non-terminal rides, soonest booking time first.
    pub async fn active_rides(&self, user_id: &str) -> DomainResult<Vec<Ride>> {
        self.rides.find_active_for_user(user_id).await
    }

    /// Advance a ride through its status machine on behalf of its owner.
    pub async fn update_status(
        &self,
        ride_id: &str,
        user_id: &str,
        next: RideStatus,
    ) -> DomainResult<Ride> {
        let mut ride = self.find_owned(ride_id, user_id).await?;
        let from = ride.status;
        ride.transition_to(next)?;
        self.rides.update(&ride).await?;

        counter!("parkride_ride_transitions_total").increment(1);
        info!(ride_id, user_id, from = %from, to = %next, "Ride status updated");
        Ok(ride)
    }

    async fn find_owned(&self, ride_id: &str, user_id: &str) -> DomainResult<Ride> {
        let ride = self
            .rides
            .find_by_id(ride_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "Ride",
                field: "id",
                value: ride_id.to_string(),
            })?;

        if ride.user_id != user_id {
            return Err(DomainError::NotAuthorized(
                "Not authorized to access this ride".to_string(),
            ));
        }
        Ok(ride)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geo::GeoPoint;
    use crate::domain::user::User;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct InMemoryRides {
        rows: Mutex<HashMap<String, Ride>>,
    }

    impl InMemoryRides {
        fn new() -> Self {
            Self {
                rows: Mutex::new(HashMap::new()),
            }
        }
    }

    #[async_trait]
    impl RideRepository for InMemoryRides {
        async fn insert(&self, ride: Ride) -> DomainResult<()> {
            self.rows.lock().unwrap().insert(ride.id.clone(), ride);
            Ok(())
        }

        async fn update(&self, ride: &Ride) -> DomainResult<()> {
            let mut rows = self.rows.lock().unwrap();
            if !rows.contains_key(&ride.id) {
                return Err(DomainError::NotFound {
                    entity: "Ride",
                    field: "id",
                    value: ride.id.clone(),
                });
            }
            rows.insert(ride.id.clone(), ride.clone());
            Ok(())
        }

        async fn find_by_id(&self, id: &str) -> DomainResult<Option<Ride>> {
            Ok(self.rows.lock().unwrap().get(id).cloned())
        }

        async fn find_pending_by_vehicle_type(
            &self,
            vehicle_type: RideVehicleType,
        ) -> DomainResult<Vec<Ride>> {
            let mut rides: Vec<Ride> = self
                .rows
                .lock()
                .unwrap()
                .values()
                .filter(|r| r.vehicle_type == vehicle_type && r.status == RideStatus::Pending)
                .cloned()
                .collect();
            rides.sort_by(|a, b| a.booking_time.cmp(&b.booking_time));
            Ok(rides)
        }

        async fn find_for_user(
            &self,
            user_id: &str,
            status: Option<RideStatus>,
            page: u32,
            limit: u32,
        ) -> DomainResult<Vec<Ride>> {
            let mut rides: Vec<Ride> = self
                .rows
                .lock()
                .unwrap()
                .values()
                .filter(|r| r.user_id == user_id && status.map_or(true, |s| r.status == s))
                .cloned()
                .collect();
            rides.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            let offset = ((page.max(1) - 1) * limit) as usize;
            Ok(rides.into_iter().skip(offset).take(limit as usize).collect())
        }

        async fn count_for_user(
            &self,
            user_id: &str,
            status: Option<RideStatus>,
        ) -> DomainResult<u64> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .values()
                .filter(|r| r.user_id == user_id && status.map_or(true, |s| r.status == s))
                .count() as u64)
        }

        async fn find_active_for_user(&self, user_id: &str) -> DomainResult<Vec<Ride>> {
            let mut rides: Vec<Ride> = self
                .rows
                .lock()
                .unwrap()
                .values()
                .filter(|r| r.user_id == user_id && r.status.is_active())
                .cloned()
                .collect();
            rides.sort_by(|a, b| a.booking_time.cmp(&b.booking_time));
            Ok(rides)
        }
    }

    struct InMemoryUsers {
        rows: Mutex<HashMap<String, User>>,
    }

    #[async_trait]
    impl UserRepository for InMemoryUsers {
        async fn insert(&self, user: User) -> DomainResult<()> {
            self.rows.lock().unwrap().insert(user.id.clone(), user);
            Ok(())
        }

        async fn update(&self, user: &User) -> DomainResult<()> {
            self.rows
                .lock()
                .unwrap()
                .insert(user.id.clone(), user.clone());
            Ok(())
        }

        async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>> {
            Ok(self.rows.lock().unwrap().get(id).cloned())
        }

        async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .values()
                .find(|u| u.email == email)
                .cloned())
        }
    }

    fn stop(longitude: f64, latitude: f64) -> RideStop {
        RideStop {
            address: "somewhere".to_string(),
            point: GeoPoint::new(longitude, latitude),
        }
    }

    async fn service_with_user(user_id: &str) -> RideService {
        let users = Arc::new(InMemoryUsers {
            rows: Mutex::new(HashMap::new()),
        });
        let mut user = User::new("Test", "test@example.com", "hash", "+1 555 0100");
        user.id = user_id.to_string();
        users.insert(user).await.unwrap();
        RideService::new(Arc::new(InMemoryRides::new()), users)
    }

    #[tokio::test]
    async fn create_ride_quotes_and_persists() {
        let svc = service_with_user("u1").await;
        let ride = svc
            .create_ride(
                "u1",
                stop(77.2090, 28.6139),
                stop(77.1885, 28.5275),
                RideVehicleType::Suv,
                Utc::now(),
            )
            .await
            .unwrap();
        assert_eq!(ride.status, RideStatus::Pending);
        assert!(ride.price > 0.0);

        let fetched = svc.get_ride(&ride.id, "u1").await.unwrap();
        assert_eq!(fetched, ride);
    }

    #[tokio::test]
    async fn create_ride_for_unknown_user_fails() {
        let svc = service_with_user("u1").await;
        let err = svc
            .create_ride(
                "ghost",
                stop(77.20, 28.61),
                stop(77.18, 28.52),
                RideVehicleType::Sedan,
                Utc::now(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "User", .. }));
    }

    #[tokio::test]
    async fn get_ride_is_owner_only() {
        let svc = service_with_user("u1").await;
        let ride = svc
            .create_ride(
                "u1",
                stop(77.20, 28.61),
                stop(77.18, 28.52),
                RideVehicleType::Sedan,
                Utc::now(),
            )
            .await
            .unwrap();
        let err = svc.get_ride(&ride.id, "u2").await.unwrap_err();
        assert!(matches!(err, DomainError::NotAuthorized(_)));
    }

    #[tokio::test]
    async fn update_status_walks_the_machine_and_persists() {
        let svc = service_with_user("u1").await;
        let ride = svc
            .create_ride(
                "u1",
                stop(77.20, 28.61),
                stop(77.18, 28.52),
                RideVehicleType::Sedan,
                Utc::now(),
            )
            .await
            .unwrap();

        svc.update_status(&ride.id, "u1", RideStatus::Confirmed)
            .await
            .unwrap();
        svc.update_status(&ride.id, "u1", RideStatus::InProgress)
            .await
            .unwrap();
        let done = svc
            .update_status(&ride.id, "u1", RideStatus::Completed)
            .await
            .unwrap();
        assert!(done.completed_at.is_some());

        // Terminal: no further transitions
        let err = svc
            .update_status(&ride.id, "u1", RideStatus::Cancelled)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn invalid_transition_is_not_persisted() {
        let svc = service_with_user("u1").await;
        let ride = svc
            .create_ride(
                "u1",
                stop(77.20, 28.61),
                stop(77.18, 28.52),
                RideVehicleType::Sedan,
                Utc::now(),
            )
            .await
            .unwrap();
        let err = svc
            .update_status(&ride.id, "u1", RideStatus::Completed)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));
        let fetched = svc.get_ride(&ride.id, "u1").await.unwrap();
        assert_eq!(fetched.status, RideStatus::Pending);
    }

    #[tokio::test]
    async fn history_paginates_and_counts() {
        let svc = service_with_user("u1").await;
        for _ in 0..5 {
            svc.create_ride(
                "u1",
                stop(77.20, 28.61),
                stop(77.18, 28.52),
                RideVehicleType::Sedan,
                Utc::now(),
            )
            .await
            .unwrap();
        }

        let page = svc.ride_history("u1", None, 1, 2).await.unwrap();
        assert_eq!(page.rides.len(), 2);
        assert_eq!(page.total, 5);

        let page = svc.ride_history("u1", None, 3, 2).await.unwrap();
        assert_eq!(page.rides.len(), 1);

        let page = svc
            .ride_history("u1", Some(RideStatus::Cancelled), 1, 10)
            .await
            .unwrap();
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn search_pending_filters_vehicle_type_and_status() {
        let svc = service_with_user("u1").await;
        let sedan = svc
            .create_ride(
                "u1",
                stop(77.20, 28.61),
                stop(77.18, 28.52),
                RideVehicleType::Sedan,
                Utc::now(),
            )
            .await
            .unwrap();
        svc.update_status(&sedan.id, "u1", RideStatus::Cancelled)
            .await
            .unwrap();
        let suv = svc
            .create_ride(
                "u1",
                stop(77.20, 28.61),
                stop(77.18, 28.52),
                RideVehicleType::Suv,
                Utc::now(),
            )
            .await
            .unwrap();

        assert!(svc
            .search_pending(RideVehicleType::Sedan)
            .await
            .unwrap()
            .is_empty());
        let found = svc.search_pending(RideVehicleType::Suv).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, suv.id);
    }

    #[tokio::test]
    async fn active_rides_exclude_terminal() {
        let svc = service_with_user("u1").await;
        let a = svc
            .create_ride(
                "u1",
                stop(77.20, 28.61),
                stop(77.18, 28.52),
                RideVehicleType::Sedan,
                Utc::now(),
            )
            .await
            .unwrap();
        let b = svc
            .create_ride(
                "u1",
                stop(77.20, 28.61),
                stop(77.18, 28.52),
                RideVehicleType::Van,
                Utc::now(),
            )
            .await
            .unwrap();
        svc.update_status(&a.id, "u1", RideStatus::Cancelled)
            .await
            .unwrap();

        let active = svc.active_rides("u1").await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, b.id);
    }
}
