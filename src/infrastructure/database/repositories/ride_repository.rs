//! SeaORM implementation of RideRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use tracing::debug;

use crate::domain::geo::GeoPoint;
use crate::domain::ride::{Ride, RideRepository, RideStatus, RideStop, RideVehicleType};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::ride;

pub struct SeaOrmRideRepository {
    db: DatabaseConnection,
}

impl SeaOrmRideRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: ride::Model) -> DomainResult<Ride> {
    let status = RideStatus::from_str(&m.status)
        .ok_or_else(|| DomainError::Storage(format!("unknown ride status: {}", m.status)))?;
    let vehicle_type = match m.vehicle_type.as_str() {
        "Sedan" => RideVehicleType::Sedan,
        "SUV" => RideVehicleType::Suv,
        "Luxury" => RideVehicleType::Luxury,
        "Van" => RideVehicleType::Van,
        other => {
            return Err(DomainError::Storage(format!(
                "unknown ride vehicle type: {}",
                other
            )))
        }
    };

    Ok(Ride {
        id: m.id,
        user_id: m.user_id,
        driver_id: m.driver_id,
        from: RideStop {
            address: m.from_address,
            point: GeoPoint::new(m.from_longitude, m.from_latitude),
        },
        to: RideStop {
            address: m.to_address,
            point: GeoPoint::new(m.to_longitude, m.to_latitude),
        },
        vehicle_type,
        status,
        booking_time: m.booking_time,
        completed_at: m.completed_at,
        price: m.price,
        distance_km: m.distance_km,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

fn domain_to_active(r: &Ride) -> ride::ActiveModel {
    ride::ActiveModel {
        id: Set(r.id.clone()),
        user_id: Set(r.user_id.clone()),
        driver_id: Set(r.driver_id.clone()),
        from_address: Set(r.from.address.clone()),
        from_longitude: Set(r.from.point.longitude),
        from_latitude: Set(r.from.point.latitude),
        to_address: Set(r.to.address.clone()),
        to_longitude: Set(r.to.point.longitude),
        to_latitude: Set(r.to.point.latitude),
        vehicle_type: Set(r.vehicle_type.as_str().to_string()),
        status: Set(r.status.as_str().to_string()),
        booking_time: Set(r.booking_time),
        completed_at: Set(r.completed_at),
        price: Set(r.price),
        distance_km: Set(r.distance_km),
        created_at: Set(r.created_at),
        updated_at: Set(r.updated_at),
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(e.to_string())
}

// ── RideRepository impl ─────────────────────────────────────────

#[async_trait]
impl RideRepository for SeaOrmRideRepository {
    async fn insert(&self, r: Ride) -> DomainResult<()> {
        debug!("Saving ride: {}", r.id);
        domain_to_active(&r).insert(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn update(&self, r: &Ride) -> DomainResult<()> {
        debug!("Updating ride: {}", r.id);

        let existing = ride::Entity::find_by_id(&r.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        if existing.is_none() {
            return Err(DomainError::NotFound {
                entity: "Ride",
                field: "id",
                value: r.id.clone(),
            });
        }

        domain_to_active(r).update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Ride>> {
        let model = ride::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        model.map(model_to_domain).transpose()
    }

    async fn find_pending_by_vehicle_type(
        &self,
        vehicle_type: RideVehicleType,
    ) -> DomainResult<Vec<Ride>> {
        let models = ride::Entity::find()
            .filter(ride::Column::VehicleType.eq(vehicle_type.as_str()))
            .filter(ride::Column::Status.eq(RideStatus::Pending.as_str()))
            .order_by_asc(ride::Column::BookingTime)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }

    async fn find_for_user(
        &self,
        user_id: &str,
        status: Option<RideStatus>,
        page: u32,
        limit: u32,
    ) -> DomainResult<Vec<Ride>> {
        let mut query = ride::Entity::find().filter(ride::Column::UserId.eq(user_id));
        if let Some(status) = status {
            query = query.filter(ride::Column::Status.eq(status.as_str()));
        }
        let models = query
            .order_by_desc(ride::Column::CreatedAt)
            .offset(((page.max(1) - 1) as u64) * limit as u64)
            .limit(limit as u64)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }

    async fn count_for_user(
        &self,
        user_id: &str,
        status: Option<RideStatus>,
    ) -> DomainResult<u64> {
        let mut query = ride::Entity::find().filter(ride::Column::UserId.eq(user_id));
        if let Some(status) = status {
            query = query.filter(ride::Column::Status.eq(status.as_str()));
        }
        query.count(&self.db).await.map_err(db_err)
    }

    async fn find_active_for_user(&self, user_id: &str) -> DomainResult<Vec<Ride>> {
        let active = [
            RideStatus::Pending.as_str(),
            RideStatus::Confirmed.as_str(),
            RideStatus::InProgress.as_str(),
        ];
        let models = ride::Entity::find()
            .filter(ride::Column::UserId.eq(user_id))
            .filter(ride::Column::Status.is_in(active))
            .order_by_asc(ride::Column::BookingTime)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }
}
