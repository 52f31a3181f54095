//! SeaORM implementation of ParkingLocationRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, Set,
};
use tracing::debug;

use crate::domain::geo::GeoPoint;
use crate::domain::parking::{ParkingLocation, ParkingLocationRepository, Slot};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::parking_location;

pub struct SeaOrmParkingLocationRepository {
    db: DatabaseConnection,
}

impl SeaOrmParkingLocationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: parking_location::Model) -> DomainResult<ParkingLocation> {
    let features: Vec<String> = serde_json::from_value(m.features)
        .map_err(|e| DomainError::Storage(format!("corrupt features document: {}", e)))?;
    let slots: Vec<Slot> = serde_json::from_value(m.slots)
        .map_err(|e| DomainError::Storage(format!("corrupt slots document: {}", e)))?;

    Ok(ParkingLocation {
        id: m.id,
        name: m.name,
        address: m.address,
        location: GeoPoint::new(m.longitude, m.latitude),
        total_slots: m.total_slots,
        available_slots: m.available_slots,
        price_per_hour: m.price_per_hour,
        rating: m.rating,
        reviews: m.reviews,
        features,
        slots,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

fn domain_to_active(loc: &ParkingLocation) -> DomainResult<parking_location::ActiveModel> {
    let features = serde_json::to_value(&loc.features)
        .map_err(|e| DomainError::Storage(format!("serialize features: {}", e)))?;
    let slots = serde_json::to_value(&loc.slots)
        .map_err(|e| DomainError::Storage(format!("serialize slots: {}", e)))?;

    Ok(parking_location::ActiveModel {
        id: Set(loc.id.clone()),
        name: Set(loc.name.clone()),
        address: Set(loc.address.clone()),
        longitude: Set(loc.location.longitude),
        latitude: Set(loc.location.latitude),
        total_slots: Set(loc.total_slots),
        available_slots: Set(loc.available_slots),
        price_per_hour: Set(loc.price_per_hour),
        rating: Set(loc.rating),
        reviews: Set(loc.reviews),
        features: Set(features),
        slots: Set(slots),
        created_at: Set(loc.created_at),
        updated_at: Set(loc.updated_at),
    })
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(e.to_string())
}

// ── ParkingLocationRepository impl ──────────────────────────────

#[async_trait]
impl ParkingLocationRepository for SeaOrmParkingLocationRepository {
    async fn insert(&self, location: ParkingLocation) -> DomainResult<()> {
        debug!("Saving parking location: {}", location.id);
        let model = domain_to_active(&location)?;
        model.insert(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn update(&self, location: &ParkingLocation) -> DomainResult<()> {
        debug!("Updating parking location: {}", location.id);

        let existing = parking_location::Entity::find_by_id(&location.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        if existing.is_none() {
            return Err(DomainError::NotFound {
                entity: "ParkingLocation",
                field: "id",
                value: location.id.clone(),
            });
        }

        let model = domain_to_active(location)?;
        model.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<ParkingLocation>> {
        let model = parking_location::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        model.map(model_to_domain).transpose()
    }

    async fn find_all(&self) -> DomainResult<Vec<ParkingLocation>> {
        let models = parking_location::Entity::find()
            .order_by_asc(parking_location::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }

    async fn count(&self) -> DomainResult<u64> {
        parking_location::Entity::find()
            .count(&self.db)
            .await
            .map_err(db_err)
    }
}
