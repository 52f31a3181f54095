//! SeaORM implementation of UserRepository

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tracing::debug;

use crate::domain::geo::GeoPoint;
use crate::domain::user::{User, UserRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::user;

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: user::Model) -> User {
    User {
        id: m.id,
        name: m.name,
        email: m.email,
        password_hash: m.password_hash,
        phone_number: m.phone_number,
        location: GeoPoint::new(m.longitude, m.latitude),
        avatar: m.avatar,
        notifications: m.notifications,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn domain_to_active(u: &User) -> user::ActiveModel {
    user::ActiveModel {
        id: Set(u.id.clone()),
        name: Set(u.name.clone()),
        email: Set(u.email.clone()),
        password_hash: Set(u.password_hash.clone()),
        phone_number: Set(u.phone_number.clone()),
        longitude: Set(u.location.longitude),
        latitude: Set(u.location.latitude),
        avatar: Set(u.avatar.clone()),
        notifications: Set(u.notifications),
        created_at: Set(u.created_at),
        updated_at: Set(u.updated_at),
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(e.to_string())
}

// ── UserRepository impl ─────────────────────────────────────────

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn insert(&self, u: User) -> DomainResult<()> {
        debug!("Saving user: {}", u.id);
        domain_to_active(&u).insert(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn update(&self, u: &User) -> DomainResult<()> {
        let existing = user::Entity::find_by_id(&u.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        if existing.is_none() {
            return Err(DomainError::NotFound {
                entity: "User",
                field: "id",
                value: u.id.clone(),
            });
        }

        domain_to_active(u).update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }
}
