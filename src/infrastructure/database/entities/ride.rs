//! Ride entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rides")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub user_id: String,
    #[sea_orm(nullable)]
    pub driver_id: Option<String>,

    pub from_address: String,
    pub from_longitude: f64,
    pub from_latitude: f64,
    pub to_address: String,
    pub to_longitude: f64,
    pub to_latitude: f64,

    /// Ride fleet vehicle class: Sedan, SUV, Luxury, Van
    pub vehicle_type: String,
    /// Status: pending, confirmed, in-progress, completed, cancelled
    pub status: String,

    pub booking_time: DateTimeUtc,
    #[sea_orm(nullable)]
    pub completed_at: Option<DateTimeUtc>,

    pub price: f64,
    pub distance_km: f64,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
