//! User entity for database

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub phone_number: String,
    pub longitude: f64,
    pub latitude: f64,
    #[sea_orm(nullable)]
    pub avatar: Option<String>,
    pub notifications: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::ride::Entity")]
    Rides,
}

impl Related<super::ride::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rides.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
