//! Parking location entity
//!
//! One row per facility. The slot list (with nested bookings) is stored as a
//! single JSON document column so every ledger mutation is one-row
//! read-modify-write, matching the aggregate model.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "parking_locations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub name: String,
    pub address: String,

    pub longitude: f64,
    pub latitude: f64,

    pub total_slots: i32,
    /// Denormalized availability counter (see domain model)
    pub available_slots: i32,
    pub price_per_hour: f64,
    pub rating: f64,
    pub reviews: i32,

    /// JSON array of feature strings
    pub features: Json,
    /// JSON array of slot documents, bookings nested inside
    pub slots: Json,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
