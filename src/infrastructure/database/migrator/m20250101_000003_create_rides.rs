//! Create rides table

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Rides::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Rides::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Rides::UserId).string().not_null())
                    .col(ColumnDef::new(Rides::DriverId).string())
                    .col(ColumnDef::new(Rides::FromAddress).string().not_null())
                    .col(ColumnDef::new(Rides::FromLongitude).double().not_null())
                    .col(ColumnDef::new(Rides::FromLatitude).double().not_null())
                    .col(ColumnDef::new(Rides::ToAddress).string().not_null())
                    .col(ColumnDef::new(Rides::ToLongitude).double().not_null())
                    .col(ColumnDef::new(Rides::ToLatitude).double().not_null())
                    .col(ColumnDef::new(Rides::VehicleType).string().not_null())
                    .col(
                        ColumnDef::new(Rides::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Rides::BookingTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Rides::CompletedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Rides::Price).double().not_null())
                    .col(ColumnDef::new(Rides::DistanceKm).double().not_null())
                    .col(
                        ColumnDef::new(Rides::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Rides::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rides_user")
                            .from(Rides::Table, Rides::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // History / active queries filter by user then status
        manager
            .create_index(
                Index::create()
                    .name("idx_rides_user")
                    .table(Rides::Table)
                    .col(Rides::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_rides_status")
                    .table(Rides::Table)
                    .col(Rides::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Rides::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Rides {
    Table,
    Id,
    UserId,
    DriverId,
    FromAddress,
    FromLongitude,
    FromLatitude,
    ToAddress,
    ToLongitude,
    ToLatitude,
    VehicleType,
    Status,
    BookingTime,
    CompletedAt,
    Price,
    DistanceKm,
    CreatedAt,
    UpdatedAt,
}
