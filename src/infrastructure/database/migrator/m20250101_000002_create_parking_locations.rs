//! Create parking_locations table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ParkingLocations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ParkingLocations::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ParkingLocations::Name).string().not_null())
                    .col(
                        ColumnDef::new(ParkingLocations::Address)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ParkingLocations::Longitude)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ParkingLocations::Latitude)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ParkingLocations::TotalSlots)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ParkingLocations::AvailableSlots)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ParkingLocations::PricePerHour)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ParkingLocations::Rating)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(ParkingLocations::Reviews)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(ParkingLocations::Features).json().not_null())
                    // The whole slot/booking document lives in this column
                    .col(ColumnDef::new(ParkingLocations::Slots).json().not_null())
                    .col(
                        ColumnDef::new(ParkingLocations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ParkingLocations::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ParkingLocations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ParkingLocations {
    Table,
    Id,
    Name,
    Address,
    Longitude,
    Latitude,
    TotalSlots,
    AvailableSlots,
    PricePerHour,
    Rating,
    Reviews,
    Features,
    Slots,
    CreatedAt,
    UpdatedAt,
}
