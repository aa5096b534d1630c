//! Migration: Create cars, drivers and tours tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Cars::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Cars::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Cars::Name).string().not_null())
                    .col(ColumnDef::new(Cars::Brand).string().not_null())
                    .col(ColumnDef::new(Cars::Seats).integer().not_null())
                    .col(ColumnDef::new(Cars::PricePerDay).big_integer().not_null())
                    .col(ColumnDef::new(Cars::Stock).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Cars::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Cars::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Drivers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Drivers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Drivers::Name).string().not_null())
                    .col(ColumnDef::new(Drivers::Phone).string().not_null())
                    .col(ColumnDef::new(Drivers::PricePerDay).big_integer().not_null())
                    .col(
                        ColumnDef::new(Drivers::IsAvailable)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Drivers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Drivers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Tours::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tours::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tours::Name).string().not_null())
                    .col(ColumnDef::new(Tours::Destination).string().not_null())
                    .col(ColumnDef::new(Tours::Price).big_integer().not_null())
                    .col(
                        ColumnDef::new(Tours::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Tours::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tours::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Drivers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Cars::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(super) enum Cars {
    Table,
    Id,
    Name,
    Brand,
    Seats,
    PricePerDay,
    Stock,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(super) enum Drivers {
    Table,
    Id,
    Name,
    Phone,
    PricePerDay,
    IsAvailable,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(super) enum Tours {
    Table,
    Id,
    Name,
    Destination,
    Price,
    CreatedAt,
    UpdatedAt,
}
