//! Migration: Create orders table with nullable fleet foreign keys.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;
use super::m20240101_000002_create_fleet_tables::{Cars, Drivers, Tours};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Orders::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Orders::UserId).integer().not_null())
                    .col(ColumnDef::new(Orders::CarId).integer().null())
                    .col(ColumnDef::new(Orders::DriverId).integer().null())
                    .col(ColumnDef::new(Orders::TourId).integer().null())
                    .col(ColumnDef::new(Orders::TotalAmount).big_integer().not_null())
                    .col(ColumnDef::new(Orders::Status).string_len(16).not_null())
                    .col(ColumnDef::new(Orders::StartPeriod).date().not_null())
                    .col(ColumnDef::new(Orders::EndPeriod).date().not_null())
                    .col(ColumnDef::new(Orders::PaymentMethod).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Orders::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Orders::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_user_id")
                            .from(Orders::Table, Orders::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_car_id")
                            .from(Orders::Table, Orders::CarId)
                            .to(Cars::Table, Cars::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_driver_id")
                            .from(Orders::Table, Orders::DriverId)
                            .to(Drivers::Table, Drivers::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_tour_id")
                            .from(Orders::Table, Orders::TourId)
                            .to(Tours::Table, Tours::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // History and the active-order check both filter by user
        manager
            .create_index(
                Index::create()
                    .name("idx_orders_user_id_status")
                    .table(Orders::Table)
                    .col(Orders::UserId)
                    .col(Orders::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Orders::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Orders {
    Table,
    Id,
    UserId,
    CarId,
    DriverId,
    TourId,
    TotalAmount,
    Status,
    StartPeriod,
    EndPeriod,
    PaymentMethod,
    CreatedAt,
    UpdatedAt,
}
