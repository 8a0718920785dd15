//! Migration to create technicians table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Technicians::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Technicians::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Technicians::Name).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Technicians::Email)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Technicians::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(Technicians::Role)
                            .string_len(20)
                            .not_null()
                            .default("technician"),
                    )
                    .col(
                        ColumnDef::new(Technicians::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_technicians_email")
                    .table(Technicians::Table)
                    .col(Technicians::Email)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Technicians::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Technicians {
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    Role,
    CreatedAt,
}
