use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Licenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Licenses::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Licenses::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Licenses::Type).string().not_null())
                    .col(ColumnDef::new(Licenses::DeviceId).string())
                    .col(ColumnDef::new(Licenses::ExpiresAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Licenses::ActivatedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Licenses::Email).string())
                    .col(
                        ColumnDef::new(Licenses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Trial issuance looks up existing trials by device.
        manager
            .create_index(
                Index::create()
                    .table(Licenses::Table)
                    .col(Licenses::DeviceId)
                    .name("idx_licenses_device_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Licenses::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Licenses {
    Table,
    Id,
    Code,
    Type,
    DeviceId,
    ExpiresAt,
    ActivatedAt,
    Email,
    CreatedAt,
}
