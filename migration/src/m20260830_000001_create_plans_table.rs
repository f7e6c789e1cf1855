use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Plans::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Plans::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Plans::OwnerId).uuid().not_null())
                    .col(ColumnDef::new(Plans::Title).string().not_null())
                    .col(ColumnDef::new(Plans::TotalDays).integer().not_null())
                    .col(ColumnDef::new(Plans::HoursPerDay).integer().not_null())
                    .col(ColumnDef::new(Plans::CurrentDay).integer().not_null())
                    .col(ColumnDef::new(Plans::Progress).integer().not_null())
                    .col(ColumnDef::new(Plans::Status).string().not_null())
                    .col(ColumnDef::new(Plans::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Plans::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Plans::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Plans {
    Table,
    Id,
    OwnerId,
    Title,
    TotalDays,
    HoursPerDay,
    CurrentDay,
    Progress,
    Status,
    CreatedAt,
    UpdatedAt,
}
