use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Activities::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Activities::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Activities::ModuleId).uuid().not_null())
                    .col(ColumnDef::new(Activities::Position).integer().not_null())
                    .col(ColumnDef::new(Activities::Kind).string().not_null())
                    .col(ColumnDef::new(Activities::Title).string().not_null())
                    .col(
                        ColumnDef::new(Activities::EstimatedMinutes)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Activities::Payload).json().not_null())
                    .col(ColumnDef::new(Activities::IsCompleted).boolean().not_null())
                    .col(ColumnDef::new(Activities::AssetStatus).string().null())
                    .col(ColumnDef::new(Activities::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Activities::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_activities_module_id")
                            .from(Activities::Table, Activities::ModuleId)
                            .to(DailyModules::Table, DailyModules::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_activities_module_position")
                    .table(Activities::Table)
                    .col(Activities::ModuleId)
                    .col(Activities::Position)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Activities::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Activities {
    Table,
    Id,
    ModuleId,
    Position,
    Kind,
    Title,
    EstimatedMinutes,
    Payload,
    IsCompleted,
    AssetStatus,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum DailyModules {
    Table,
    Id,
}
