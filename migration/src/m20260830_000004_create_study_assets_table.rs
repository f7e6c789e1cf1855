use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StudyAssets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StudyAssets::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StudyAssets::OwnerId).uuid().not_null())
                    .col(ColumnDef::new(StudyAssets::PlanId).uuid().not_null())
                    .col(ColumnDef::new(StudyAssets::ModuleId).uuid().not_null())
                    .col(ColumnDef::new(StudyAssets::ActivityId).uuid().not_null())
                    .col(ColumnDef::new(StudyAssets::Position).integer().not_null())
                    .col(ColumnDef::new(StudyAssets::SegmentIndex).integer().null())
                    .col(ColumnDef::new(StudyAssets::Kind).string().not_null())
                    .col(ColumnDef::new(StudyAssets::Status).string().not_null())
                    .col(ColumnDef::new(StudyAssets::StoragePath).string().null())
                    .col(ColumnDef::new(StudyAssets::DownloadUrl).string().null())
                    .col(ColumnDef::new(StudyAssets::ErrorMessage).string().null())
                    .col(ColumnDef::new(StudyAssets::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(StudyAssets::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_study_assets_activity_id")
                            .from(StudyAssets::Table, StudyAssets::ActivityId)
                            .to(Activities::Table, Activities::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_study_assets_status_created")
                    .table(StudyAssets::Table)
                    .col(StudyAssets::Status)
                    .col(StudyAssets::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_study_assets_plan_id")
                    .table(StudyAssets::Table)
                    .col(StudyAssets::PlanId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StudyAssets::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum StudyAssets {
    Table,
    Id,
    OwnerId,
    PlanId,
    ModuleId,
    ActivityId,
    Position,
    SegmentIndex,
    Kind,
    Status,
    StoragePath,
    DownloadUrl,
    ErrorMessage,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Activities {
    Table,
    Id,
}
