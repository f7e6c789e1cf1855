use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DailyModules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DailyModules::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DailyModules::PlanId).uuid().not_null())
                    .col(ColumnDef::new(DailyModules::DayNumber).integer().not_null())
                    .col(ColumnDef::new(DailyModules::Title).string().not_null())
                    .col(
                        ColumnDef::new(DailyModules::IsCompleted)
                            .boolean()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DailyModules::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(DailyModules::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_daily_modules_plan_id")
                            .from(DailyModules::Table, DailyModules::PlanId)
                            .to(Plans::Table, Plans::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_daily_modules_plan_day")
                    .table(DailyModules::Table)
                    .col(DailyModules::PlanId)
                    .col(DailyModules::DayNumber)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DailyModules::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum DailyModules {
    Table,
    Id,
    PlanId,
    DayNumber,
    Title,
    IsCompleted,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Plans {
    Table,
    Id,
}
