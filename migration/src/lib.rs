pub use sea_orm_migration::prelude::*;

mod m20260830_000001_create_plans_table;
mod m20260830_000002_create_daily_modules_table;
mod m20260830_000003_create_activities_table;
mod m20260830_000004_create_study_assets_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260830_000001_create_plans_table::Migration),
            Box::new(m20260830_000002_create_daily_modules_table::Migration),
            Box::new(m20260830_000003_create_activities_table::Migration),
            Box::new(m20260830_000004_create_study_assets_table::Migration),
        ]
    }
}
