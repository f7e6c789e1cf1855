use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "plans")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub total_days: i32,
    pub hours_per_day: i32,
    /// Next incomplete day, clamped to `total_days`. Written only by the
    /// progress aggregator.
    pub current_day: i32,
    /// 0-100. Written only by the progress aggregator.
    pub progress: i32,
    pub status: PlanStatus,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(EnumIter, DeriveActiveEnum, Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, utoipa::ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "completed")]
    Completed,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::daily_module::Entity")]
    DailyModule,
}

impl Related<super::daily_module::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DailyModule.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
