use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::payload::ActivityPayload;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "activities")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub module_id: Uuid,
    /// 0-based order within the module. Ordering only; assets reference
    /// activities by id, never by position.
    pub position: i32,
    pub kind: ActivityKind,
    pub title: String,
    pub estimated_minutes: i32,
    #[sea_orm(column_type = "Json")]
    pub payload: ActivityPayload,
    pub is_completed: bool,
    /// Rollup over this activity's asset rows. NULL for activities that
    /// carry no media.
    pub asset_status: Option<AssetRollup>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(EnumIter, DeriveActiveEnum, Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, utoipa::ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    #[sea_orm(string_value = "video")]
    Video,
    #[sea_orm(string_value = "text")]
    Text,
    #[sea_orm(string_value = "quiz")]
    Quiz,
    #[sea_orm(string_value = "image")]
    Image,
}

impl ActivityKind {
    pub fn carries_media(self) -> bool {
        matches!(self, ActivityKind::Video | ActivityKind::Image)
    }
}

/// Summary of an activity's asset rows: `ready` iff every row has a
/// download URL, `failed` if any row failed before that point.
#[derive(EnumIter, DeriveActiveEnum, Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, utoipa::ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum AssetRollup {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "ready")]
    Ready,
    #[sea_orm(string_value = "failed")]
    Failed,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::daily_module::Entity",
        from = "Column::ModuleId",
        to = "super::daily_module::Column::Id",
        on_delete = "Cascade"
    )]
    DailyModule,
    #[sea_orm(has_many = "super::asset::Entity")]
    Asset,
}

impl Related<super::daily_module::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DailyModule.def()
    }
}

impl Related<super::asset::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Asset.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
