use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::activity::{self, ActivityKind, AssetRollup};
use crate::entities::asset::{self, AssetKind, AssetStatus};
use crate::entities::daily_module;
use crate::entities::plan::{self, PlanStatus};
use crate::error::AppError;
use crate::models::payload::ActivityPayload;
use crate::services::assets::{self, NewAsset};
use crate::state::AppState;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreatePlanRequest {
    pub owner_id: Uuid,
    pub title: String,
    pub hours_per_day: i32,
    /// One entry per study day, in day order.
    pub modules: Vec<CreateModuleRequest>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateModuleRequest {
    pub title: String,
    pub activities: Vec<CreateActivityRequest>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateActivityRequest {
    pub kind: ActivityKind,
    pub title: String,
    #[serde(default)]
    pub estimated_minutes: i32,
    #[serde(default)]
    pub payload: ActivityPayload,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CreatePlanResponse {
    pub id: Uuid,
    pub title: String,
    pub total_days: i32,
    pub current_day: i32,
    pub progress: i32,
    pub status: PlanStatus,
    /// Number of media asset records seeded as `pending`.
    pub seeded_assets: usize,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct AssetResponse {
    pub id: Uuid,
    pub activity_id: Uuid,
    pub segment_index: Option<i32>,
    pub kind: AssetKind,
    pub status: AssetStatus,
    pub storage_path: Option<String>,
    pub download_url: Option<String>,
    pub error_message: Option<String>,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

impl From<asset::Model> for AssetResponse {
    fn from(model: asset::Model) -> Self {
        Self {
            id: model.id,
            activity_id: model.activity_id,
            segment_index: model.segment_index,
            kind: model.kind,
            status: model.status,
            storage_path: model.storage_path,
            download_url: model.download_url,
            error_message: model.error_message,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ActivityResponse {
    pub id: Uuid,
    pub position: i32,
    pub kind: ActivityKind,
    pub title: String,
    pub estimated_minutes: i32,
    pub payload: ActivityPayload,
    pub is_completed: bool,
    pub asset_status: Option<AssetRollup>,
    pub assets: Vec<AssetResponse>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ModuleResponse {
    pub id: Uuid,
    pub day_number: i32,
    pub title: String,
    pub is_completed: bool,
    pub activities: Vec<ActivityResponse>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct PlanDetailResponse {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub total_days: i32,
    pub hours_per_day: i32,
    pub current_day: i32,
    pub progress: i32,
    pub status: PlanStatus,
    pub modules: Vec<ModuleResponse>,
}

#[utoipa::path(
    post,
    path = "/plans",
    tag = "Plans",
    request_body = CreatePlanRequest,
    responses(
        (status = 200, description = "Plan created", body = CreatePlanResponse),
        (status = 400, description = "Bad Request"),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn create_plan(
    State(state): State<AppState>,
    Json(req): Json<CreatePlanRequest>,
) -> Result<Json<CreatePlanResponse>, AppError> {
    if req.modules.is_empty() {
        return Err(AppError::Validation("A plan needs at least one module".to_string()));
    }
    if req.title.trim().is_empty() {
        return Err(AppError::Validation("Plan title must not be empty".to_string()));
    }

    let now = Utc::now().naive_utc();
    let plan_id = Uuid::new_v4();
    let total_days = req.modules.len() as i32;

    let txn = state.db.begin().await?;

    let plan_row = plan::ActiveModel {
        id: Set(plan_id),
        owner_id: Set(req.owner_id),
        title: Set(req.title.clone()),
        total_days: Set(total_days),
        hours_per_day: Set(req.hours_per_day),
        current_day: Set(1),
        progress: Set(0),
        status: Set(PlanStatus::Active),
        created_at: Set(now),
        updated_at: Set(now),
    };
    plan_row.insert(&txn).await?;

    let mut seeded_assets = 0usize;

    for (day_idx, module_req) in req.modules.iter().enumerate() {
        let module_id = Uuid::new_v4();
        let module_row = daily_module::ActiveModel {
            id: Set(module_id),
            plan_id: Set(plan_id),
            day_number: Set(day_idx as i32 + 1),
            title: Set(module_req.title.clone()),
            is_completed: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        };
        module_row.insert(&txn).await?;

        for (position, act_req) in module_req.activities.iter().enumerate() {
            let activity_id = Uuid::new_v4();
            let seeds = asset_seeds(act_req);

            let activity_row = activity::ActiveModel {
                id: Set(activity_id),
                module_id: Set(module_id),
                position: Set(position as i32),
                kind: Set(act_req.kind),
                title: Set(act_req.title.clone()),
                estimated_minutes: Set(act_req.estimated_minutes),
                payload: Set(act_req.payload.clone()),
                is_completed: Set(false),
                asset_status: Set(if seeds.is_empty() { None } else { Some(AssetRollup::Pending) }),
                created_at: Set(now),
                updated_at: Set(now),
            };
            activity_row.insert(&txn).await?;

            for (kind, segment_index) in seeds {
                assets::create_pending(
                    &txn,
                    NewAsset {
                        owner_id: req.owner_id,
                        plan_id,
                        module_id,
                        activity_id,
                        position: position as i32,
                        segment_index,
                        kind,
                    },
                )
                .await?;
                seeded_assets += 1;
            }
        }
    }

    txn.commit().await?;

    tracing::info!("Plans | POST /plans | plan={plan_id} | days={total_days} | assets={seeded_assets}");
    Ok(Json(CreatePlanResponse {
        id: plan_id,
        title: req.title,
        total_days,
        current_day: 1,
        progress: 0,
        status: PlanStatus::Active,
        seeded_assets,
    }))
}

/// Which asset rows an activity needs: one per video segment, one per
/// image, none for text and quizzes.
fn asset_seeds(act: &CreateActivityRequest) -> Vec<(AssetKind, Option<i32>)> {
    match act.kind {
        ActivityKind::Video => act
            .payload
            .segments()
            .iter()
            .enumerate()
            .map(|(i, _)| (AssetKind::Video, Some(i as i32)))
            .collect(),
        ActivityKind::Image => vec![(AssetKind::Image, None)],
        ActivityKind::Text | ActivityKind::Quiz => Vec::new(),
    }
}

#[utoipa::path(
    get,
    path = "/plans/{id}",
    tag = "Plans",
    params(
        ("id" = Uuid, Path, description = "Plan ID")
    ),
    responses(
        (status = 200, description = "Plan with modules, activities and assets", body = PlanDetailResponse),
        (status = 404, description = "Plan not found"),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn get_plan(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<PlanDetailResponse>, AppError> {
    let plan_row = plan::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Plan {id} not found")))?;

    let modules = daily_module::Entity::find()
        .filter(daily_module::Column::PlanId.eq(id))
        .order_by_asc(daily_module::Column::DayNumber)
        .all(&state.db)
        .await?;

    let module_ids: Vec<Uuid> = modules.iter().map(|m| m.id).collect();
    let acts = activity::Entity::find()
        .filter(activity::Column::ModuleId.is_in(module_ids))
        .order_by_asc(activity::Column::Position)
        .all(&state.db)
        .await?;

    let plan_assets = assets::by_plan(&state.db, id).await?;

    let module_responses = modules
        .into_iter()
        .map(|m| {
            let activities = acts
                .iter()
                .filter(|a| a.module_id == m.id)
                .map(|a| ActivityResponse {
                    id: a.id,
                    position: a.position,
                    kind: a.kind,
                    title: a.title.clone(),
                    estimated_minutes: a.estimated_minutes,
                    payload: a.payload.clone(),
                    is_completed: a.is_completed,
                    asset_status: a.asset_status,
                    assets: plan_assets
                        .iter()
                        .filter(|asset| asset.activity_id == a.id)
                        .cloned()
                        .map(AssetResponse::from)
                        .collect(),
                })
                .collect();
            ModuleResponse {
                id: m.id,
                day_number: m.day_number,
                title: m.title,
                is_completed: m.is_completed,
                activities,
            }
        })
        .collect();

    Ok(Json(PlanDetailResponse {
        id: plan_row.id,
        owner_id: plan_row.owner_id,
        title: plan_row.title,
        total_days: plan_row.total_days,
        hours_per_day: plan_row.hours_per_day,
        current_day: plan_row.current_day,
        progress: plan_row.progress,
        status: plan_row.status,
        modules: module_responses,
    }))
}
