use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::activity::{self, AssetRollup};
use crate::entities::asset::{self, AssetKind, AssetStatus};
use crate::error::AppError;

/// Identity of a new pending asset. One row per media sub-unit: one per
/// video segment, one per image.
pub struct NewAsset {
    pub owner_id: Uuid,
    pub plan_id: Uuid,
    pub module_id: Uuid,
    pub activity_id: Uuid,
    pub position: i32,
    pub segment_index: Option<i32>,
    pub kind: AssetKind,
}

pub async fn create_pending<C: ConnectionTrait>(
    conn: &C,
    new: NewAsset,
) -> Result<asset::Model, AppError> {
    let now = Utc::now().naive_utc();
    let model = asset::ActiveModel {
        id: Set(Uuid::new_v4()),
        owner_id: Set(new.owner_id),
        plan_id: Set(new.plan_id),
        module_id: Set(new.module_id),
        activity_id: Set(new.activity_id),
        position: Set(new.position),
        segment_index: Set(new.segment_index),
        kind: Set(new.kind),
        status: Set(AssetStatus::Pending),
        storage_path: Set(None),
        download_url: Set(None),
        error_message: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(model.insert(conn).await?)
}

pub async fn get<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<Option<asset::Model>, AppError> {
    Ok(asset::Entity::find_by_id(id).one(conn).await?)
}

/// The work queue, realized as a status query: all pending assets, oldest
/// first.
pub async fn pending<C: ConnectionTrait>(conn: &C) -> Result<Vec<asset::Model>, AppError> {
    Ok(asset::Entity::find()
        .filter(asset::Column::Status.eq(AssetStatus::Pending))
        .order_by_asc(asset::Column::CreatedAt)
        .all(conn)
        .await?)
}

pub async fn by_plan<C: ConnectionTrait>(
    conn: &C,
    plan_id: Uuid,
) -> Result<Vec<asset::Model>, AppError> {
    Ok(asset::Entity::find()
        .filter(asset::Column::PlanId.eq(plan_id))
        .order_by_asc(asset::Column::Position)
        .order_by_asc(asset::Column::SegmentIndex)
        .order_by_asc(asset::Column::CreatedAt)
        .all(conn)
        .await?)
}

/// Claim an asset for generation: a conditional update that only succeeds
/// while the row is still `pending` (or `failed`, for regeneration). The
/// affected-row count is the claim outcome, so two concurrent claimers
/// cannot both win.
pub async fn claim_for_generation<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<bool, AppError> {
    let res = asset::Entity::update_many()
        .col_expr(asset::Column::Status, Expr::value(AssetStatus::Generating))
        .col_expr(asset::Column::UpdatedAt, Expr::value(Utc::now().naive_utc()))
        .filter(asset::Column::Id.eq(id))
        .filter(asset::Column::Status.is_in([AssetStatus::Pending, AssetStatus::Failed]))
        .exec(conn)
        .await?;
    Ok(res.rows_affected == 1)
}

/// Optional fields of a status patch; only supplied fields are written.
#[derive(Default)]
pub struct AssetPatch {
    pub storage_path: Option<String>,
    pub download_url: Option<String>,
    pub error_message: Option<String>,
}

pub async fn update_status<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    status: AssetStatus,
    patch: AssetPatch,
) -> Result<(), AppError> {
    let mut query = asset::Entity::update_many()
        .col_expr(asset::Column::Status, Expr::value(status))
        .col_expr(asset::Column::UpdatedAt, Expr::value(Utc::now().naive_utc()))
        .filter(asset::Column::Id.eq(id));

    if let Some(path) = patch.storage_path {
        query = query.col_expr(asset::Column::StoragePath, Expr::value(Some(path)));
    }
    if let Some(url) = patch.download_url {
        query = query.col_expr(asset::Column::DownloadUrl, Expr::value(Some(url)));
    }
    if let Some(message) = patch.error_message {
        query = query.col_expr(asset::Column::ErrorMessage, Expr::value(Some(message)));
    }

    let res = query.exec(conn).await?;
    if res.rows_affected == 0 {
        return Err(AppError::NotFound(format!("Asset {id} not found")));
    }
    Ok(())
}

pub async fn mark_ready<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    storage_path: &str,
    download_url: &str,
) -> Result<(), AppError> {
    update_status(
        conn,
        id,
        AssetStatus::Ready,
        AssetPatch {
            storage_path: Some(storage_path.to_string()),
            download_url: Some(download_url.to_string()),
            error_message: None,
        },
    )
    .await
}

pub async fn mark_failed<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    message: &str,
) -> Result<(), AppError> {
    update_status(
        conn,
        id,
        AssetStatus::Failed,
        AssetPatch {
            error_message: Some(message.to_string()),
            ..Default::default()
        },
    )
    .await
}

/// Startup recovery for a crashed worker: anything left `generating` goes
/// back to `pending`. Single-worker assumption; a multi-worker deployment
/// would need a heartbeat on top.
pub async fn release_stale_generating<C: ConnectionTrait>(conn: &C) -> Result<u64, AppError> {
    let res = asset::Entity::update_many()
        .col_expr(asset::Column::Status, Expr::value(AssetStatus::Pending))
        .col_expr(asset::Column::UpdatedAt, Expr::value(Utc::now().naive_utc()))
        .filter(asset::Column::Status.eq(AssetStatus::Generating))
        .exec(conn)
        .await?;
    Ok(res.rows_affected)
}

/// Recompute the owning activity's `asset_status` from all of its asset
/// rows: ready iff every row has a download URL, failed if any row failed
/// before that point, pending otherwise.
pub async fn rollup_activity_assets<C: ConnectionTrait>(
    conn: &C,
    activity_id: Uuid,
) -> Result<AssetRollup, AppError> {
    let rows = asset::Entity::find()
        .filter(asset::Column::ActivityId.eq(activity_id))
        .all(conn)
        .await?;

    let rollup = if !rows.is_empty() && rows.iter().all(|a| a.download_url.is_some()) {
        AssetRollup::Ready
    } else if rows.iter().any(|a| a.status == AssetStatus::Failed) {
        AssetRollup::Failed
    } else {
        AssetRollup::Pending
    };

    let res = activity::Entity::update_many()
        .col_expr(activity::Column::AssetStatus, Expr::value(Some(rollup)))
        .col_expr(activity::Column::UpdatedAt, Expr::value(Utc::now().naive_utc()))
        .filter(activity::Column::Id.eq(activity_id))
        .exec(conn)
        .await?;
    if res.rows_affected == 0 {
        return Err(AppError::NotFound(format!("Activity {activity_id} not found")));
    }

    Ok(rollup)
}
