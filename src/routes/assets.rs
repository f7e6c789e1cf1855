use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppError;
use crate::pagination::{PaginatedResponse, Pagination};
use crate::routes::plans::AssetResponse;
use crate::services::assets;
use crate::services::worker::{AssetOutcome, AssetWorker};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/assets/{id}/generate",
    tag = "Assets",
    params(
        ("id" = Uuid, Path, description = "Asset ID")
    ),
    responses(
        (status = 200, description = "Asset generated (or already ready)", body = AssetOutcome),
        (status = 400, description = "Activity payload is missing a required field"),
        (status = 404, description = "Asset, module or activity not found"),
        (status = 409, description = "Asset is already being generated"),
        (status = 502, description = "Generation or upload failed"),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn generate_asset(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<AssetOutcome>, AppError> {
    let worker = AssetWorker::new(state.db.clone(), state.blobs.clone(), state.generator.clone());
    let outcome = worker.process_asset(id).await?;

    tracing::info!("Assets | POST /assets/{id}/generate | url={} | res=200", outcome.download_url);
    Ok(Json(outcome))
}

#[utoipa::path(
    get,
    path = "/assets/pending",
    tag = "Assets",
    params(Pagination),
    responses(
        (status = 200, description = "Pending assets, oldest first", body = PaginatedResponse<AssetResponse>),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn list_pending_assets(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<PaginatedResponse<AssetResponse>>, AppError> {
    let page = pagination.page.unwrap_or(1);
    let limit = pagination.limit.unwrap_or(10);

    let all = assets::pending(&state.db).await?;
    let total_items = all.len() as u64;
    let total_pages = (total_items as f64 / limit as f64).ceil() as u64;

    let start = ((page - 1) * limit) as usize;
    let end = std::cmp::min(start + limit as usize, all.len());
    let data = if start < all.len() {
        all[start..end].iter().cloned().map(AssetResponse::from).collect()
    } else {
        vec![]
    };

    Ok(Json(PaginatedResponse {
        data,
        total_items,
        total_pages,
        current_page: page,
        page_size: limit,
    }))
}

#[utoipa::path(
    get,
    path = "/plans/{id}/assets",
    tag = "Assets",
    params(
        ("id" = Uuid, Path, description = "Plan ID")
    ),
    responses(
        (status = 200, description = "All asset records of the plan, in activity order", body = Vec<AssetResponse>),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn list_plan_assets(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<Vec<AssetResponse>>, AppError> {
    let rows = assets::by_plan(&state.db, id).await?;
    Ok(Json(rows.into_iter().map(AssetResponse::from).collect()))
}
