use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::services::progress::{self, ProgressSummary};
use crate::state::AppState;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CompletionRequest {
    pub is_completed: bool,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct BulkCompletionRequest {
    pub activity_ids: Vec<Uuid>,
    pub is_completed: bool,
}

#[utoipa::path(
    patch,
    path = "/modules/{id}/activities/{activity_id}/completion",
    tag = "Progress",
    params(
        ("id" = Uuid, Path, description = "Module ID"),
        ("activity_id" = Uuid, Path, description = "Activity ID")
    ),
    request_body = CompletionRequest,
    responses(
        (status = 200, description = "Updated plan aggregates", body = ProgressSummary),
        (status = 400, description = "Activity does not belong to this module"),
        (status = 404, description = "Module not found"),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn set_activity_completion(
    Path((id, activity_id)): Path<(Uuid, Uuid)>,
    State(state): State<AppState>,
    Json(req): Json<CompletionRequest>,
) -> Result<Json<ProgressSummary>, AppError> {
    let summary =
        progress::set_activity_completion(&state.db, id, activity_id, req.is_completed).await?;

    tracing::info!(
        "Progress | PATCH /modules/{id}/activities/{activity_id}/completion | progress={} | res=200",
        summary.progress
    );
    Ok(Json(summary))
}

#[utoipa::path(
    patch,
    path = "/modules/{id}/completion",
    tag = "Progress",
    params(
        ("id" = Uuid, Path, description = "Module ID")
    ),
    request_body = BulkCompletionRequest,
    responses(
        (status = 200, description = "Updated plan aggregates", body = ProgressSummary),
        (status = 400, description = "An activity does not belong to this module"),
        (status = 404, description = "Module not found"),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn set_activities_completion(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Json(req): Json<BulkCompletionRequest>,
) -> Result<Json<ProgressSummary>, AppError> {
    let summary =
        progress::set_activities_completion(&state.db, id, &req.activity_ids, req.is_completed)
            .await?;
    Ok(Json(summary))
}

#[utoipa::path(
    post,
    path = "/modules/{id}/complete",
    tag = "Progress",
    params(
        ("id" = Uuid, Path, description = "Module ID")
    ),
    responses(
        (status = 200, description = "Updated plan aggregates", body = ProgressSummary),
        (status = 404, description = "Module not found"),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn complete_module(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<ProgressSummary>, AppError> {
    let summary = progress::complete_module(&state.db, id).await?;
    Ok(Json(summary))
}
